//! At-risk classification.

use crate::model::{ScoreRecord, PASS_LINE};
use crate::statistics::mean;

/// Number of current-period fails that alone mark a student at risk.
pub const FAIL_COUNT_THRESHOLD: usize = 2;

/// An average drop steeper than this marks a student at risk.
pub const DECLINE_THRESHOLD: f64 = -5.0;

/// Apply the at-risk rule to a student's current-period scores.
///
/// At risk when any of these holds: two or more fails, a failing mean, or
/// a mean that fell by more than five points. No current scores means no
/// risk.
pub fn is_at_risk(current: &[&ScoreRecord], delta_average: f64) -> bool {
    if current.is_empty() {
        return false;
    }
    let failed = current.iter().filter(|s| s.value < PASS_LINE).count();
    let average = mean(current.iter().map(|s| s.value));
    failed >= FAIL_COUNT_THRESHOLD || average < PASS_LINE || delta_average < DECLINE_THRESHOLD
}
