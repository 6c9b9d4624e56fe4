//! Latest-versus-previous snapshots.
//!
//! Only the two most recent distinct effective dates matter here; older
//! history is ignored by the class and student views. Records
//! without an effective date never join a cohort.

use chrono::NaiveDate;

use crate::model::ScoreRecord;
use crate::statistics::{cmp_dates_nulls_last, group_by, mean};

/// Distinct effective dates present in `scores`, ascending.
pub fn distinct_dates(scores: &[&ScoreRecord]) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = scores.iter().filter_map(|s| s.effective_date()).collect();
    dates.sort_unstable();
    dates.dedup();
    dates
}

/// Records on the most recent date and records on the date before it.
#[derive(Debug, Clone, Default)]
pub struct Cohorts<'a> {
    pub latest_date: Option<NaiveDate>,
    pub previous_date: Option<NaiveDate>,
    pub latest: Vec<&'a ScoreRecord>,
    pub previous: Vec<&'a ScoreRecord>,
}

impl<'a> Cohorts<'a> {
    pub fn split(scores: &[&'a ScoreRecord]) -> Self {
        let dates = distinct_dates(scores);
        let latest_date = dates.last().copied();
        let previous_date = dates.len().checked_sub(2).map(|i| dates[i]);
        Self {
            latest_date,
            previous_date,
            latest: on_date(scores, latest_date),
            previous: on_date(scores, previous_date),
        }
    }
}

fn on_date<'a>(scores: &[&'a ScoreRecord], date: Option<NaiveDate>) -> Vec<&'a ScoreRecord> {
    let Some(date) = date else {
        return Vec::new();
    };
    scores
        .iter()
        .copied()
        .filter(|s| s.effective_date() == Some(date))
        .collect()
}

/// Current-period scores and the average movement since the period before.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentExamSnapshot<'a> {
    pub current_scores: Vec<&'a ScoreRecord>,
    pub current_average: f64,
    pub previous_average: f64,
    pub delta_average: f64,
}

impl<'a> StudentExamSnapshot<'a> {
    /// Build a snapshot for one student's (or one class's) scores.
    ///
    /// With a single date the previous average mirrors the current one, so
    /// the delta is zero. With no dates everything is zero.
    pub fn build(scores: &[&'a ScoreRecord]) -> Self {
        let cohorts = Cohorts::split(scores);
        let current_average = mean(cohorts.latest.iter().map(|s| s.value));
        let previous_average = if cohorts.previous.is_empty() {
            current_average
        } else {
            mean(cohorts.previous.iter().map(|s| s.value))
        };
        Self {
            current_scores: cohorts.latest,
            current_average,
            previous_average,
            delta_average: current_average - previous_average,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// The latest score of one course and how it moved.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseExamSnapshot<'a> {
    pub latest_score: &'a ScoreRecord,
    /// Latest minus previous value, `0.0` without a previous score.
    pub delta: f64,
    /// Mean of every score sharing the latest score's effective date.
    pub latest_average: f64,
}

impl<'a> CourseExamSnapshot<'a> {
    /// Snapshot one course's scores. Returns `None` for an empty slice.
    ///
    /// Scores sort by effective date (undated last) and then by id, so the
    /// result does not depend on input order.
    pub fn build(scores: &[&'a ScoreRecord]) -> Option<Self> {
        let mut sorted = scores.to_vec();
        sorted.sort_by(|a, b| {
            cmp_dates_nulls_last(a.effective_date(), b.effective_date()).then(a.id.cmp(&b.id))
        });

        let latest = *sorted.last()?;
        let delta = sorted
            .len()
            .checked_sub(2)
            .map(|i| latest.value - sorted[i].value)
            .unwrap_or(0.0);
        let latest_date = latest.effective_date();
        let latest_average = mean(
            sorted
                .iter()
                .filter(|s| s.effective_date() == latest_date)
                .map(|s| s.value),
        );

        Some(Self {
            latest_score: latest,
            delta,
            latest_average,
        })
    }
}

/// One snapshot per course id, in first-appearance order.
pub fn course_snapshots<'a>(scores: &[&'a ScoreRecord]) -> Vec<(i64, CourseExamSnapshot<'a>)> {
    group_by(scores.iter().copied(), |s| s.course_id)
        .into_iter()
        .filter_map(|(course_id, group)| {
            CourseExamSnapshot::build(&group).map(|snapshot| (course_id, snapshot))
        })
        .collect()
}
