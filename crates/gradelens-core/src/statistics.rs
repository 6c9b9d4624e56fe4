//! Aggregate score statistics, exam trends and student rankings.
//!
//! All averages and percentages leaving this module are rounded to two
//! decimals with [`round2`]. Every division is guarded: an empty group
//! yields `0.0`.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{ScoreRecord, PASS_LINE};

/// Label used for an exam that has neither a name nor a date.
pub const UNNAMED_EXAM: &str = "unnamed exam";

/// Round half-up to two decimals on the value scaled by 100.
pub fn round2(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

/// Arithmetic mean, `0.0` for an empty input.
pub fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Percentage of `part` in `whole`, `0.0` when `whole` is zero.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

/// Group records by a key, keeping groups in first-appearance order.
///
/// Several results (rank ties in particular) depend on this order, so it
/// must stay deterministic.
pub fn group_by<'a, K, F>(
    scores: impl IntoIterator<Item = &'a ScoreRecord>,
    key: F,
) -> Vec<(K, Vec<&'a ScoreRecord>)>
where
    K: Eq + Hash + Clone,
    F: Fn(&ScoreRecord) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'a ScoreRecord>)> = Vec::new();
    for score in scores {
        let k = key(score);
        match index.get(&k) {
            Some(&i) => groups[i].1.push(score),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![score]));
            }
        }
    }
    groups
}

/// Order optional dates ascending with absent dates last.
pub(crate) fn cmp_dates_nulls_last(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ---------------------------------------------------------------------------
// Score bucket
// ---------------------------------------------------------------------------

/// Running sum / count / pass-count for one grouping key.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreBucket {
    pub sum: f64,
    pub count: usize,
    pub pass_count: usize,
}

impl ScoreBucket {
    pub fn accept(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
        if value >= PASS_LINE {
            self.pass_count += 1;
        }
    }

    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    pub fn pass_rate(&self) -> f64 {
        percentage(self.pass_count, self.count)
    }
}

impl<'a> FromIterator<&'a ScoreRecord> for ScoreBucket {
    fn from_iter<I: IntoIterator<Item = &'a ScoreRecord>>(iter: I) -> Self {
        let mut bucket = ScoreBucket::default();
        for score in iter {
            bucket.accept(score.value);
        }
        bucket
    }
}

// ---------------------------------------------------------------------------
// Aggregate statistics
// ---------------------------------------------------------------------------

/// Count of scores per fixed band. Bands are half-open on the lower bound,
/// so 100 lands in `90-100`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    #[serde(rename = "0-59")]
    pub below_60: usize,
    #[serde(rename = "60-69")]
    pub band_60_69: usize,
    #[serde(rename = "70-79")]
    pub band_70_79: usize,
    #[serde(rename = "80-89")]
    pub band_80_89: usize,
    #[serde(rename = "90-100")]
    pub band_90_100: usize,
}

impl Distribution {
    /// Band labels in display order.
    pub const LABELS: [&'static str; 5] = ["0-59", "60-69", "70-79", "80-89", "90-100"];

    pub fn record(&mut self, value: f64) {
        if value < 60.0 {
            self.below_60 += 1;
        } else if value < 70.0 {
            self.band_60_69 += 1;
        } else if value < 80.0 {
            self.band_70_79 += 1;
        } else if value < 90.0 {
            self.band_80_89 += 1;
        } else {
            self.band_90_100 += 1;
        }
    }

    /// Counts paired with their labels, in display order.
    pub fn bands(&self) -> [(&'static str, usize); 5] {
        [
            (Self::LABELS[0], self.below_60),
            (Self::LABELS[1], self.band_60_69),
            (Self::LABELS[2], self.band_70_79),
            (Self::LABELS[3], self.band_80_89),
            (Self::LABELS[4], self.band_90_100),
        ]
    }

    pub fn total(&self) -> usize {
        self.bands().iter().map(|(_, n)| n).sum()
    }
}

/// Flat statistics over one scope of scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreStats {
    pub label: String,
    pub total_count: usize,
    pub average: f64,
    pub highest: f64,
    pub lowest: f64,
    pub pass_rate: f64,
    pub distribution: Distribution,
}

/// Compute count / average / extremes / pass rate / distribution.
///
/// Records without a date are counted here like any other.
pub fn analyze_scores(scores: &[ScoreRecord], label: &str) -> ScoreStats {
    if scores.is_empty() {
        return ScoreStats {
            label: label.to_string(),
            total_count: 0,
            average: 0.0,
            highest: 0.0,
            lowest: 0.0,
            pass_rate: 0.0,
            distribution: Distribution::default(),
        };
    }

    let bucket: ScoreBucket = scores.iter().collect();
    let mut distribution = Distribution::default();
    let mut highest = f64::MIN;
    let mut lowest = f64::MAX;
    for score in scores {
        distribution.record(score.value);
        highest = highest.max(score.value);
        lowest = lowest.min(score.value);
    }

    ScoreStats {
        label: label.to_string(),
        total_count: scores.len(),
        average: round2(bucket.average()),
        highest,
        lowest,
        pass_rate: round2(bucket.pass_rate()),
        distribution,
    }
}

/// Pass rate per course, grouped by course id and keyed by course name.
pub fn pass_rates_by_course(scores: &[ScoreRecord]) -> BTreeMap<String, f64> {
    group_by(scores, |s| s.course_id)
        .into_iter()
        .map(|(course_id, group)| {
            let name = group
                .first()
                .map(|s| s.course_name.trim())
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("course #{course_id}"));
            let bucket: ScoreBucket = group.into_iter().collect();
            (name, round2(bucket.pass_rate()))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Exam trend
// ---------------------------------------------------------------------------

/// Average and pass rate of one exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamTrendPoint {
    pub exam_id: i64,
    pub label: String,
    pub exam_date: Option<NaiveDate>,
    pub average: f64,
    pub pass_rate: f64,
}

struct ExamBucket<'a> {
    exam_id: i64,
    exam_name: Option<&'a str>,
    date: Option<NaiveDate>,
    scores: ScoreBucket,
}

impl ExamBucket<'_> {
    fn label(&self) -> String {
        match self.exam_name {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => self
                .date
                .map(|d| d.to_string())
                .unwrap_or_else(|| UNNAMED_EXAM.to_string()),
        }
    }
}

/// Per-exam averages and pass rates in chronological order.
///
/// Records without an exam are dropped. Exams sort by their own exam date
/// with undated exams last, then by exam name (a missing name sorts
/// first). `recorded_at` never positions an exam, so the order does not
/// depend on which record of an undated exam comes first.
pub fn exam_trend(scores: &[ScoreRecord]) -> Vec<ExamTrendPoint> {
    let mut index: HashMap<i64, usize> = HashMap::new();
    let mut buckets: Vec<ExamBucket<'_>> = Vec::new();

    for score in scores {
        let Some(exam_id) = score.exam_id else {
            continue;
        };
        let i = *index.entry(exam_id).or_insert_with(|| {
            buckets.push(ExamBucket {
                exam_id,
                exam_name: score.exam_name.as_deref(),
                date: None,
                scores: ScoreBucket::default(),
            });
            buckets.len() - 1
        });
        let bucket = &mut buckets[i];
        bucket.date = bucket.date.or(score.exam_date);
        bucket.scores.accept(score.value);
    }

    buckets.sort_by(|a, b| {
        cmp_dates_nulls_last(a.date, b.date)
            .then_with(|| a.exam_name.unwrap_or("").cmp(b.exam_name.unwrap_or("")))
    });

    buckets
        .iter()
        .map(|b| ExamTrendPoint {
            exam_id: b.exam_id,
            label: b.label(),
            exam_date: b.date,
            average: round2(b.scores.average()),
            pass_rate: round2(b.scores.pass_rate()),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Rankings
// ---------------------------------------------------------------------------

/// One row of the student ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankEntry {
    pub student_id: i64,
    pub average_score: f64,
    pub rank: usize,
}

/// Sort `(id, average)` pairs descending and assign 1-based ranks.
///
/// The sort is stable and does not break ties: equal averages keep their
/// input order and still get distinct ranks.
pub fn rank_averages(mut averages: Vec<(i64, f64)>) -> Vec<RankEntry> {
    averages.sort_by(|a, b| b.1.total_cmp(&a.1));
    averages
        .into_iter()
        .enumerate()
        .map(|(i, (student_id, average_score))| RankEntry {
            student_id,
            average_score,
            rank: i + 1,
        })
        .collect()
}

/// Rank every student in `scores` by mean score.
pub fn student_rankings(scores: &[ScoreRecord]) -> Vec<RankEntry> {
    let averages = group_by(scores, |s| s.student_id)
        .into_iter()
        .map(|(student_id, group)| (student_id, round2(mean(group.iter().map(|s| s.value)))))
        .collect();
    rank_averages(averages)
}
