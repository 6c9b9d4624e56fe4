//! Core data model types for gradelens.
//!
//! Entities are owned by the persistence collaborator and handed to the
//! engine as plain values. Field names serialize in camelCase, which is the
//! wire contract the presentation layer relies on.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Scores at or above this value count as a pass.
pub const PASS_LINE: f64 = 60.0;

/// One recorded score, joined with the course and exam it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    /// Unique score identifier.
    pub id: i64,
    /// Student the score belongs to.
    pub student_id: i64,
    /// Course the score was earned in.
    pub course_id: i64,
    /// Display name of the course.
    pub course_name: String,
    /// Exam the score was recorded for, if any.
    #[serde(default)]
    pub exam_id: Option<i64>,
    /// Name of the exam, if any.
    #[serde(default)]
    pub exam_name: Option<String>,
    /// Date the exam was held, if known.
    #[serde(default)]
    pub exam_date: Option<NaiveDate>,
    /// When the score was entered.
    #[serde(default)]
    pub recorded_at: Option<NaiveDateTime>,
    /// Score value on a 0–100 scale.
    pub value: f64,
}

impl ScoreRecord {
    /// The chronological key used by trend and snapshot logic.
    ///
    /// The exam date wins; otherwise the date part of `recorded_at`.
    /// Records with neither are left out of date-bucketed analyses.
    pub fn effective_date(&self) -> Option<NaiveDate> {
        self.exam_date.or_else(|| self.recorded_at.map(|at| at.date()))
    }

    /// Whether this score reaches the pass line.
    pub fn is_pass(&self) -> bool {
        self.value >= PASS_LINE
    }
}

/// A student on a class roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    /// School-issued student number.
    #[serde(default)]
    pub student_number: String,
    pub name: String,
    /// Class (homeroom) name, e.g. "1A".
    pub clazz: String,
    #[serde(default)]
    pub major: String,
}

/// A course offered by the school.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub credit: f64,
    #[serde(default)]
    pub teacher_name: String,
}

/// A scheduled exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub exam_date: Option<NaiveDate>,
}

/// A learning resource that can be recommended for a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningMaterial {
    pub id: i64,
    /// Matched case-insensitively against course names.
    pub course_keyword: String,
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub material_type: String,
    pub difficulty_tag: String,
}

/// Direction of a score movement between two periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

impl Trend {
    /// Changes within one point either way count as stable.
    pub const THRESHOLD: f64 = 1.0;

    /// Classify a score delta.
    pub fn from_delta(delta: f64) -> Self {
        if delta > Self::THRESHOLD {
            Trend::Rising
        } else if delta < -Self::THRESHOLD {
            Trend::Falling
        } else {
            Trend::Stable
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Rising => write!(f, "rising"),
            Trend::Falling => write!(f, "falling"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

impl FromStr for Trend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rising" | "up" => Ok(Trend::Rising),
            "falling" | "down" => Ok(Trend::Falling),
            "stable" => Ok(Trend::Stable),
            other => Err(format!("unknown trend: {other}")),
        }
    }
}

/// Direction of a rank movement. Rank 1 is the top, so a smaller rank
/// number is an upward move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankTrend {
    Up,
    Down,
    Stable,
}

impl RankTrend {
    /// Classify `previous_rank - current_rank`.
    pub fn from_rank_delta(rank_delta: i64) -> Self {
        match rank_delta {
            d if d > 0 => RankTrend::Up,
            d if d < 0 => RankTrend::Down,
            _ => RankTrend::Stable,
        }
    }
}

impl fmt::Display for RankTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankTrend::Up => write!(f, "up"),
            RankTrend::Down => write!(f, "down"),
            RankTrend::Stable => write!(f, "stable"),
        }
    }
}

/// Teacher-facing tag attached to each student flag row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StudentTag {
    AtRisk,
    Watch,
    Normal,
}

impl fmt::Display for StudentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudentTag::AtRisk => write!(f, "at-risk"),
            StudentTag::Watch => write!(f, "watch"),
            StudentTag::Normal => write!(f, "normal"),
        }
    }
}
