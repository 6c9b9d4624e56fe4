//! Dataset files.
//!
//! A dataset holds the rows a school export produces: students, courses,
//! exams, scores and learning materials. Files are JSON or TOML, picked by
//! extension, with camelCase keys. Dates are ISO strings (`"2024-03-01"`,
//! `"2024-03-01T09:30:00"`); in TOML they must be quoted.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use gradelens_core::{Course, Exam, LearningMaterial, Student};

/// One raw score row, referencing its student, course and exam by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRow {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    #[serde(default)]
    pub exam_id: Option<i64>,
    pub value: f64,
    #[serde(default)]
    pub recorded_at: Option<NaiveDateTime>,
}

/// Everything loaded from one or more dataset files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub students: Vec<Student>,
    pub courses: Vec<Course>,
    pub exams: Vec<Exam>,
    pub scores: Vec<ScoreRow>,
    pub materials: Vec<LearningMaterial>,
}

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Json,
    Toml,
}

impl DatasetFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(DatasetFormat::Json),
            "toml" => Some(DatasetFormat::Toml),
            _ => None,
        }
    }
}

impl Dataset {
    /// Append every row of `other`.
    pub fn merge(&mut self, other: Dataset) {
        self.students.extend(other.students);
        self.courses.extend(other.courses);
        self.exams.extend(other.exams);
        self.scores.extend(other.scores);
        self.materials.extend(other.materials);
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
            && self.courses.is_empty()
            && self.exams.is_empty()
            && self.scores.is_empty()
            && self.materials.is_empty()
    }
}

/// Parse a single dataset file.
pub fn parse_dataset(path: &Path) -> Result<Dataset> {
    let format = DatasetFormat::from_path(path).with_context(|| {
        format!(
            "unsupported dataset file (expected .json or .toml): {}",
            path.display()
        )
    })?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset file: {}", path.display()))?;

    parse_dataset_str(&content, format, path)
}

/// Parse dataset text (useful for testing).
pub fn parse_dataset_str(content: &str, format: DatasetFormat, source_path: &Path) -> Result<Dataset> {
    match format {
        DatasetFormat::Json => serde_json::from_str(content)
            .with_context(|| format!("failed to parse JSON: {}", source_path.display())),
        DatasetFormat::Toml => toml::from_str(content)
            .with_context(|| format!("failed to parse TOML: {}", source_path.display())),
    }
}

/// Recursively load and merge every dataset file under a directory.
///
/// Files that fail to parse are skipped with a warning. Files are visited
/// in name order so merged row order is stable.
pub fn load_dataset_directory(dir: &Path) -> Result<Dataset> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        paths.push(entry?.path());
    }
    paths.sort();

    let mut dataset = Dataset::default();
    for path in paths {
        if path.is_dir() {
            dataset.merge(load_dataset_directory(&path)?);
        } else if DatasetFormat::from_path(&path).is_some() {
            match parse_dataset(&path) {
                Ok(part) => dataset.merge(part),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(dataset)
}

/// Load a dataset from a file or a directory of files.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    if path.is_dir() {
        load_dataset_directory(path)
    } else {
        parse_dataset(path)
    }
}
