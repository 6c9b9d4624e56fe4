//! Dataset sanity checks.
//!
//! The insight engine does not enforce referential integrity, so problems
//! in a dataset surface here as warnings instead of load failures.

use std::collections::HashSet;

use crate::dataset::Dataset;

/// A warning from dataset validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The offending row, e.g. `score #12` (if applicable).
    pub entity: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn new(entity: String, message: impl Into<String>) -> Self {
        Self {
            entity: Some(entity),
            message: message.into(),
        }
    }
}

fn check_duplicate_ids(
    kind: &str,
    ids: impl Iterator<Item = i64>,
    warnings: &mut Vec<ValidationWarning>,
) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            warnings.push(ValidationWarning::new(
                format!("{kind} #{id}"),
                format!("duplicate {kind} ID: {id}"),
            ));
        }
    }
}

/// Validate a dataset for common issues.
pub fn validate_dataset(dataset: &Dataset) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Duplicate ids per entity kind
    check_duplicate_ids("student", dataset.students.iter().map(|s| s.id), &mut warnings);
    check_duplicate_ids("course", dataset.courses.iter().map(|c| c.id), &mut warnings);
    check_duplicate_ids("exam", dataset.exams.iter().map(|e| e.id), &mut warnings);
    check_duplicate_ids("score", dataset.scores.iter().map(|s| s.id), &mut warnings);
    check_duplicate_ids("material", dataset.materials.iter().map(|m| m.id), &mut warnings);

    let students: HashSet<i64> = dataset.students.iter().map(|s| s.id).collect();
    let courses: HashSet<i64> = dataset.courses.iter().map(|c| c.id).collect();
    let exams: HashSet<i64> = dataset.exams.iter().map(|e| e.id).collect();

    for student in &dataset.students {
        if student.clazz.trim().is_empty() {
            warnings.push(ValidationWarning::new(
                format!("student #{}", student.id),
                "class name is empty",
            ));
        }
    }

    for score in &dataset.scores {
        let entity = format!("score #{}", score.id);
        if !(0.0..=100.0).contains(&score.value) {
            warnings.push(ValidationWarning::new(
                entity.clone(),
                format!("value {} is outside 0-100", score.value),
            ));
        }
        if !students.contains(&score.student_id) {
            warnings.push(ValidationWarning::new(
                entity.clone(),
                format!("unknown student ID: {}", score.student_id),
            ));
        }
        if !courses.contains(&score.course_id) {
            warnings.push(ValidationWarning::new(
                entity.clone(),
                format!("unknown course ID: {}", score.course_id),
            ));
        }
        if let Some(exam_id) = score.exam_id {
            if !exams.contains(&exam_id) {
                warnings.push(ValidationWarning::new(
                    entity.clone(),
                    format!("unknown exam ID: {exam_id}"),
                ));
            }
        } else if score.recorded_at.is_none() {
            warnings.push(ValidationWarning::new(
                entity,
                "no exam and no recordedAt; excluded from trend views",
            ));
        }
    }

    for material in &dataset.materials {
        if material.course_keyword.trim().is_empty() {
            warnings.push(ValidationWarning::new(
                format!("material #{}", material.id),
                "course keyword is empty; it can only appear as a fallback",
            ));
        }
    }

    warnings
}
