//! In-memory store backed by a loaded [`Dataset`].

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;

use gradelens_core::traits::{MaterialCatalog, ScoreStore};
use gradelens_core::{Course, Exam, LearningMaterial, ScoreRecord, Student};

use crate::dataset::{load_dataset, Dataset};

/// Score store and material catalog over one dataset.
///
/// Score rows are joined with their course and exam once, at construction.
/// A row pointing at an unknown course keeps an empty course name; one
/// pointing at an unknown exam keeps its exam id without a name or date.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    students: Vec<Student>,
    courses: Vec<Course>,
    records: Vec<ScoreRecord>,
    materials: Vec<LearningMaterial>,
}

impl MemoryStore {
    pub fn from_dataset(dataset: Dataset) -> Self {
        let courses: HashMap<i64, &Course> = dataset.courses.iter().map(|c| (c.id, c)).collect();
        let exams: HashMap<i64, &Exam> = dataset.exams.iter().map(|e| (e.id, e)).collect();

        let records: Vec<ScoreRecord> = dataset
            .scores
            .iter()
            .map(|row| {
                let exam = row.exam_id.and_then(|id| exams.get(&id));
                ScoreRecord {
                    id: row.id,
                    student_id: row.student_id,
                    course_id: row.course_id,
                    course_name: courses
                        .get(&row.course_id)
                        .map(|c| c.name.clone())
                        .unwrap_or_default(),
                    exam_id: row.exam_id,
                    exam_name: exam.map(|e| e.name.clone()),
                    exam_date: exam.and_then(|e| e.exam_date),
                    recorded_at: row.recorded_at,
                    value: row.value,
                }
            })
            .collect();

        let mut materials = dataset.materials;
        materials.sort_by_key(|m| m.id);

        tracing::debug!(
            students = dataset.students.len(),
            scores = records.len(),
            materials = materials.len(),
            "dataset loaded into memory"
        );

        Self {
            students: dataset.students,
            courses: dataset.courses,
            records,
            materials,
        }
    }

    /// Load a dataset file or directory and build the store.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::from_dataset(load_dataset(path)?))
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    fn class_of(&self, student_id: i64) -> Option<&str> {
        self.students
            .iter()
            .find(|s| s.id == student_id)
            .map(|s| s.clazz.as_str())
    }

    fn filter_records(&self, keep: impl Fn(&ScoreRecord) -> bool) -> Vec<ScoreRecord> {
        self.records.iter().filter(|r| keep(*r)).cloned().collect()
    }
}

impl ScoreStore for MemoryStore {
    fn find_all(&self) -> Vec<ScoreRecord> {
        self.records.clone()
    }

    fn find_by_student(&self, student_id: i64) -> Vec<ScoreRecord> {
        self.filter_records(|r| r.student_id == student_id)
    }

    fn find_by_course(&self, course_id: i64) -> Vec<ScoreRecord> {
        self.filter_records(|r| r.course_id == course_id)
    }

    fn find_by_class(&self, class_name: &str) -> Vec<ScoreRecord> {
        self.filter_records(|r| self.class_of(r.student_id) == Some(class_name))
    }

    fn find_student(&self, student_id: i64) -> Option<Student> {
        self.students.iter().find(|s| s.id == student_id).cloned()
    }

    fn find_students_by_class(&self, class_name: &str) -> Vec<Student> {
        self.students
            .iter()
            .filter(|s| s.clazz == class_name)
            .cloned()
            .collect()
    }
}

impl MaterialCatalog for MemoryStore {
    fn find_by_keyword(&self, text: &str) -> Vec<LearningMaterial> {
        let needle = text.to_lowercase();
        self.materials
            .iter()
            .filter(|m| m.course_keyword.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    fn find_all_ordered(&self) -> Vec<LearningMaterial> {
        self.materials.clone()
    }
}
