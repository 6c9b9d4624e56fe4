//! Insight engine facade.
//!
//! Holds the store, catalog and reason generator and answers every
//! report request by loading the relevant records and handing them to the
//! pure functions in the sibling modules. Nothing is cached between calls.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::InsightError;
use crate::insight::{self, ClassOverview, StudentFlag};
use crate::recommend::{self, StudentRecommendations};
use crate::statistics::{self, ExamTrendPoint, RankEntry, ScoreStats};
use crate::traits::{LocalReasonGenerator, MaterialCatalog, ReasonGenerator, ScoreStore};

/// The scope a statistics request covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsScope {
    All,
    Course(i64),
    Student(i64),
    Class(String),
}

impl StatsScope {
    /// Label carried in the statistics payload.
    pub fn label(&self) -> String {
        match self {
            StatsScope::All => "All scores".to_string(),
            StatsScope::Course(_) => "Course scores".to_string(),
            StatsScope::Student(_) => "Student scores".to_string(),
            StatsScope::Class(name) => format!("Class {name} scores"),
        }
    }
}

/// Entry point for every analytics and insight request.
pub struct InsightEngine {
    store: Arc<dyn ScoreStore>,
    catalog: Arc<dyn MaterialCatalog>,
    reasons: Arc<dyn ReasonGenerator>,
}

impl InsightEngine {
    /// Engine that explains recommendations with the local fallback only.
    pub fn new(store: Arc<dyn ScoreStore>, catalog: Arc<dyn MaterialCatalog>) -> Self {
        Self {
            store,
            catalog,
            reasons: Arc::new(LocalReasonGenerator),
        }
    }

    pub fn with_reason_generator(mut self, reasons: Arc<dyn ReasonGenerator>) -> Self {
        self.reasons = reasons;
        self
    }

    /// Name of the active reason generator.
    pub fn reason_generator(&self) -> &str {
        self.reasons.name()
    }

    /// Flat statistics over one scope.
    pub fn analyze(&self, scope: &StatsScope) -> ScoreStats {
        let scores = match scope {
            StatsScope::All => self.store.find_all(),
            StatsScope::Course(id) => self.store.find_by_course(*id),
            StatsScope::Student(id) => self.store.find_by_student(*id),
            StatsScope::Class(name) => self.store.find_by_class(name),
        };
        tracing::debug!(scope = ?scope, scores = scores.len(), "analyzing scores");
        statistics::analyze_scores(&scores, &scope.label())
    }

    pub fn analyze_all(&self) -> ScoreStats {
        self.analyze(&StatsScope::All)
    }

    pub fn analyze_course(&self, course_id: i64) -> ScoreStats {
        self.analyze(&StatsScope::Course(course_id))
    }

    pub fn analyze_student(&self, student_id: i64) -> ScoreStats {
        self.analyze(&StatsScope::Student(student_id))
    }

    pub fn analyze_class(&self, class_name: &str) -> ScoreStats {
        self.analyze(&StatsScope::Class(class_name.to_string()))
    }

    /// Pass rate per course over every score.
    pub fn course_pass_rates(&self) -> BTreeMap<String, f64> {
        statistics::pass_rates_by_course(&self.store.find_all())
    }

    /// Per-exam averages over every score.
    pub fn exam_trend(&self) -> Vec<ExamTrendPoint> {
        let scores = self.store.find_all();
        tracing::debug!(scores = scores.len(), "building exam trend");
        statistics::exam_trend(&scores)
    }

    /// Per-exam averages over one student's own scores.
    pub fn student_exam_trend(&self, student_id: i64) -> Vec<ExamTrendPoint> {
        statistics::exam_trend(&self.store.find_by_student(student_id))
    }

    /// Rank every student in the store.
    pub fn student_rankings(&self) -> Vec<RankEntry> {
        statistics::student_rankings(&self.store.find_all())
    }

    pub fn class_overview(&self, class_name: &str) -> ClassOverview {
        let students = self.store.find_students_by_class(class_name);
        let scores = self.store.find_by_class(class_name);
        tracing::debug!(
            class = class_name,
            students = students.len(),
            scores = scores.len(),
            "composing class overview"
        );
        insight::class_overview(class_name, &students, &scores)
    }

    pub fn student_flags(&self, class_name: &str) -> Vec<StudentFlag> {
        let students = self.store.find_students_by_class(class_name);
        let scores = self.store.find_by_class(class_name);
        tracing::debug!(class = class_name, scores = scores.len(), "flagging students");
        insight::student_flags(&students, &scores)
    }

    /// Course recommendations for one student.
    ///
    /// Fails only when the student is unknown; reason generation never
    /// fails.
    pub async fn student_recommendations(
        &self,
        student_id: i64,
    ) -> Result<StudentRecommendations, InsightError> {
        let student = self
            .store
            .find_student(student_id)
            .ok_or(InsightError::StudentNotFound(student_id))?;
        let own = self.store.find_by_student(student_id);
        let class = self.store.find_by_class(&student.clazz);
        tracing::debug!(
            student_id,
            own = own.len(),
            class = class.len(),
            "building recommendations"
        );
        Ok(recommend::recommend(
            &student,
            &own,
            &class,
            self.catalog.as_ref(),
            self.reasons.as_ref(),
        )
        .await)
    }
}
