//! Collaborator traits for storage, the material catalog and the reason
//! generator.
//!
//! `gradelens-store` implements the storage traits and `gradelens-reason`
//! implements the remote reason generator. The engine only ever sees these
//! trait objects.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::{LearningMaterial, ScoreRecord, Student, Trend};

// ---------------------------------------------------------------------------
// Storage traits
// ---------------------------------------------------------------------------

/// Read access to persisted scores and students.
///
/// Results are authoritative at call time; the engine never caches them.
pub trait ScoreStore: Send + Sync {
    /// Every score record.
    fn find_all(&self) -> Vec<ScoreRecord>;

    /// Scores of one student.
    fn find_by_student(&self, student_id: i64) -> Vec<ScoreRecord>;

    /// Scores of one course.
    fn find_by_course(&self, course_id: i64) -> Vec<ScoreRecord>;

    /// Scores of every student whose class is `class_name`.
    fn find_by_class(&self, class_name: &str) -> Vec<ScoreRecord>;

    /// Look up a student, `None` if unknown.
    fn find_student(&self, student_id: i64) -> Option<Student>;

    /// The roster of one class.
    fn find_students_by_class(&self, class_name: &str) -> Vec<Student>;
}

/// Read access to learning materials.
pub trait MaterialCatalog: Send + Sync {
    /// Materials whose course keyword contains `text`, ignoring case,
    /// ordered by id.
    fn find_by_keyword(&self, text: &str) -> Vec<LearningMaterial>;

    /// The whole catalog ordered by id.
    fn find_all_ordered(&self) -> Vec<LearningMaterial>;
}

// ---------------------------------------------------------------------------
// Reason generator
// ---------------------------------------------------------------------------

/// Everything a reason generator may use to explain one recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasonContext {
    pub student_id: i64,
    pub student_name: String,
    pub course: String,
    pub trend: Trend,
    pub score: f64,
    pub class_avg: f64,
    pub difference_with_class_avg: f64,
    /// Titles of the materials attached to the recommendation.
    #[serde(default)]
    pub materials: Vec<String>,
    /// Replaces the configured prompt for this request only.
    #[serde(default)]
    pub prompt_override: Option<String>,
}

/// Produces the human-readable reason attached to a recommendation.
///
/// Implementations never fail: anything that goes wrong must end in
/// [`fallback_reason`].
#[async_trait]
pub trait ReasonGenerator: Send + Sync {
    /// Short generator name for logs (e.g. "http", "local").
    fn name(&self) -> &str;

    /// Build the reason text for one recommendation.
    async fn reason(&self, context: &ReasonContext) -> String;
}

/// Gap to the class average that counts as clearly behind or ahead.
const CLASS_GAP_THRESHOLD: f64 = 8.0;

/// Deterministic reason used when no remote generator answers.
pub fn fallback_reason(context: &ReasonContext) -> String {
    let course = if context.course.trim().is_empty() {
        "this course"
    } else {
        context.course.trim()
    };
    let gap = context.difference_with_class_avg;

    if context.trend == Trend::Falling || gap <= -CLASS_GAP_THRESHOLD {
        format!(
            "Below the class average in {course} and trending down; \
             rebuild the fundamentals and review past mistakes first."
        )
    } else if context.trend == Trend::Rising || gap >= CLASS_GAP_THRESHOLD {
        format!(
            "Improving steadily in {course}; schedule advanced practice \
             to consolidate the lead."
        )
    } else {
        format!("Performance in {course} is stable; keep a weekly review routine.")
    }
}

/// Generator that always answers with [`fallback_reason`].
///
/// Used when no remote generator is configured.
pub struct LocalReasonGenerator;

#[async_trait]
impl ReasonGenerator for LocalReasonGenerator {
    fn name(&self) -> &str {
        "local"
    }

    async fn reason(&self, context: &ReasonContext) -> String {
        fallback_reason(context)
    }
}

/// In-memory collaborators for unit tests.
#[cfg(test)]
pub(crate) mod doubles {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct Scores {
        pub students: Vec<Student>,
        pub scores: Vec<ScoreRecord>,
    }

    impl Scores {
        fn class_of(&self, student_id: i64) -> Option<&str> {
            self.students
                .iter()
                .find(|s| s.id == student_id)
                .map(|s| s.clazz.as_str())
        }
    }

    impl ScoreStore for Scores {
        fn find_all(&self) -> Vec<ScoreRecord> {
            self.scores.clone()
        }

        fn find_by_student(&self, student_id: i64) -> Vec<ScoreRecord> {
            self.scores
                .iter()
                .filter(|s| s.student_id == student_id)
                .cloned()
                .collect()
        }

        fn find_by_course(&self, course_id: i64) -> Vec<ScoreRecord> {
            self.scores
                .iter()
                .filter(|s| s.course_id == course_id)
                .cloned()
                .collect()
        }

        fn find_by_class(&self, class_name: &str) -> Vec<ScoreRecord> {
            self.scores
                .iter()
                .filter(|s| self.class_of(s.student_id) == Some(class_name))
                .cloned()
                .collect()
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

    #[derive(Default)]
    pub struct Catalog(pub Vec<LearningMaterial>);

    impl Catalog {
        pub fn material(id: i64, keyword: &str, title: &str) -> LearningMaterial {
            LearningMaterial {
                id,
                course_keyword: keyword.into(),
                title: title.into(),
                url: format!("https://learn.example.org/{id}"),
                material_type: "article".into(),
                difficulty_tag: "basic".into(),
            }
        }
    }

    impl MaterialCatalog for Catalog {
        fn find_by_keyword(&self, text: &str) -> Vec<LearningMaterial> {
            let needle = text.to_lowercase();
            let mut found: Vec<LearningMaterial> = self
                .0
                .iter()
                .filter(|m| m.course_keyword.to_lowercase().contains(&needle))
                .cloned()
                .collect();
            found.sort_by_key(|m| m.id);
            found
        }

        fn find_all_ordered(&self) -> Vec<LearningMaterial> {
            let mut all = self.0.clone();
            all.sort_by_key(|m| m.id);
            all
        }
    }

    /// Answers with a fixed text and records every context it saw.
    pub struct Recording {
        pub answer: String,
        pub seen: Mutex<Vec<ReasonContext>>,
    }

    impl Recording {
        pub fn new(answer: &str) -> Self {
            Self {
                answer: answer.into(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ReasonGenerator for Recording {
        fn name(&self) -> &str {
            "recording"
        }

        async fn reason(&self, context: &ReasonContext) -> String {
            self.seen.lock().unwrap().push(context.clone());
            self.answer.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(trend: Trend, gap: f64) -> ReasonContext {
        ReasonContext {
            student_id: 1,
            student_name: "Ada".into(),
            course: "Math".into(),
            trend,
            score: 70.0,
            class_avg: 70.0 - gap,
            difference_with_class_avg: gap,
            materials: vec![],
            prompt_override: None,
        }
    }

    #[test]
    fn fallback_falling_or_far_behind() {
        let a = fallback_reason(&context(Trend::Falling, 0.0));
        let b = fallback_reason(&context(Trend::Stable, -8.0));
        assert!(a.starts_with("Below the class average in Math"));
        assert_eq!(a, b);
    }

    #[test]
    fn fallback_rising_or_far_ahead() {
        let a = fallback_reason(&context(Trend::Rising, 0.0));
        let b = fallback_reason(&context(Trend::Stable, 8.0));
        assert!(a.starts_with("Improving steadily in Math"));
        assert_eq!(a, b);
    }

    #[test]
    fn fallback_falling_wins_over_ahead() {
        let reason = fallback_reason(&context(Trend::Falling, 12.0));
        assert!(reason.starts_with("Below"));
    }

    #[test]
    fn fallback_stable() {
        let reason = fallback_reason(&context(Trend::Stable, 7.9));
        assert!(reason.contains("stable"));
    }

    #[test]
    fn fallback_blank_course() {
        let mut ctx = context(Trend::Stable, 0.0);
        ctx.course = "  ".into();
        assert!(fallback_reason(&ctx).contains("this course"));
    }

    #[tokio::test]
    async fn local_generator_uses_fallback() {
        let ctx = context(Trend::Rising, 2.0);
        let reason = LocalReasonGenerator.reason(&ctx).await;
        assert_eq!(reason, fallback_reason(&ctx));
        assert_eq!(LocalReasonGenerator.name(), "local");
    }
}
