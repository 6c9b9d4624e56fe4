//! Per-course study recommendations for one student.

use std::collections::HashMap;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{LearningMaterial, ScoreRecord, Student, Trend};
use crate::snapshot::course_snapshots;
use crate::statistics::round2;
use crate::traits::{MaterialCatalog, ReasonContext, ReasonGenerator};

/// Catalog entries used when nothing matches the course name.
pub const FALLBACK_MATERIAL_COUNT: usize = 2;

/// Most materials attached to one recommendation.
pub const MATERIAL_VIEW_LIMIT: usize = 3;

/// The slice of a learning material shown next to a recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialView {
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub material_type: String,
    pub difficulty: String,
}

impl From<&LearningMaterial> for MaterialView {
    fn from(material: &LearningMaterial) -> Self {
        Self {
            title: material.title.clone(),
            url: material.url.clone(),
            material_type: material.material_type.clone(),
            difficulty: material.difficulty_tag.clone(),
        }
    }
}

/// Recommendation for one course the student has been scored in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecommendation {
    pub course_id: i64,
    pub course_name: String,
    pub current_score: f64,
    pub class_average: f64,
    pub difference_with_class_avg: f64,
    pub trend: Trend,
    pub trend_delta: f64,
    pub reason: String,
    pub materials: Vec<MaterialView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecommendations {
    pub student_id: i64,
    pub student_name: String,
    pub clazz: String,
    pub recommendations: Vec<CourseRecommendation>,
}

/// A recommendation whose reason has not been generated yet.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationDraft {
    pub recommendation: CourseRecommendation,
    pub context: ReasonContext,
}

/// Materials for a course: keyword matches first, else the head of the
/// catalog. Capped at [`MATERIAL_VIEW_LIMIT`].
pub fn select_materials(catalog: &dyn MaterialCatalog, course_name: &str) -> Vec<MaterialView> {
    let mut materials = catalog.find_by_keyword(course_name);
    if materials.is_empty() {
        materials = catalog
            .find_all_ordered()
            .into_iter()
            .take(FALLBACK_MATERIAL_COUNT)
            .collect();
    }
    materials
        .iter()
        .take(MATERIAL_VIEW_LIMIT)
        .map(MaterialView::from)
        .collect()
}

/// Build one draft per course in `student_scores`, in first-appearance
/// order.
///
/// `class_scores` supplies the class average of each course; a course the
/// class has no data for compares against the student's own latest score.
pub fn draft_recommendations(
    student: &Student,
    student_scores: &[ScoreRecord],
    class_scores: &[ScoreRecord],
    catalog: &dyn MaterialCatalog,
) -> Vec<RecommendationDraft> {
    let own: Vec<&ScoreRecord> = student_scores.iter().collect();
    let class: Vec<&ScoreRecord> = class_scores.iter().collect();
    let class_snapshots: HashMap<i64, f64> = course_snapshots(&class)
        .into_iter()
        .map(|(course_id, snapshot)| (course_id, snapshot.latest_average))
        .collect();

    course_snapshots(&own)
        .into_iter()
        .map(|(course_id, snapshot)| {
            let latest = snapshot.latest_score;
            let class_avg = class_snapshots.get(&course_id).copied().unwrap_or(latest.value);
            let difference = latest.value - class_avg;
            let trend = Trend::from_delta(snapshot.delta);
            let materials = select_materials(catalog, &latest.course_name);

            let context = ReasonContext {
                student_id: student.id,
                student_name: student.name.clone(),
                course: latest.course_name.clone(),
                trend,
                score: latest.value,
                class_avg,
                difference_with_class_avg: difference,
                materials: materials.iter().map(|m| m.title.clone()).collect(),
                prompt_override: None,
            };
            let recommendation = CourseRecommendation {
                course_id,
                course_name: latest.course_name.clone(),
                current_score: round2(latest.value),
                class_average: round2(class_avg),
                difference_with_class_avg: round2(difference),
                trend,
                trend_delta: round2(snapshot.delta),
                reason: String::new(),
                materials,
            };
            RecommendationDraft {
                recommendation,
                context,
            }
        })
        .collect()
}

/// Draft every course recommendation and fill in the reasons.
///
/// Reasons for different courses are requested concurrently.
pub async fn recommend(
    student: &Student,
    student_scores: &[ScoreRecord],
    class_scores: &[ScoreRecord],
    catalog: &dyn MaterialCatalog,
    reasons: &dyn ReasonGenerator,
) -> StudentRecommendations {
    let drafts = draft_recommendations(student, student_scores, class_scores, catalog);
    debug!(
        student_id = student.id,
        courses = drafts.len(),
        generator = reasons.name(),
        "requesting recommendation reasons"
    );

    let texts = join_all(drafts.iter().map(|d| reasons.reason(&d.context))).await;
    let recommendations = drafts
        .into_iter()
        .zip(texts)
        .map(|(draft, reason)| CourseRecommendation {
            reason,
            ..draft.recommendation
        })
        .collect();

    StudentRecommendations {
        student_id: student.id,
        student_name: student.name.clone(),
        clazz: student.clazz.clone(),
        recommendations,
    }
}
