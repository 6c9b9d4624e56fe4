//! Class-level teaching insights: the class overview and per-student flags.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::{RankTrend, ScoreRecord, Student, StudentTag, Trend};
use crate::risk::is_at_risk;
use crate::snapshot::{Cohorts, StudentExamSnapshot};
use crate::statistics::{group_by, mean, percentage, rank_averages, round2, ScoreBucket};

/// Number of weakest subjects reported in a class overview.
pub const WEAK_SUBJECT_LIMIT: usize = 3;

/// One of the lowest-scoring subjects of a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeakSubject {
    pub course_name: String,
    pub average: f64,
}

/// Class report built from the latest exam cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassOverview {
    pub class_name: String,
    pub student_count: usize,
    pub class_average: f64,
    pub overall_pass_rate: f64,
    pub trend: Trend,
    pub trend_value: f64,
    pub risk_student_ratio: f64,
    pub risk_student_count: usize,
    pub subject_pass_rates: BTreeMap<String, f64>,
    pub weak_subjects: Vec<WeakSubject>,
    pub summary: Vec<String>,
}

/// Compose the overview of one class.
///
/// `students` is the class roster and `scores` every score of the class.
/// Averages, pass rates and subjects use the latest cohort only; risk uses
/// each roster student's own history.
pub fn class_overview(class_name: &str, students: &[Student], scores: &[ScoreRecord]) -> ClassOverview {
    let refs: Vec<&ScoreRecord> = scores.iter().collect();
    let cohorts = Cohorts::split(&refs);

    let latest: ScoreBucket = cohorts.latest.iter().copied().collect();
    let class_average = latest.average();
    let previous_average = if cohorts.previous.is_empty() {
        class_average
    } else {
        mean(cohorts.previous.iter().map(|s| s.value))
    };
    let trend_value = class_average - previous_average;
    let trend = Trend::from_delta(trend_value);

    let by_student: HashMap<i64, Vec<&ScoreRecord>> =
        group_by(scores, |s| s.student_id).into_iter().collect();
    let risk_student_count = students
        .iter()
        .filter(|student| {
            let snapshot = by_student
                .get(&student.id)
                .map(|own| StudentExamSnapshot::build(own))
                .unwrap_or_default();
            is_at_risk(&snapshot.current_scores, snapshot.delta_average)
        })
        .count();
    let risk_student_ratio = percentage(risk_student_count, students.len());

    let by_subject = group_by(cohorts.latest.iter().copied(), |s| s.course_name.clone());
    let subject_pass_rates = by_subject
        .iter()
        .map(|(name, group)| {
            let bucket: ScoreBucket = group.iter().copied().collect();
            (name.clone(), round2(bucket.pass_rate()))
        })
        .collect();

    let mut subject_averages: Vec<(String, f64)> = by_subject
        .into_iter()
        .map(|(name, group)| (name, mean(group.iter().map(|s| s.value))))
        .collect();
    subject_averages.sort_by(|a, b| a.1.total_cmp(&b.1));
    let weak_subjects = subject_averages
        .into_iter()
        .take(WEAK_SUBJECT_LIMIT)
        .map(|(course_name, average)| WeakSubject {
            course_name,
            average: round2(average),
        })
        .collect();

    let class_average = round2(class_average);
    let risk_student_ratio = round2(risk_student_ratio);
    let summary = vec![
        format!("Class average: {class_average:.2}"),
        format!("Trend: {trend}"),
        format!("At-risk ratio: {risk_student_ratio:.2}%"),
    ];

    ClassOverview {
        class_name: class_name.to_string(),
        student_count: students.len(),
        class_average,
        overall_pass_rate: round2(latest.pass_rate()),
        trend,
        trend_value: round2(trend_value),
        risk_student_ratio,
        risk_student_count,
        subject_pass_rates,
        weak_subjects,
        summary,
    }
}

/// Rank movement and risk tag of one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentFlag {
    pub student_id: i64,
    pub student_name: String,
    pub current_average: f64,
    pub previous_average: f64,
    pub score_delta: f64,
    pub current_rank: usize,
    pub previous_rank: usize,
    pub rank_trend: RankTrend,
    /// `previous_rank - current_rank`; positive means the student moved up.
    pub rank_delta: i64,
    pub risk: bool,
    pub tag: StudentTag,
}

/// Flag every student of a class that has at least one score.
///
/// Rows come back risk-flagged first, then by ascending score delta so the
/// steepest declines lead each group.
pub fn student_flags(students: &[Student], scores: &[ScoreRecord]) -> Vec<StudentFlag> {
    let snapshots: Vec<(i64, StudentExamSnapshot<'_>)> = group_by(scores, |s| s.student_id)
        .into_iter()
        .map(|(id, own)| (id, StudentExamSnapshot::build(&own)))
        .collect();

    let current_rank = rank_map(snapshots.iter().map(|(id, s)| (*id, s.current_average)));
    let previous_rank = rank_map(snapshots.iter().map(|(id, s)| (*id, s.previous_average)));
    let names: HashMap<i64, &str> = students.iter().map(|s| (s.id, s.name.as_str())).collect();

    let mut rows: Vec<StudentFlag> = snapshots
        .iter()
        .map(|(student_id, snapshot)| {
            let current = current_rank.get(student_id).copied().unwrap_or(0);
            let previous = previous_rank.get(student_id).copied().unwrap_or(current);
            let rank_delta = previous as i64 - current as i64;
            let rank_trend = RankTrend::from_rank_delta(rank_delta);
            let risk = is_at_risk(&snapshot.current_scores, snapshot.delta_average);
            let tag = if risk {
                StudentTag::AtRisk
            } else if rank_trend == RankTrend::Down {
                StudentTag::Watch
            } else {
                StudentTag::Normal
            };

            StudentFlag {
                student_id: *student_id,
                student_name: student_name(&names, *student_id),
                current_average: round2(snapshot.current_average),
                previous_average: round2(snapshot.previous_average),
                score_delta: round2(snapshot.current_average - snapshot.previous_average),
                current_rank: current,
                previous_rank: previous,
                rank_trend,
                rank_delta,
                risk,
                tag,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.risk.cmp(&a.risk).then(a.score_delta.total_cmp(&b.score_delta)));
    rows
}

fn rank_map(averages: impl Iterator<Item = (i64, f64)>) -> HashMap<i64, usize> {
    rank_averages(averages.collect())
        .into_iter()
        .map(|entry| (entry.student_id, entry.rank))
        .collect()
}

fn student_name(names: &HashMap<i64, &str>, student_id: i64) -> String {
    match names.get(&student_id) {
        Some(name) => name.to_string(),
        None => {
            warn!(student_id, "scored student missing from class roster");
            format!("student #{student_id}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::fixtures::*;

    fn student(id: i64, name: &str) -> Student {
        Student {
            id,
            student_number: format!("S{id:03}"),
            name: name.into(),
            clazz: "1A".into(),
            major: String::new(),
        }
    }

    #[test]
    fn overview_half_the_class_at_risk() {
        let d = date(2024, 3, 1);
        let students = [student(1, "Ada"), student(2, "Ben")];
        let scores = [
            dated(1, 1, "Math", 45.0, d),
            dated(2, 1, "English", 55.0, d),
            dated(3, 1, "Physics", 65.0, d),
            dated(4, 2, "Math", 80.0, d),
            dated(5, 2, "English", 85.0, d),
            dated(6, 2, "Physics", 90.0, d),
        ];
        let overview = class_overview("1A", &students, &scores);

        assert_eq!(overview.student_count, 2);
        assert_eq!(overview.risk_student_count, 1);
        assert_eq!(overview.risk_student_ratio, 50.0);
        assert_eq!(overview.class_average, 70.0);
        assert_eq!(overview.overall_pass_rate, 66.67);
        assert_eq!(overview.trend, Trend::Stable);
        assert_eq!(overview.trend_value, 0.0);
        assert_eq!(overview.subject_pass_rates["Math"], 50.0);
        assert_eq!(overview.subject_pass_rates["Physics"], 100.0);

        let weak: Vec<&str> = overview
            .weak_subjects
            .iter()
            .map(|w| w.course_name.as_str())
            .collect();
        assert_eq!(weak, vec!["Math", "English", "Physics"]);
        assert_eq!(overview.weak_subjects[0].average, 62.5);

        assert_eq!(
            overview.summary,
            vec![
                "Class average: 70.00".to_string(),
                "Trend: stable".to_string(),
                "At-risk ratio: 50.00%".to_string(),
            ]
        );
    }

    #[test]
    fn overview_uses_latest_cohort_and_trend() {
        let old = date(2024, 1, 10);
        let mid = date(2024, 3, 1);
        let new = date(2024, 6, 1);
        let students = [student(1, "Ada"), student(2, "Ben"), student(3, "Cy")];
        let scores = [
            dated(1, 1, "Math", 10.0, old),
            dated(2, 1, "Math", 60.0, mid),
            dated(3, 2, "Math", 60.0, mid),
            dated(4, 1, "Math", 70.0, new),
            dated(5, 2, "English", 70.0, new),
            score(6, 2, "Physics", 0.0),
        ];
        let overview = class_overview("1A", &students, &scores);

        assert_eq!(overview.class_average, 70.0);
        assert_eq!(overview.overall_pass_rate, 100.0);
        assert_eq!(overview.trend, Trend::Rising);
        assert_eq!(overview.trend_value, 10.0);
        assert_eq!(overview.student_count, 3);
        assert_eq!(overview.risk_student_count, 0);
        assert_eq!(overview.subject_pass_rates.len(), 2);
        assert!(!overview.subject_pass_rates.contains_key("Physics"));
    }

    #[test]
    fn overview_reports_three_weakest_subjects() {
        let d = date(2024, 3, 1);
        let scores = [
            dated(1, 1, "Math", 90.0, d),
            dated(2, 1, "English", 70.0, d),
            dated(3, 1, "Physics", 80.0, d),
            dated(4, 1, "Chemistry", 60.0, d),
        ];
        let overview = class_overview("1A", &[student(1, "Ada")], &scores);
        let weak: Vec<&str> = overview
            .weak_subjects
            .iter()
            .map(|w| w.course_name.as_str())
            .collect();
        assert_eq!(weak, vec!["Chemistry", "English", "Physics"]);
    }

    #[test]
    fn overview_of_empty_class() {
        let overview = class_overview("9Z", &[], &[]);
        assert_eq!(overview.class_name, "9Z");
        assert_eq!(overview.student_count, 0);
        assert_eq!(overview.class_average, 0.0);
        assert_eq!(overview.overall_pass_rate, 0.0);
        assert_eq!(overview.risk_student_ratio, 0.0);
        assert_eq!(overview.trend, Trend::Stable);
        assert!(overview.subject_pass_rates.is_empty());
        assert!(overview.weak_subjects.is_empty());
        assert_eq!(overview.summary[0], "Class average: 0.00");
    }

    #[test]
    fn overview_serializes_wire_names() {
        let overview = class_overview("1A", &[], &[]);
        let value = serde_json::to_value(&overview).unwrap();
        assert_eq!(value["className"], "1A");
        assert_eq!(value["trend"], "stable");
        assert!(value["subjectPassRates"].is_object());
        assert!(value["weakSubjects"].is_array());
        assert!(value.get("riskStudentRatio").is_some());
    }

    #[test]
    fn flags_rank_movement_and_order() {
        let d1 = date(2024, 3, 1);
        let d2 = date(2024, 6, 1);
        let students = [student(1, "Ada"), student(2, "Ben"), student(3, "Cy")];
        let scores = [
            dated(1, 1, "Math", 80.0, d1),
            dated(2, 1, "Math", 70.0, d2),
            dated(3, 2, "Math", 60.0, d1),
            dated(4, 2, "Math", 90.0, d2),
            dated(5, 3, "Math", 70.0, d1),
            dated(6, 3, "Math", 72.0, d2),
            dated(7, 4, "Math", 75.0, d1),
            dated(8, 4, "Math", 71.0, d2),
        ];
        let flags = student_flags(&students, &scores);

        let order: Vec<i64> = flags.iter().map(|f| f.student_id).collect();
        assert_eq!(order, vec![1, 4, 3, 2]);

        let ada = &flags[0];
        assert!(ada.risk);
        assert_eq!(ada.tag, StudentTag::AtRisk);
        assert_eq!(ada.current_rank, 4);
        assert_eq!(ada.previous_rank, 1);
        assert_eq!(ada.rank_delta, -3);
        assert_eq!(ada.rank_trend, RankTrend::Down);
        assert_eq!(ada.score_delta, -10.0);

        let fourth = &flags[1];
        assert!(!fourth.risk);
        assert_eq!(fourth.tag, StudentTag::Watch);
        assert_eq!(fourth.student_name, "student #4");
        assert_eq!(fourth.score_delta, -4.0);

        let cy = &flags[2];
        assert_eq!(cy.rank_trend, RankTrend::Up);
        assert_eq!(cy.tag, StudentTag::Normal);

        let ben = &flags[3];
        assert_eq!(ben.student_name, "Ben");
        assert_eq!(ben.current_rank, 1);
        assert_eq!(ben.previous_rank, 4);
        assert_eq!(ben.rank_delta, 3);
        assert_eq!(ben.current_average, 90.0);
        assert_eq!(ben.previous_average, 60.0);
    }

    #[test]
    fn flags_single_date_is_stable() {
        let d = date(2024, 3, 1);
        let scores = [dated(1, 1, "Math", 88.0, d), dated(2, 2, "Math", 77.0, d)];
        let flags = student_flags(&[student(1, "Ada"), student(2, "Ben")], &scores);
        for flag in &flags {
            assert_eq!(flag.previous_average, flag.current_average);
            assert_eq!(flag.rank_delta, 0);
            assert_eq!(flag.rank_trend, RankTrend::Stable);
            assert_eq!(flag.tag, StudentTag::Normal);
        }
    }

    #[test]
    fn flags_skip_students_without_scores() {
        let flags = student_flags(&[student(1, "Ada")], &[]);
        assert!(flags.is_empty());
    }
}
