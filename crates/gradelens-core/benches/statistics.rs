use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chrono::NaiveDate;
use gradelens_core::insight::{class_overview, student_flags};
use gradelens_core::statistics::{analyze_scores, exam_trend, student_rankings};
use gradelens_core::{ScoreRecord, Student};

const COURSES: [&str; 5] = ["Math", "English", "Physics", "Chemistry", "History"];

/// Synthetic class: every student sits every course in each exam.
fn generate_class(students: i64, exams: i64) -> (Vec<Student>, Vec<ScoreRecord>) {
    let roster: Vec<Student> = (1..=students)
        .map(|id| Student {
            id,
            student_number: format!("S{id:05}"),
            name: format!("Student {id}"),
            clazz: "1A".into(),
            major: String::new(),
        })
        .collect();

    let start = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
    let mut scores = Vec::new();
    let mut next_id = 1;
    for exam in 0..exams {
        let exam_date = start + chrono::Duration::weeks(exam * 4);
        for student in &roster {
            for (course, name) in COURSES.iter().enumerate() {
                let value = ((student.id * 37 + exam * 11 + course as i64 * 7) % 61 + 40) as f64;
                scores.push(ScoreRecord {
                    id: next_id,
                    student_id: student.id,
                    course_id: course as i64 + 1,
                    course_name: name.to_string(),
                    exam_id: Some(exam + 1),
                    exam_name: Some(format!("Exam {}", exam + 1)),
                    exam_date: Some(exam_date),
                    recorded_at: None,
                    value,
                });
                next_id += 1;
            }
        }
    }
    (roster, scores)
}

fn bench_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("statistics");

    let (_, small) = generate_class(30, 4);
    let (_, large) = generate_class(500, 8);

    group.bench_function("analyze_600", |b| {
        b.iter(|| analyze_scores(black_box(&small), "All scores"))
    });

    group.bench_function("analyze_20000", |b| {
        b.iter(|| analyze_scores(black_box(&large), "All scores"))
    });

    group.bench_function("exam_trend_20000", |b| {
        b.iter(|| exam_trend(black_box(&large)))
    });

    group.bench_function("rankings_20000", |b| {
        b.iter(|| student_rankings(black_box(&large)))
    });

    group.finish();
}

fn bench_composers(c: &mut Criterion) {
    let mut group = c.benchmark_group("composers");

    let (roster, scores) = generate_class(40, 6);

    group.bench_function("class_overview_40", |b| {
        b.iter(|| class_overview("1A", black_box(&roster), black_box(&scores)))
    });

    group.bench_function("student_flags_40", |b| {
        b.iter(|| student_flags(black_box(&roster), black_box(&scores)))
    });

    group.finish();
}

criterion_group!(benches, bench_statistics, bench_composers);
criterion_main!(benches);
