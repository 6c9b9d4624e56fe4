//! The `gradelens recommend` command.

use anyhow::Result;

use gradelens_core::recommend::StudentRecommendations;

use super::{print_json, Session};

pub async fn execute(session: &Session, student_id: i64) -> Result<()> {
    let store = session.open_store()?;
    let engine = session.engine(&store)?;
    tracing::debug!(generator = engine.reason_generator(), "recommending");

    let result = engine.student_recommendations(student_id).await?;

    if session.is_json() {
        return print_json(&result);
    }
    print_recommendations(&result);
    Ok(())
}

fn print_recommendations(result: &StudentRecommendations) {
    println!("{} ({})", result.student_name, result.clazz);

    if result.recommendations.is_empty() {
        println!("No scores recorded for {}.", result.student_name);
        return;
    }

    for rec in &result.recommendations {
        println!(
            "\n{}: {:.2} (class {:.2}, {:+.2}), {} {:+.2}",
            rec.course_name,
            rec.current_score,
            rec.class_average,
            rec.difference_with_class_avg,
            rec.trend,
            rec.trend_delta
        );
        println!("  {}", rec.reason);
        for material in &rec.materials {
            println!(
                "  - {} <{}> [{}, {}]",
                material.title, material.url, material.material_type, material.difficulty
            );
        }
    }
}
