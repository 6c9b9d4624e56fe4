//! The `gradelens exams` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use super::{percent, print_json, student_name, Session};

pub fn execute(session: &Session, student: Option<i64>) -> Result<()> {
    let store = session.open_store()?;
    let engine = session.engine(&store)?;
    let points = match student {
        Some(id) => engine.student_exam_trend(id),
        None => engine.exam_trend(),
    };

    if session.is_json() {
        return print_json(&points);
    }

    if let Some(id) = student {
        println!("Exam trend for {}", student_name(&store, id));
    }
    if points.is_empty() {
        println!("No exam scores recorded.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Exam", "Date", "Average", "Pass rate"]);
    for point in &points {
        table.add_row(vec![
            Cell::new(&point.label),
            Cell::new(
                point
                    .exam_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(format!("{:.2}", point.average)),
            Cell::new(percent(point.pass_rate)),
        ]);
    }
    println!("{table}");
    Ok(())
}
