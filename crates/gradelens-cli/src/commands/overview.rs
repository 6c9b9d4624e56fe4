//! The `gradelens overview` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use super::{percent, print_json, Session};

pub fn execute(session: &Session, class_name: &str) -> Result<()> {
    let store = session.open_store()?;
    let overview = session.engine(&store)?.class_overview(class_name);

    if session.is_json() {
        return print_json(&overview);
    }

    println!(
        "Class {} ({} students)",
        overview.class_name, overview.student_count
    );

    let mut table = Table::new();
    table.set_header(vec!["Average", "Pass rate", "Trend", "At risk"]);
    table.add_row(vec![
        Cell::new(format!("{:.2}", overview.class_average)),
        Cell::new(percent(overview.overall_pass_rate)),
        Cell::new(format!("{} ({:+.2})", overview.trend, overview.trend_value)),
        Cell::new(format!(
            "{} ({})",
            overview.risk_student_count,
            percent(overview.risk_student_ratio)
        )),
    ]);
    println!("{table}");

    if !overview.subject_pass_rates.is_empty() {
        let mut subjects = Table::new();
        subjects.set_header(vec!["Subject", "Pass rate"]);
        for (name, rate) in &overview.subject_pass_rates {
            subjects.add_row(vec![Cell::new(name), Cell::new(percent(*rate))]);
        }
        println!("{subjects}");
    }

    if !overview.weak_subjects.is_empty() {
        println!("\nWeakest subjects:");
        for weak in &overview.weak_subjects {
            println!("  {} ({:.2})", weak.course_name, weak.average);
        }
    }

    println!();
    for line in &overview.summary {
        println!("{line}");
    }
    Ok(())
}
