//! The `gradelens stats` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use gradelens_core::statistics::ScoreStats;
use gradelens_core::StatsScope;

use super::{percent, print_json, Session};

pub fn execute(
    session: &Session,
    course: Option<i64>,
    student: Option<i64>,
    class: Option<String>,
) -> Result<()> {
    let scope = match (course, student, class) {
        (Some(id), _, _) => StatsScope::Course(id),
        (_, Some(id), _) => StatsScope::Student(id),
        (_, _, Some(name)) => StatsScope::Class(name),
        _ => StatsScope::All,
    };

    let store = session.open_store()?;
    let stats = session.engine(&store)?.analyze(&scope);

    if session.is_json() {
        return print_json(&stats);
    }
    print_stats(&stats);
    Ok(())
}

fn print_stats(stats: &ScoreStats) {
    println!("{} ({} scores)", stats.label, stats.total_count);

    let mut table = Table::new();
    table.set_header(vec!["Average", "Highest", "Lowest", "Pass rate"]);
    table.add_row(vec![
        Cell::new(format!("{:.2}", stats.average)),
        Cell::new(format!("{:.2}", stats.highest)),
        Cell::new(format!("{:.2}", stats.lowest)),
        Cell::new(percent(stats.pass_rate)),
    ]);
    println!("{table}");

    let mut bands = Table::new();
    bands.set_header(vec!["Band", "Count"]);
    for (label, count) in stats.distribution.bands() {
        bands.add_row(vec![Cell::new(label), Cell::new(count)]);
    }
    println!("{bands}");
}
