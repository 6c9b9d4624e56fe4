//! The `gradelens rankings` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use super::{print_json, student_name, Session};

pub fn execute(session: &Session) -> Result<()> {
    let store = session.open_store()?;
    let rankings = session.engine(&store)?.student_rankings();

    if session.is_json() {
        return print_json(&rankings);
    }

    let mut table = Table::new();
    table.set_header(vec!["Rank", "Student ID", "Name", "Average"]);
    for entry in &rankings {
        table.add_row(vec![
            Cell::new(entry.rank),
            Cell::new(entry.student_id),
            Cell::new(student_name(&store, entry.student_id)),
            Cell::new(format!("{:.2}", entry.average_score)),
        ]);
    }
    println!("{table}");
    Ok(())
}
