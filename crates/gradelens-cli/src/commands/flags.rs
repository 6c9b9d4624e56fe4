//! The `gradelens flags` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use super::{print_json, Session};

pub fn execute(session: &Session, class_name: &str) -> Result<()> {
    let store = session.open_store()?;
    let flags = session.engine(&store)?.student_flags(class_name);

    if session.is_json() {
        return print_json(&flags);
    }
    if flags.is_empty() {
        println!("No scored students in class {class_name}.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Student", "Current", "Previous", "Delta", "Rank", "Rank trend", "Tag",
    ]);
    for flag in &flags {
        table.add_row(vec![
            Cell::new(&flag.student_name),
            Cell::new(format!("{:.2}", flag.current_average)),
            Cell::new(format!("{:.2}", flag.previous_average)),
            Cell::new(format!("{:+.2}", flag.score_delta)),
            Cell::new(format!("{} (was {})", flag.current_rank, flag.previous_rank)),
            Cell::new(flag.rank_trend),
            Cell::new(flag.tag),
        ]);
    }
    println!("{table}");

    let at_risk = flags.iter().filter(|f| f.risk).count();
    println!("{at_risk} of {} student(s) at risk.", flags.len());
    Ok(())
}
