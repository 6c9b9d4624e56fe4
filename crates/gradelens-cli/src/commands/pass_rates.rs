//! The `gradelens pass-rates` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use super::{percent, print_json, Session};

pub fn execute(session: &Session) -> Result<()> {
    let store = session.open_store()?;
    let rates = session.engine(&store)?.course_pass_rates();

    if session.is_json() {
        return print_json(&rates);
    }
    if rates.is_empty() {
        println!("No scores recorded.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Course", "Pass rate"]);
    for (course, rate) in &rates {
        table.add_row(vec![Cell::new(course), Cell::new(percent(*rate))]);
    }
    println!("{table}");
    Ok(())
}
