//! The `gradelens validate` command.

use anyhow::Result;

use gradelens_store::{load_dataset, validate_dataset};

use super::Session;

pub fn execute(session: &Session) -> Result<()> {
    let path = session.dataset_path();
    let dataset = load_dataset(path)?;

    println!(
        "Dataset: {} ({} students, {} courses, {} exams, {} scores, {} materials)",
        path.display(),
        dataset.students.len(),
        dataset.courses.len(),
        dataset.exams.len(),
        dataset.scores.len(),
        dataset.materials.len()
    );

    let warnings = validate_dataset(&dataset);
    for w in &warnings {
        let prefix = w
            .entity
            .as_ref()
            .map(|entity| format!("  [{entity}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Dataset valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
