//! The `gradelens init` command.

use anyhow::Result;

use gradelens_reason::config::SAMPLE_CONFIG;

pub fn execute() -> Result<()> {
    if std::path::Path::new("gradelens.toml").exists() {
        println!("gradelens.toml already exists, skipping.");
    } else {
        std::fs::write("gradelens.toml", SAMPLE_CONFIG)?;
        println!("Created gradelens.toml");
    }

    println!("\nNext steps:");
    println!("  1. Point `dataset` in gradelens.toml at your school's data");
    println!("  2. Run: gradelens validate");
    println!("  3. Run: gradelens overview <class>");

    Ok(())
}
