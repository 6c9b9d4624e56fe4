//! The `gradelens reason` command.

use anyhow::Result;
use serde::Serialize;

use gradelens_core::model::Trend;
use gradelens_core::traits::ReasonContext;
use gradelens_reason::create_generator;

use super::{print_json, Session};

/// Arguments of a one-off reason request.
pub struct ReasonArgs {
    pub course: String,
    pub trend: Trend,
    pub score: f64,
    pub class_avg: f64,
    pub student_id: i64,
    pub student_name: String,
    pub materials: Vec<String>,
    pub prompt: Option<String>,
}

#[derive(Serialize)]
struct ReasonOutput<'a> {
    generator: &'a str,
    reason: String,
}

impl ReasonArgs {
    /// The context a recommendation would carry; the class gap is unrounded.
    fn into_context(self) -> ReasonContext {
        ReasonContext {
            student_id: self.student_id,
            student_name: self.student_name,
            course: self.course,
            trend: self.trend,
            score: self.score,
            class_avg: self.class_avg,
            difference_with_class_avg: self.score - self.class_avg,
            materials: self.materials,
            prompt_override: self.prompt,
        }
    }
}

pub async fn execute(session: &Session, args: ReasonArgs) -> Result<()> {
    let context = args.into_context();
    let generator = create_generator(&session.config.reason)?;
    let reason = generator.reason(&context).await;

    if session.is_json() {
        return print_json(&ReasonOutput {
            generator: generator.name(),
            reason,
        });
    }
    println!("{reason}");
    Ok(())
}
