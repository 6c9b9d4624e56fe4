//! gradelens-core: Score analytics and teaching-insight engine.
//!
//! This crate turns raw score records into statistics, exam trends,
//! rankings, class overviews, student flags and course recommendations.
//! Everything here is a pure transformation over caller-supplied records;
//! storage and the natural-language reason service live behind the traits
//! in [`traits`].

pub mod engine;
pub mod error;
pub mod insight;
pub mod model;
pub mod recommend;
pub mod risk;
pub mod snapshot;
pub mod statistics;
pub mod traits;

pub use engine::{InsightEngine, StatsScope};
pub use error::InsightError;
pub use model::{Course, Exam, LearningMaterial, ScoreRecord, Student};
