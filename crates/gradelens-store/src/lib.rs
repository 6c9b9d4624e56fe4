//! gradelens-store: Dataset loading and the in-memory score store.
//!
//! Reads school exports (JSON or TOML), validates them, and serves them to
//! the insight engine through the `ScoreStore` and `MaterialCatalog` traits.

pub mod dataset;
pub mod memory;
pub mod validate;

pub use dataset::{load_dataset, parse_dataset, Dataset, DatasetFormat, ScoreRow};
pub use memory::MemoryStore;
pub use validate::{validate_dataset, ValidationWarning};
