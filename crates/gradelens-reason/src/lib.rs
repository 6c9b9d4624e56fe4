//! gradelens-reason: Recommendation reason generators.
//!
//! Implements the `ReasonGenerator` trait against a remote HTTP service with
//! a deterministic local fallback, and loads the gradelens configuration
//! that decides which generator is used.

pub mod config;
pub mod error;
pub mod http;
pub mod mock;

pub use config::{create_generator, load_config, load_config_from, GradelensConfig, ReasonConfig};
pub use error::ReasonError;
pub use http::{HttpReasonGenerator, ReasonRequest};
pub use mock::MockReasonGenerator;
