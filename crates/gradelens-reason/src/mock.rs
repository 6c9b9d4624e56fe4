//! Mock reason generator for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use gradelens_core::traits::{fallback_reason, ReasonContext, ReasonGenerator};

/// A mock reason generator for exercising the engine without a service.
///
/// Answers by course name; a course with no configured answer gets the
/// fallback reason, the same as a failed remote call.
pub struct MockReasonGenerator {
    /// Map of course name → reason text.
    responses: HashMap<String, String>,
    /// Answer for courses not in `responses`; `None` means fallback.
    default_response: Option<String>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last context received.
    last_context: Mutex<Option<ReasonContext>>,
}

impl MockReasonGenerator {
    /// Create a mock with per-course answers.
    pub fn new(responses: HashMap<String, String>) -> Self {
        Self {
            responses,
            default_response: None,
            call_count: AtomicU32::new(0),
            last_context: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same reason.
    pub fn with_fixed_response(response: &str) -> Self {
        Self {
            default_response: Some(response.to_string()),
            ..Self::new(HashMap::new())
        }
    }

    /// Create a mock that behaves like an unreachable service.
    pub fn unavailable() -> Self {
        Self::new(HashMap::new())
    }

    /// Get the number of calls made to this generator.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last context passed to this generator.
    pub fn last_context(&self) -> Option<ReasonContext> {
        self.last_context
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl ReasonGenerator for MockReasonGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn reason(&self, context: &ReasonContext) -> String {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_context
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(context.clone());

        self.responses
            .get(&context.course)
            .or(self.default_response.as_ref())
            .cloned()
            .unwrap_or_else(|| fallback_reason(context))
    }
}
