//! Congratulatory messages for completed tasks.
//!
//! The generator is an optional collaborator: it may be slow, fail, or be
//! switched off. Callers fire it after the task is already marked done and
//! only use the result for a toast.

mod http;
pub mod keyring_store;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use http::HttpMessageGenerator;

use crate::error::GeneratorError;
use crate::events::Event;

/// Name used when the user never set one.
pub const FALLBACK_NAME: &str = "User";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CongratsRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CongratsMessage {
    pub message: String,
}

#[async_trait]
pub trait MessageGenerator: Send + Sync {
    async fn generate(&self, request: CongratsRequest) -> Result<CongratsMessage, GeneratorError>;
}

/// Ask `generator` for a message and turn it into a toast.
///
/// Failures are logged and yield `None`; nothing is retried.
pub async fn congratulate(generator: &dyn MessageGenerator, name: &str) -> Option<Event> {
    let request = CongratsRequest {
        name: name.to_string(),
    };
    match generator.generate(request).await {
        Ok(reply) => {
            debug!(name, "congratulation received");
            Some(Event::toast("Task Completed!", reply.message))
        }
        Err(e) => {
            warn!(error = %e, "congratulation failed");
            None
        }
    }
}
