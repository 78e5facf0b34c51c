//! Generation gateway: turns prompt text into generated text.
//!
//! The TUI only ever sees [`GenerationOutcome`]; backends and their
//! typed errors stay behind [`GenerationGateway`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, info};

mod error;
pub mod gemini;

pub use error::GatewayError;
pub use gemini::GeminiGateway;

use crate::config::Config;
use crate::types::GenerationOutcome;

/// Backend identifiers accepted by [`create_gateway`].
pub const SUPPORTED_BACKENDS: &[&str] = &["gemini"];

/// A backend able to generate text from a prompt.
///
/// Each call is independent; no conversation state is kept.
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, GatewayError>;
}

/// Create the gateway for a backend identifier.
///
/// Unknown identifiers fail with [`GatewayError::UnsupportedBackend`].
pub fn create_gateway(backend: &str, config: &Config) -> Result<Arc<dyn GenerationGateway>, GatewayError> {
    debug!(%backend, "create_gateway: called");
    match backend {
        "gemini" => Ok(Arc::new(GeminiGateway::from_config(&config.gemini)?)),
        other => Err(GatewayError::UnsupportedBackend(format!(
            "'{}' (supported: {})",
            other,
            SUPPORTED_BACKENDS.join(", ")
        ))),
    }
}

/// Run one generation and fold the result into an outcome.
///
/// With a timeout, a request that has not finished in time becomes a
/// failure. Without one, this waits for as long as the backend does.
pub async fn dispatch(gateway: &dyn GenerationGateway, prompt: &str, timeout: Option<Duration>) -> GenerationOutcome {
    info!(backend = gateway.name(), prompt_len = prompt.len(), ?timeout, "dispatching generation");

    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, gateway.generate(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(GatewayError::Timeout(limit)),
        },
        None => gateway.generate(prompt).await,
    };

    match &result {
        Ok(text) => info!(backend = gateway.name(), response_len = text.len(), "generation succeeded"),
        Err(e) => error!(backend = gateway.name(), error = %e, "generation failed"),
    }

    GenerationOutcome::from(result)
}
