//! Inbound port. UI (adapter) calls into the application.

use crate::domain::DomainError;

/// Input port: the terminal UI drives the capture-cycle loop.
#[async_trait::async_trait]
pub trait InputPort: Send + Sync {
    /// Run the interactive loop (capture, pick, view result, reset) until
    /// the user quits.
    async fn run(&self) -> Result<(), DomainError>;
}
