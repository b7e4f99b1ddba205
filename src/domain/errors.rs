//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these. Clone + PartialEq so the
//! session state can hold the failing variant for the presentation layer.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Missing or blank service credential. Unrecoverable without admin action.
    #[error("configuration error: {0}")]
    Config(String),

    /// Capture or library-selection failure (not a cancelled pick).
    #[error("image source error: {0}")]
    ImageSource(String),

    /// Network/service failure: connect error, timeout, non-2xx response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with no usable text.
    #[error("the vision service returned an empty response")]
    EmptyResponse,

    /// Non-empty response text yielded zero sections. Indicates a
    /// parser/prompt mismatch rather than a service outage.
    #[error("no critique sections could be extracted: {0}")]
    Parse(String),

    /// Terminal/prompt failure in the UI adapter.
    #[error("ui error: {0}")]
    Ui(String),

    /// Failure writing a critique report to disk.
    #[error("report error: {0}")]
    Report(String),
}

impl DomainError {
    /// User-facing failure category for the dismissible notice.
    ///
    /// `EmptyResponse` is grouped with transport failures: from the user's
    /// point of view the service did not deliver a critique.
    pub fn category(&self) -> &'static str {
        match self {
            DomainError::Config(_) => "configuration",
            DomainError::ImageSource(_) => "image source",
            DomainError::Transport(_) | DomainError::EmptyResponse => "service",
            DomainError::Parse(_) => "response format",
            DomainError::Ui(_) => "interface",
            DomainError::Report(_) => "report",
        }
    }
}
