//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{CapturedImage, DomainError, PickOutcome};

/// Vision-language service gateway. One atomic request/response per call.
#[async_trait::async_trait]
pub trait VisionPort: Send + Sync {
    /// Submit one image with the fixed critique prompt and return the raw
    /// response text. Suspends for network-latency-scale time; no streaming,
    /// no caching, no automatic retry.
    ///
    /// Fails with `DomainError::Config` before any network I/O when the
    /// service credential is absent.
    async fn analyze(&self, image: &CapturedImage) -> Result<String, DomainError>;
}

/// Image acquisition. Two origins, one output shape.
///
/// Neither call mutates session state; the caller owns all transitions.
#[async_trait::async_trait]
pub trait ImageSourcePort: Send + Sync {
    /// Trigger a live capture and return the encoded photo.
    async fn capture(&self) -> Result<CapturedImage, DomainError>;

    /// Let the user pick a photo from the local library. Dismissing the
    /// picker yields `PickOutcome::Cancelled`, distinguished from failures.
    async fn pick_from_library(&self) -> Result<PickOutcome, DomainError>;
}
