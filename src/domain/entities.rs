//! Domain entities. Pure data structures for the core business.
//!
//! No HTTP/terminal types here — these are mapped from adapters.

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::DomainError;

/// One photo of a room, ready both for on-screen reference and for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    /// Local handle the presentation layer can show (source file path).
    pub origin: PathBuf,
    /// JPEG-encoded payload suitable for network transmission.
    pub jpeg: Vec<u8>,
}

impl CapturedImage {
    pub fn new(origin: impl Into<PathBuf>, jpeg: Vec<u8>) -> Self {
        Self {
            origin: origin.into(),
            jpeg,
        }
    }

    /// Short display name for logs and menus.
    pub fn display_name(&self) -> String {
        self.origin
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.origin.display().to_string())
    }
}

/// Which trigger started the current capture cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOrigin {
    Camera,
    Library,
}

/// Outcome of a gallery pick. Dismissing the picker is not an error.
#[derive(Debug, Clone)]
pub enum PickOutcome {
    Picked(CapturedImage),
    Cancelled,
}

/// One labeled section of the critique, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Label with the leading ordinal and trailing colon stripped.
    pub heading: String,
    pub body: Vec<Line>,
}

/// A single non-blank line within a section body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub kind: LineKind,
    pub text: String,
}

impl Line {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Plain,
            text: text.into(),
        }
    }

    pub fn sub_point(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::SubPoint,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Plain,
    SubPoint,
}

/// Single source of truth for what the presentation layer shows.
///
/// Exactly one state is active per session. Images are shared via `Arc`
/// so snapshots for rendering do not copy the JPEG payload.
#[derive(Debug, Clone)]
pub enum SessionState {
    Idle,
    Capturing,
    Analyzing {
        image: Arc<CapturedImage>,
    },
    Result {
        image: Arc<CapturedImage>,
        sections: Vec<Section>,
    },
    Failed {
        /// None when the cycle failed before an image was acquired.
        image: Option<Arc<CapturedImage>>,
        error: DomainError,
    },
}

impl SessionState {
    /// Stable name for structured log fields.
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Capturing => "capturing",
            SessionState::Analyzing { .. } => "analyzing",
            SessionState::Result { .. } => "result",
            SessionState::Failed { .. } => "failed",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, SessionState::Idle)
    }

    /// The image held by the current cycle, if any.
    pub fn image(&self) -> Option<&Arc<CapturedImage>> {
        match self {
            SessionState::Analyzing { image } | SessionState::Result { image, .. } => Some(image),
            SessionState::Failed { image, .. } => image.as_ref(),
            SessionState::Idle | SessionState::Capturing => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_uses_file_name() {
        let img = CapturedImage::new("/photos/living-room.jpg", vec![1, 2, 3]);
        assert_eq!(img.display_name(), "living-room.jpg");
    }

    #[test]
    fn state_image_accessor() {
        assert!(SessionState::Idle.image().is_none());
        assert!(SessionState::Capturing.image().is_none());

        let img = Arc::new(CapturedImage::new("/p/a.jpg", vec![0xff]));
        let analyzing = SessionState::Analyzing { image: img.clone() };
        assert_eq!(analyzing.image().unwrap().origin, img.origin);

        let failed = SessionState::Failed {
            image: None,
            error: DomainError::EmptyResponse,
        };
        assert!(failed.image().is_none());
    }
}
