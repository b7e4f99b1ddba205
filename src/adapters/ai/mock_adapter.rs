//! Mock vision adapter for running without API calls.
//!
//! Returns a canned, well-formed critique so the whole pipeline (state
//! machine, parser, rendering, reports) is exercisable offline.

use std::time::Duration;

use tracing::info;

use crate::domain::{CapturedImage, DomainError};
use crate::ports::VisionPort;

/// Canned critique in the exact wire shape the real service is prompted for.
const MOCK_CRITIQUE: &str = "\
**1. Design Style:** Relaxed Scandinavian with mid-century touches.
**2. Color Palette:** Warm whites and muted greys.
* Oak accents tie the floor and shelving together
**3. Furniture:** A low sofa and a spindle-leg armchair.
**4. Lighting:** Mostly natural side light.
* Add a floor lamp for the reading corner
**5. Layout & Function:** Open traffic path, conversation-friendly seating.
**6. Strengths & Suggestions:**
* Strong natural light
* Consider a larger rug to anchor the seating
**7. Room Type:** Living room.";

/// Mock adapter. Simulates network latency with a configurable delay.
pub struct MockVisionAdapter {
    delay: Duration,
}

impl MockVisionAdapter {
    /// Create a new mock adapter with default delay (300ms).
    pub fn new() -> Self {
        Self {
            delay: Duration::from_millis(300),
        }
    }

    /// Create a mock adapter with custom delay.
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for MockVisionAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl VisionPort for MockVisionAdapter {
    async fn analyze(&self, image: &CapturedImage) -> Result<String, DomainError> {
        info!(
            photo = %image.display_name(),
            payload_bytes = image.jpeg.len(),
            "[MOCK] simulating vision analysis"
        );

        tokio::time::sleep(self.delay).await;

        Ok(MOCK_CRITIQUE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse_sections;

    #[tokio::test]
    async fn mock_critique_round_trips_through_the_parser() {
        let adapter = MockVisionAdapter::with_delay(Duration::from_millis(1));
        let image = CapturedImage::new("/p/room.jpg", vec![0xff, 0xd8]);

        let raw = adapter.analyze(&image).await.expect("mock analyze");
        let sections = parse_sections(&raw);

        assert_eq!(sections.len(), 7);
        assert_eq!(sections[0].heading, "Design Style");
        assert_eq!(sections[6].heading, "Room Type");
        assert!(sections[5]
            .body
            .iter()
            .all(|l| l.kind == crate::domain::LineKind::SubPoint));
    }
}
