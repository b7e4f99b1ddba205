//! Session state machine: the single authority over the capture cycle.
//!
//! Idle -> Capturing -> Analyzing -> Result | Failed, with reset back to
//! Idle. Triggers arriving while a cycle is active are ignored, so at most
//! one analysis request is ever in flight per session. Client and parser
//! failures are converted to the Failed state here; none propagate further.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::{
    parse_sections, CaptureOrigin, CapturedImage, DomainError, PickOutcome, SessionState,
};
use crate::ports::{ImageSourcePort, VisionPort};

/// One screen's session. Ports are injected; state lives behind a mutex so
/// the UI can snapshot it while a cycle runs.
pub struct SessionService {
    source: Arc<dyn ImageSourcePort>,
    vision: Arc<dyn VisionPort>,
    state: Mutex<SessionState>,
}

impl SessionService {
    pub fn new(source: Arc<dyn ImageSourcePort>, vision: Arc<dyn VisionPort>) -> Self {
        Self {
            source,
            vision,
            state: Mutex::new(SessionState::Idle),
        }
    }

    /// Current state snapshot for rendering.
    pub async fn state(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    /// Run one capture cycle from the given trigger.
    ///
    /// Only valid from Idle; from any other state the trigger is a no-op
    /// and no port is invoked. Returns the committed state. Failures are
    /// absorbed into `SessionState::Failed` rather than returned.
    pub async fn run_cycle(&self, origin: CaptureOrigin) -> SessionState {
        {
            let mut state = self.state.lock().await;
            if !state.is_idle() {
                debug!(state = state.name(), ?origin, "capture trigger ignored");
                return state.clone();
            }
            *state = SessionState::Capturing;
        }

        let image = match self.acquire_image(origin).await {
            Ok(Some(image)) => Arc::new(image),
            Ok(None) => {
                info!("library pick cancelled, returning to idle");
                return self.commit(SessionState::Idle).await;
            }
            Err(error) => {
                warn!(category = error.category(), %error, "image acquisition failed");
                return self
                    .commit(SessionState::Failed { image: None, error })
                    .await;
            }
        };

        info!(
            photo = %image.display_name(),
            bytes = image.jpeg.len(),
            "photo acquired, requesting analysis"
        );
        self.commit(SessionState::Analyzing {
            image: Arc::clone(&image),
        })
        .await;

        match self.vision.analyze(&image).await {
            Ok(raw) => self.commit_analysis(image, &raw).await,
            Err(error) => {
                warn!(category = error.category(), %error, "analysis failed");
                self.commit(SessionState::Failed {
                    image: Some(image),
                    error,
                })
                .await
            }
        }
    }

    /// Discard the held image and sections unconditionally.
    pub async fn reset(&self) -> SessionState {
        let mut state = self.state.lock().await;
        info!(from = state.name(), "session reset");
        *state = SessionState::Idle;
        state.clone()
    }

    async fn acquire_image(
        &self,
        origin: CaptureOrigin,
    ) -> Result<Option<CapturedImage>, DomainError> {
        match origin {
            CaptureOrigin::Camera => self.source.capture().await.map(Some),
            CaptureOrigin::Library => match self.source.pick_from_library().await? {
                PickOutcome::Picked(image) => Ok(Some(image)),
                PickOutcome::Cancelled => Ok(None),
            },
        }
    }

    /// Parse the raw response and commit Result or Failed.
    ///
    /// Zero sections out of non-empty text is a parse failure: it points at
    /// a parser/prompt mismatch and is logged apart from transport errors.
    async fn commit_analysis(&self, image: Arc<CapturedImage>, raw: &str) -> SessionState {
        if raw.trim().is_empty() {
            warn!("vision service returned empty text");
            return self
                .commit(SessionState::Failed {
                    image: Some(image),
                    error: DomainError::EmptyResponse,
                })
                .await;
        }

        let sections = parse_sections(raw);
        if sections.is_empty() {
            let preview: String = raw.chars().take(120).collect();
            warn!(
                response_len = raw.len(),
                preview, "no heading markers found in response"
            );
            return self
                .commit(SessionState::Failed {
                    image: Some(image),
                    error: DomainError::Parse(format!(
                        "response contained no heading markers (starts: {preview:?})"
                    )),
                })
                .await;
        }

        info!(sections = sections.len(), "critique parsed");
        self.commit(SessionState::Result { image, sections }).await
    }

    async fn commit(&self, next: SessionState) -> SessionState {
        let mut state = self.state.lock().await;
        debug!(from = state.name(), to = next.name(), "state transition");
        *state = next;
        state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const WELL_FORMED: &str =
        "**1. Design Style:** Modern\n* Clean lines\n**2. Lighting:** Bright";

    fn test_image() -> CapturedImage {
        CapturedImage::new("/photos/living-room.jpg", vec![0xff, 0xd8, 0xff])
    }

    /// Image source that always yields the same photo.
    struct StubSource {
        image: CapturedImage,
        captures: AtomicUsize,
    }

    impl StubSource {
        fn new() -> Self {
            Self {
                image: test_image(),
                captures: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl ImageSourcePort for StubSource {
        async fn capture(&self) -> Result<CapturedImage, DomainError> {
            self.captures.fetch_add(1, Ordering::SeqCst);
            Ok(self.image.clone())
        }

        async fn pick_from_library(&self) -> Result<PickOutcome, DomainError> {
            Ok(PickOutcome::Picked(self.image.clone()))
        }
    }

    /// Image source whose picker is always dismissed.
    struct CancelSource;

    #[async_trait::async_trait]
    impl ImageSourcePort for CancelSource {
        async fn capture(&self) -> Result<CapturedImage, DomainError> {
            Err(DomainError::ImageSource("capture unavailable".into()))
        }

        async fn pick_from_library(&self) -> Result<PickOutcome, DomainError> {
            Ok(PickOutcome::Cancelled)
        }
    }

    /// Vision stub that counts invocations and replies after a delay.
    struct CountingVision {
        calls: AtomicUsize,
        delay: Duration,
        reply: Result<String, DomainError>,
    }

    impl CountingVision {
        fn replying(raw: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delay: Duration::ZERO,
                reply: Ok(raw.to_string()),
            }
        }

        fn failing(error: DomainError) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delay: Duration::ZERO,
                reply: Err(error),
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl VisionPort for CountingVision {
        async fn analyze(&self, _image: &CapturedImage) -> Result<String, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.reply.clone()
        }
    }

    fn service(
        source: Arc<dyn ImageSourcePort>,
        vision: Arc<dyn VisionPort>,
    ) -> Arc<SessionService> {
        Arc::new(SessionService::new(source, vision))
    }

    #[tokio::test]
    async fn successful_cycle_ends_in_result() {
        let vision = Arc::new(CountingVision::replying(WELL_FORMED));
        let svc = service(Arc::new(StubSource::new()), vision.clone());

        let state = svc.run_cycle(CaptureOrigin::Camera).await;
        match state {
            SessionState::Result { image, sections } => {
                assert_eq!(image.display_name(), "living-room.jpg");
                assert_eq!(sections.len(), 2);
                assert_eq!(sections[0].heading, "Design Style");
            }
            other => panic!("expected Result, got {}", other.name()),
        }
        assert_eq!(vision.call_count(), 1);
    }

    #[tokio::test]
    async fn cancelled_pick_leaves_idle_without_analysis() {
        let vision = Arc::new(CountingVision::replying(WELL_FORMED));
        let svc = service(Arc::new(CancelSource), vision.clone());

        let state = svc.run_cycle(CaptureOrigin::Library).await;
        assert!(state.is_idle());
        assert!(svc.state().await.is_idle());
        assert_eq!(vision.call_count(), 0);
    }

    #[tokio::test]
    async fn second_trigger_while_analyzing_is_a_no_op() {
        let vision = Arc::new(
            CountingVision::replying(WELL_FORMED).with_delay(Duration::from_millis(200)),
        );
        let svc = service(Arc::new(StubSource::new()), vision.clone());

        let first = {
            let svc = Arc::clone(&svc);
            tokio::spawn(async move { svc.run_cycle(CaptureOrigin::Camera).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(svc.state().await.name(), "analyzing");

        // Re-entrant trigger: returns the in-flight snapshot immediately.
        let second = svc.run_cycle(CaptureOrigin::Camera).await;
        assert_eq!(second.name(), "analyzing");

        let final_state = first.await.expect("cycle task");
        assert_eq!(final_state.name(), "result");
        assert_eq!(vision.call_count(), 1);
    }

    #[tokio::test]
    async fn transport_failure_then_reset_discards_image() {
        let vision = Arc::new(CountingVision::failing(DomainError::Transport(
            "connection refused".into(),
        )));
        let svc = service(Arc::new(StubSource::new()), vision);

        let state = svc.run_cycle(CaptureOrigin::Camera).await;
        match &state {
            SessionState::Failed { image, error } => {
                assert!(image.is_some());
                assert!(matches!(error, DomainError::Transport(_)));
            }
            other => panic!("expected Failed, got {}", other.name()),
        }

        let state = svc.reset().await;
        assert!(state.is_idle());
        assert!(svc.state().await.image().is_none());
    }

    #[tokio::test]
    async fn empty_response_fails_with_empty_response_kind() {
        let vision = Arc::new(CountingVision::replying("   \n  "));
        let svc = service(Arc::new(StubSource::new()), vision);

        let state = svc.run_cycle(CaptureOrigin::Camera).await;
        match state {
            SessionState::Failed { error, .. } => {
                assert_eq!(error, DomainError::EmptyResponse);
            }
            other => panic!("expected Failed, got {}", other.name()),
        }
    }

    #[tokio::test]
    async fn headingless_response_fails_as_parse_error() {
        let vision = Arc::new(CountingVision::replying(
            "A pleasant room with no structure to speak of.",
        ));
        let svc = service(Arc::new(StubSource::new()), vision);

        let state = svc.run_cycle(CaptureOrigin::Camera).await;
        match state {
            SessionState::Failed { image, error } => {
                assert!(image.is_some());
                assert!(matches!(error, DomainError::Parse(_)));
            }
            other => panic!("expected Failed, got {}", other.name()),
        }
    }

    #[tokio::test]
    async fn capture_failure_yields_failed_without_image() {
        let vision = Arc::new(CountingVision::replying(WELL_FORMED));
        let svc = service(Arc::new(CancelSource), vision.clone());

        let state = svc.run_cycle(CaptureOrigin::Camera).await;
        match state {
            SessionState::Failed { image, error } => {
                assert!(image.is_none());
                assert!(matches!(error, DomainError::ImageSource(_)));
            }
            other => panic!("expected Failed, got {}", other.name()),
        }
        assert_eq!(vision.call_count(), 0);
    }

    #[tokio::test]
    async fn reset_from_idle_stays_idle() {
        let svc = service(
            Arc::new(StubSource::new()),
            Arc::new(CountingVision::replying(WELL_FORMED)),
        );
        assert!(svc.reset().await.is_idle());
    }
}
