use crate::core::feedback::{
    FeedbackTiming, COPIED_MESSAGE, COPY_FAILED_MESSAGE, GENERATED_MESSAGE,
    GENERATION_FAILED_MESSAGE,
};
use crate::core::form::FormState;
use crate::core::metadata::render_meta_tags;
use crate::domain::model::{GenerationResult, Post, PostAction, PostField, Toast, UiStatus, Variant};
use crate::domain::ports::{Clipboard, ImageGenerator};
use crate::utils::error::{OgError, Result};
use chrono::Utc;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct SessionState {
    form: FormState,
    status: UiStatus,
    result: Option<GenerationResult>,
    toast: Option<Toast>,
    toast_seq: u64,
    copied: bool,
    copied_seq: u64,
}

impl SessionState {
    fn can_generate(&self) -> bool {
        self.status == UiStatus::Idle && !self.form.is_empty()
    }

    fn push_toast(&mut self, toast: Toast) -> u64 {
        self.toast_seq += 1;
        self.toast = Some(toast);
        self.toast_seq
    }

    fn refresh_metadata(&mut self) {
        let post = self.form.post();
        if let Some(result) = self.result.as_mut() {
            result.metadata = render_meta_tags(&post.title, &post.content, &result.image_url);
        }
    }
}

fn lock(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Read-only view of a session, suitable for rendering or JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub post: Post,
    pub status: UiStatus,
    pub can_generate: bool,
    pub result: Option<GenerationResult>,
    pub toast: Option<Toast>,
    pub copied: bool,
}

#[derive(Debug)]
pub enum GenerationOutcome {
    Succeeded(GenerationResult),
    Failed(OgError),
}

impl GenerationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationOutcome::Succeeded(_))
    }

    /// The notification text for this outcome, whatever toast is showing now.
    pub fn message(&self) -> &'static str {
        match self {
            GenerationOutcome::Succeeded(_) => GENERATED_MESSAGE,
            GenerationOutcome::Failed(_) => GENERATION_FAILED_MESSAGE,
        }
    }
}

/// Puts the session back to idle even if the generate future is dropped.
struct InFlight {
    state: Arc<Mutex<SessionState>>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        lock(&self.state).status = UiStatus::Idle;
    }
}

/// One editing session: the post, the last generated image and the
/// transient feedback shown around it.
///
/// All state sits behind a single lock that is never held across an await,
/// so a `Session` can be shared between tasks. At most one generation runs
/// at a time; a second `generate` call while one is outstanding is rejected.
pub struct Session<G: ImageGenerator, C: Clipboard> {
    generator: G,
    clipboard: C,
    timing: FeedbackTiming,
    state: Arc<Mutex<SessionState>>,
}

impl<G: ImageGenerator, C: Clipboard> Session<G, C> {
    pub fn new(generator: G, clipboard: C) -> Self {
        Self::with_timing(generator, clipboard, FeedbackTiming::default())
    }

    pub fn with_timing(generator: G, clipboard: C, timing: FeedbackTiming) -> Self {
        Self {
            generator,
            clipboard,
            timing,
            state: Arc::new(Mutex::new(SessionState::default())),
        }
    }

    pub fn dispatch(&self, action: PostAction) {
        tracing::debug!("Applying post action: {:?}", ActionLabel(&action));
        let mut state = lock(&self.state);
        state.form.apply(action);
        state.refresh_metadata();
    }

    pub fn update_field(&self, field: PostField, value: impl Into<String>) {
        self.dispatch(PostAction::UpdateField(field, value.into()));
    }

    pub fn set_uploaded_image(&self, bytes: impl Into<Vec<u8>>) {
        self.dispatch(PostAction::UploadImage(bytes.into()));
    }

    pub fn set_remote_image_url(&self, url: impl Into<String>) {
        self.dispatch(PostAction::SetImageUrl(url.into()));
    }

    pub fn clear_image(&self) {
        self.dispatch(PostAction::ClearImage);
    }

    pub fn set_variant(&self, variant: Variant) {
        self.dispatch(PostAction::SetVariant(variant));
    }

    pub fn can_generate(&self) -> bool {
        lock(&self.state).can_generate()
    }

    pub fn status(&self) -> UiStatus {
        lock(&self.state).status
    }

    pub fn post(&self) -> Post {
        lock(&self.state).form.post().clone()
    }

    pub fn result(&self) -> Option<GenerationResult> {
        lock(&self.state).result.clone()
    }

    pub fn metadata(&self) -> Option<String> {
        lock(&self.state).result.as_ref().map(|r| r.metadata.clone())
    }

    pub fn toast(&self) -> Option<Toast> {
        lock(&self.state).toast.clone()
    }

    pub fn is_copied(&self) -> bool {
        lock(&self.state).copied
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = lock(&self.state);
        SessionSnapshot {
            post: state.form.post().clone(),
            status: state.status,
            can_generate: state.can_generate(),
            result: state.result.clone(),
            toast: state.toast.clone(),
            copied: state.copied,
        }
    }

    /// Runs one request/response cycle against the image service.
    ///
    /// Service failures do not surface as `Err`: they raise an error toast,
    /// keep the previous result and come back as `GenerationOutcome::Failed`.
    /// `Err` is reserved for calls made while generation is disabled and for
    /// generator errors that are not service failures.
    pub async fn generate(&self) -> Result<GenerationOutcome> {
        let (request, in_flight) = {
            let mut state = lock(&self.state);
            if state.status == UiStatus::Generating {
                return Err(OgError::GenerationInProgress);
            }
            if state.form.is_empty() {
                return Err(OgError::NothingToGenerate);
            }
            state.status = UiStatus::Generating;
            let in_flight = InFlight {
                state: Arc::clone(&self.state),
            };
            (state.form.request(), in_flight)
        };

        tracing::info!("🖼️ Generating OG image (variant: {})", request.variant);
        let response = match self.generator.generate(&request).await {
            Err(e) if !e.is_generation_failure() => {
                tracing::error!("Image generator unusable: {}", e);
                return Err(e);
            }
            response => response,
        };

        // result and toast land together, before the session is idle again
        let (outcome, toast_seq) = {
            let mut state = lock(&self.state);
            match response {
                Ok(image_url) => {
                    let post = state.form.post();
                    let result = GenerationResult {
                        metadata: render_meta_tags(&post.title, &post.content, &image_url),
                        image_url,
                        generated_at: Utc::now(),
                    };
                    state.result = Some(result.clone());
                    let seq = state.push_toast(Toast::success(GENERATED_MESSAGE));
                    (GenerationOutcome::Succeeded(result), seq)
                }
                Err(e) => {
                    let seq = state.push_toast(Toast::error(GENERATION_FAILED_MESSAGE));
                    (GenerationOutcome::Failed(e), seq)
                }
            }
        };
        drop(in_flight);
        self.expire_toast(toast_seq);

        match &outcome {
            GenerationOutcome::Succeeded(result) => {
                tracing::info!("✅ OG image ready: {}", short_url(&result.image_url));
            }
            GenerationOutcome::Failed(e) => {
                tracing::warn!("❌ Error generating OG image: {}", e);
            }
        }

        Ok(outcome)
    }

    /// Puts the current meta-tag text on the clipboard.
    pub async fn copy_metadata(&self) -> Result<()> {
        let metadata = self.metadata().ok_or(OgError::NothingToCopy)?;

        match self.clipboard.set_text(&metadata) {
            Ok(()) => {
                tracing::debug!("Copied {} bytes of metadata", metadata.len());
                self.mark_copied();
                self.raise_toast(Toast::success(COPIED_MESSAGE));
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Clipboard write failed: {}", e);
                self.raise_toast(Toast::error(COPY_FAILED_MESSAGE));
                Err(e)
            }
        }
    }

    fn raise_toast(&self, toast: Toast) {
        let seq = lock(&self.state).push_toast(toast);
        self.expire_toast(seq);
    }

    fn expire_toast(&self, seq: u64) {
        let state = Arc::clone(&self.state);
        let delay = self.timing.toast;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = lock(&state);
            // a newer toast owns its own timer
            if state.toast_seq == seq {
                state.toast = None;
            }
        });
    }

    fn mark_copied(&self) {
        let seq = {
            let mut state = lock(&self.state);
            state.copied_seq += 1;
            state.copied = true;
            state.copied_seq
        };

        let state = Arc::clone(&self.state);
        let delay = self.timing.copy_feedback;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = lock(&state);
            if state.copied_seq == seq {
                state.copied = false;
            }
        });
    }
}

/// Keeps uploaded image bytes out of debug logs.
struct ActionLabel<'a>(&'a PostAction);

impl std::fmt::Debug for ActionLabel<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            PostAction::UploadImage(bytes) => write!(f, "UploadImage({} bytes)", bytes.len()),
            other => write!(f, "{:?}", other),
        }
    }
}

fn short_url(url: &str) -> &str {
    if url.starts_with("data:") {
        url.split(',').next().unwrap_or(url)
    } else {
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{GenerationRequest, ToastKind};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    enum Reply {
        Url(String),
        Status(u16),
        Misconfigured,
    }

    struct StubGenerator {
        reply: Reply,
        delay: Duration,
        calls: AtomicUsize,
        last_request: Mutex<Option<GenerationRequest>>,
    }

    impl StubGenerator {
        fn with_reply(reply: Reply) -> Self {
            Self {
                reply,
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            }
        }

        fn ok(url: &str) -> Self {
            Self::with_reply(Reply::Url(url.to_string()))
        }

        fn failing(status: u16) -> Self {
            Self::with_reply(Reply::Status(status))
        }

        fn slow(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl ImageGenerator for StubGenerator {
        async fn generate(&self, request: &GenerationRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match &self.reply {
                Reply::Url(url) => Ok(url.clone()),
                Reply::Status(status) => Err(OgError::Status { status: *status }),
                Reply::Misconfigured => Err(OgError::ConfigError {
                    message: "no endpoint".to_string(),
                }),
            }
        }
    }

    #[derive(Default)]
    struct NullClipboard;

    impl Clipboard for NullClipboard {
        fn set_text(&self, _text: &str) -> Result<()> {
            Ok(())
        }
    }

    fn fast_timing() -> FeedbackTiming {
        FeedbackTiming {
            toast: Duration::from_millis(50),
            copy_feedback: Duration::from_millis(50),
        }
    }

    #[tokio::test]
    async fn test_generate_rejected_when_empty() {
        let session = Session::new(StubGenerator::ok("https://x/y.png"), NullClipboard);

        assert!(!session.can_generate());
        let err = session.generate().await.unwrap_err();
        assert!(matches!(err, OgError::NothingToGenerate));
        assert_eq!(session.generator.calls.load(Ordering::SeqCst), 0);
        assert!(session.toast().is_none());
    }

    #[tokio::test]
    async fn test_generate_success_populates_result() {
        let session = Session::new(StubGenerator::ok("https://x/y.png"), NullClipboard);
        session.update_field(PostField::Title, "Hello");
        session.update_field(PostField::Content, "World");

        let outcome = session.generate().await.unwrap();

        assert!(outcome.is_success());
        assert_eq!(session.status(), UiStatus::Idle);
        let result = session.result().unwrap();
        assert_eq!(result.image_url, "https://x/y.png");
        assert!(result.metadata.contains(r#"og:title" content="Hello""#));
        assert!(result.metadata.contains(r#"og:description" content="World""#));
        assert_eq!(session.toast().unwrap().kind, ToastKind::Success);
    }

    #[tokio::test]
    async fn test_generate_sends_uploaded_image_and_variant() {
        let session = Session::new(StubGenerator::ok("https://x/y.png"), NullClipboard);
        session.set_remote_image_url("https://example.com/old.png");
        session.set_uploaded_image(b"GIF89a".to_vec());
        session.set_variant(Variant::WithBackground);

        session.generate().await.unwrap();

        let request = session.generator.last_request.lock().unwrap().clone().unwrap();
        assert!(request.image_url.starts_with("data:image/gif;base64,"));
        assert_eq!(request.variant, Variant::WithBackground);
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_result() {
        let session = Session::new(StubGenerator::ok("https://x/first.png"), NullClipboard);
        session.update_field(PostField::Title, "Hello");
        session.generate().await.unwrap();
        let first = session.result().unwrap();

        let failing = Session {
            generator: StubGenerator::failing(500),
            clipboard: NullClipboard,
            timing: FeedbackTiming::default(),
            state: Arc::clone(&session.state),
        };
        let outcome = failing.generate().await.unwrap();

        assert!(matches!(outcome, GenerationOutcome::Failed(OgError::Status { status: 500 })));
        assert_eq!(failing.status(), UiStatus::Idle);
        assert_eq!(failing.result().unwrap(), first);
        assert_eq!(failing.toast().unwrap().kind, ToastKind::Error);
    }

    #[tokio::test]
    async fn test_failed_generate_raises_exactly_one_toast() {
        let session = Session::new(StubGenerator::failing(502), NullClipboard);
        session.update_field(PostField::Title, "Hello");
        let before = lock(&session.state).toast_seq;

        let outcome = session.generate().await.unwrap();

        assert!(!outcome.is_success());
        let state = lock(&session.state);
        assert_eq!(state.toast_seq, before + 1);
        let toast = state.toast.as_ref().unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, GENERATION_FAILED_MESSAGE);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_outcome_toast_set_before_session_is_idle() {
        let session = Arc::new(Session::new(
            StubGenerator::failing(503).slow(Duration::from_millis(50)),
            NullClipboard,
        ));
        session.update_field(PostField::Title, "Hello");

        let worker = tokio::spawn({
            let session = Arc::clone(&session);
            async move { session.generate().await }
        });

        let watch = async {
            let mut seen_generating = false;
            loop {
                let snapshot = session.snapshot();
                match snapshot.status {
                    UiStatus::Generating => seen_generating = true,
                    UiStatus::Idle if seen_generating => {
                        // idle must never be observable without the outcome toast
                        assert_eq!(snapshot.toast.unwrap().kind, ToastKind::Error);
                        break;
                    }
                    UiStatus::Idle => {}
                }
                tokio::task::yield_now().await;
            }
        };
        tokio::time::timeout(Duration::from_secs(5), watch)
            .await
            .unwrap();

        assert!(!worker.await.unwrap().unwrap().is_success());
    }

    #[tokio::test]
    async fn test_generator_misconfiguration_is_returned_as_error() {
        let session = Session::new(StubGenerator::with_reply(Reply::Misconfigured), NullClipboard);
        session.update_field(PostField::Title, "Hello");

        let err = session.generate().await.unwrap_err();

        assert!(matches!(err, OgError::ConfigError { .. }));
        assert_eq!(session.status(), UiStatus::Idle);
        assert!(session.toast().is_none());
        assert!(session.can_generate());
    }

    #[tokio::test]
    async fn test_field_edit_refreshes_metadata() {
        let session = Session::new(StubGenerator::ok("https://x/y.png"), NullClipboard);
        session.update_field(PostField::Title, "Draft");
        session.generate().await.unwrap();

        session.update_field(PostField::Title, "Final");

        let metadata = session.metadata().unwrap();
        assert!(metadata.contains(r#"content="Final""#));
        assert!(!metadata.contains("Draft"));
        assert!(metadata.contains("https://x/y.png"));
    }

    #[tokio::test]
    async fn test_toast_expires_after_delay() {
        let session = Session::with_timing(
            StubGenerator::ok("https://x/y.png"),
            NullClipboard,
            fast_timing(),
        );
        session.update_field(PostField::Content, "World");
        session.generate().await.unwrap();
        assert!(session.toast().is_some());

        session.update_field(PostField::Title, "unrelated edit");
        assert!(session.toast().is_some());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(session.toast().is_none());
    }

    #[tokio::test]
    async fn test_copy_without_result_fails() {
        let session = Session::new(StubGenerator::ok("https://x/y.png"), NullClipboard);
        let err = session.copy_metadata().await.unwrap_err();
        assert!(matches!(err, OgError::NothingToCopy));
        assert!(!session.is_copied());
    }

    #[tokio::test]
    async fn test_copied_flag_resets() {
        let session = Session::with_timing(
            StubGenerator::ok("https://x/y.png"),
            NullClipboard,
            fast_timing(),
        );
        session.update_field(PostField::Title, "Hello");
        session.generate().await.unwrap();

        session.copy_metadata().await.unwrap();
        assert!(session.is_copied());
        assert_eq!(session.toast().unwrap().message, COPIED_MESSAGE);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!session.is_copied());
    }

    #[tokio::test]
    async fn test_outcome_message_outlives_copy_toast() {
        let session = Session::new(StubGenerator::ok("https://x/y.png"), NullClipboard);
        session.update_field(PostField::Title, "Hello");

        let outcome = session.generate().await.unwrap();
        session.copy_metadata().await.unwrap();

        assert_eq!(session.toast().unwrap().message, COPIED_MESSAGE);
        assert_eq!(outcome.message(), GENERATED_MESSAGE);

        let failed = GenerationOutcome::Failed(OgError::Status { status: 500 });
        assert_eq!(failed.message(), GENERATION_FAILED_MESSAGE);
    }

    #[test]
    fn test_short_url_hides_data_payload() {
        assert_eq!(short_url("data:image/png;base64,AAAA"), "data:image/png;base64");
        assert_eq!(short_url("https://x/y.png"), "https://x/y.png");
    }
}
