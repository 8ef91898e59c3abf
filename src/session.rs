//! The preview session: one owner for parameters, intake and display surface.
//!
//! Every message goes through [`PreviewSession::update`]. A message that
//! changes anything visible ends in exactly one render; a message that changes
//! nothing (a superseded decode) renders nothing.

use crate::config::PreviewConfig;
use crate::message::{Effect, Message};
use crate::parameters::{ParameterId, ParameterSet, ParameterStore};
use crate::render::{PreviewRenderer, PreviewSurface};
use crate::media::SelectedFile;
use crate::state::{DecodeCompletion, IntakeOutcome, LocalDecodeQueue, UploadIntake};

pub struct PreviewSession<S: PreviewSurface> {
    parameters: ParameterStore,
    intake: UploadIntake,
    surface: S,
}

impl<S: PreviewSurface> PreviewSession<S> {
    pub fn new(parameters: ParameterStore, intake: UploadIntake, surface: S) -> Self {
        Self {
            parameters,
            intake,
            surface,
        }
    }

    /// Build a session from configuration, keeping `idle_text` as the
    /// placeholder text shown alongside images.
    pub fn from_config(config: &PreviewConfig, idle_text: impl Into<String>, surface: S) -> Self {
        Self::new(
            ParameterStore::new(config.defaults),
            UploadIntake::new(idle_text, config.intake.max_upload_bytes)
                .with_image_extensions(config.intake.image_extensions.clone()),
            surface,
        )
    }

    /// Process one message.
    pub fn update(&mut self, message: Message) -> Effect {
        match message {
            Message::ParameterChanged(id, value) => {
                log::debug!("{} -> {}", id, value);
                self.parameters.set(id, value);
                self.render();
                Effect::None
            }
            Message::ResetRequested => {
                let restored = self.parameters.reset_all();
                log::info!("Parameters reset to defaults");
                self.surface.sync_controls(&restored);
                self.render();
                Effect::None
            }
            Message::FileSelected(file) => match self.intake.on_file_selected(&file) {
                IntakeOutcome::DecodeRequested(token) => Effect::StartDecode(token),
                IntakeOutcome::VideoReady | IntakeOutcome::Rejected(_) => {
                    self.render();
                    Effect::None
                }
            },
            Message::DecodeFinished { token, result } => {
                match self.intake.on_decode_finished(token, result) {
                    // Parameters are read now, not when the decode started
                    DecodeCompletion::Applied | DecodeCompletion::Failed => self.render(),
                    DecodeCompletion::Stale => {}
                }
                Effect::None
            }
            Message::Refresh => {
                self.render();
                Effect::None
            }
        }
    }

    /// Select a file whose payload is decoded through `queue`.
    ///
    /// `read` is only called when the intake asks for a decode. A request still
    /// queued for an earlier selection is dropped without running.
    pub fn select_queued<R>(
        &mut self,
        file: SelectedFile,
        queue: &mut LocalDecodeQueue,
        read: R,
    ) -> Effect
    where
        R: FnOnce() -> std::io::Result<Vec<u8>>,
    {
        let superseded = self.intake.pending_token();
        let name = file.name.clone();
        let effect = self.update(Message::FileSelected(file));

        if let Some(old) = superseded {
            if queue.cancel(old) {
                log::debug!("Cancelled queued decode {}", old);
            }
        }

        if let Effect::StartDecode(token) = effect {
            match read() {
                Ok(bytes) => queue.request_decode(token, name, bytes),
                Err(e) => {
                    self.update(Message::DecodeFinished {
                        token,
                        result: Err(e.into()),
                    });
                }
            }
        }
        effect
    }

    /// Complete the oldest queued decode. Returns false once the queue is empty.
    pub fn pump_decode(&mut self, queue: &mut LocalDecodeQueue) -> bool {
        let Some(done) = queue.pump_one() else {
            return false;
        };
        self.update(Message::DecodeFinished {
            token: done.token,
            result: done.result,
        });
        true
    }

    /// The single render path.
    fn render(&mut self) {
        let params = self.parameters.snapshot();
        PreviewRenderer::apply(
            &mut self.surface,
            &params,
            self.intake.current(),
            self.intake.presentation(),
        );
    }

    /// Resolved value of one parameter.
    pub fn parameter(&self, id: ParameterId) -> f64 {
        self.parameters.get(id)
    }

    /// Resolved values of all parameters.
    pub fn parameters(&self) -> ParameterSet {
        self.parameters.snapshot()
    }

    pub fn parameter_store_mut(&mut self) -> &mut ParameterStore {
        &mut self.parameters
    }

    pub fn intake(&self) -> &UploadIntake {
        &self.intake
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::VIDEO_PLACEHOLDER_TEXT;
    use crate::headless::HeadlessSurface;
    use crate::media::tests::png_bytes;
    use crate::media::{MediaAsset, decode_image};
    use crate::state::{DecodeToken, LocalDecodeQueue};

    fn session() -> PreviewSession<HeadlessSurface> {
        PreviewSession::from_config(&PreviewConfig::default(), "idle", HeadlessSurface::new())
    }

    fn select_image(session: &mut PreviewSession<HeadlessSurface>, name: &str) -> DecodeToken {
        match session.update(Message::FileSelected(SelectedFile::new(name, "image/png", 128))) {
            Effect::StartDecode(token) => token,
            Effect::None => panic!("expected a decode request for {}", name),
        }
    }

    fn decoded(name: &str, width: u32) -> MediaAsset {
        decode_image(name, &png_bytes(width, 1)).unwrap()
    }

    #[test]
    fn test_parameter_change_renders_once() {
        let mut session = session();
        session.update(Message::ParameterChanged(ParameterId::Brightness, 50.0));

        let surface = session.surface();
        assert_eq!(surface.present_count(), 1);
        assert_eq!(surface.readout(ParameterId::Brightness), Some("50"));
        assert_eq!(
            surface.filter_css().as_deref(),
            Some("brightness(1.5) contrast(1.15) saturate(1.3) blur(0.375px)")
        );
    }

    #[test]
    fn test_reset_renders_exactly_once_on_defaults() {
        let mut session = session();
        for id in ParameterId::ALL {
            session.update(Message::ParameterChanged(id, 2.0));
        }
        let before = session.surface().present_count();

        session.update(Message::ResetRequested);
        assert_eq!(session.surface().present_count(), before + 1);
        assert_eq!(session.parameters(), ParameterSet::default());
        assert_eq!(session.surface().controls(), Some(&ParameterSet::default()));
        assert_eq!(
            session.surface().filter_css().as_deref(),
            Some("brightness(1.15) contrast(1.15) saturate(1.3) blur(0.375px)")
        );

        session.update(Message::ResetRequested);
        assert_eq!(session.surface().present_count(), before + 2);
        assert_eq!(session.parameters(), ParameterSet::default());
    }

    #[test]
    fn test_selecting_image_waits_for_decode() {
        let mut session = session();
        let token = select_image(&mut session, "a.png");
        assert_eq!(session.surface().present_count(), 0);

        session.update(Message::DecodeFinished {
            token,
            result: Ok(decoded("a.png", 3)),
        });
        let surface = session.surface();
        assert_eq!(surface.present_count(), 1);
        assert!(surface.presentation().preview_visible);
        assert!(!surface.presentation().placeholder_visible);
        assert!(surface.media_src().is_some_and(|s| s.starts_with("data:image/png")));
    }

    #[test]
    fn test_completion_uses_parameters_at_completion_time() {
        let mut session = session();
        let token = select_image(&mut session, "a.png");

        // Slider moves while the decode is pending
        session.update(Message::ParameterChanged(ParameterId::Denoise, 8.0));
        session.update(Message::DecodeFinished {
            token,
            result: Ok(decoded("a.png", 2)),
        });

        let filter = session.surface().filter().copied().unwrap();
        assert_eq!(filter.blur_radius, 0.2);
    }

    #[test]
    fn test_faster_second_selection_wins() {
        let mut session = session();
        let a = select_image(&mut session, "a.png");
        let b = select_image(&mut session, "b.png");

        let asset_b = decoded("b.png", 2);
        let expected_src = asset_b.source.as_url().to_string();
        session.update(Message::DecodeFinished {
            token: b,
            result: Ok(asset_b),
        });
        let count = session.surface().present_count();

        session.update(Message::DecodeFinished {
            token: a,
            result: Ok(decoded("a.png", 5)),
        });

        assert_eq!(session.surface().present_count(), count);
        assert_eq!(session.surface().media_src(), Some(expected_src.as_str()));
        assert_eq!(session.intake().current().map(|a| a.name.as_str()), Some("b.png"));
    }

    #[test]
    fn test_race_through_decode_queue() {
        let mut session = session();
        let mut queue = LocalDecodeQueue::new();

        let a = select_image(&mut session, "a.png");
        queue.request_decode(a, "a.png", png_bytes(7, 7));
        let b = select_image(&mut session, "b.png");
        queue.request_decode(b, "b.png", png_bytes(2, 2));

        while let Some(done) = queue.pump_one() {
            session.update(Message::DecodeFinished {
                token: done.token,
                result: done.result,
            });
        }

        let current = session.intake().current().unwrap();
        assert_eq!(current.name, "b.png");
        assert_eq!(current.dimensions, Some((2, 2)));
        assert_eq!(session.surface().present_count(), 1);
    }

    #[test]
    fn test_newer_selection_cancels_queued_decode() {
        let mut session = session();
        let mut queue = LocalDecodeQueue::new();

        let Effect::StartDecode(a) = session.select_queued(
            SelectedFile::new("a.png", "image/png", 64),
            &mut queue,
            || Ok(png_bytes(7, 7)),
        ) else {
            panic!("expected a decode request for a.png");
        };
        assert_eq!(queue.pending_count(), 1);
        let effect = session.select_queued(
            SelectedFile::new("b.png", "image/png", 64),
            &mut queue,
            || Ok(png_bytes(2, 2)),
        );
        assert!(matches!(effect, Effect::StartDecode(_)));

        // Only b's request is left, so a is never decoded
        assert_eq!(queue.pending_count(), 1);
        assert!(!queue.cancel(a));
        assert!(session.pump_decode(&mut queue));
        assert!(!session.pump_decode(&mut queue));

        let current = session.intake().current().unwrap();
        assert_eq!(current.name, "b.png");
        assert_eq!(current.dimensions, Some((2, 2)));
        assert_eq!(session.surface().present_count(), 1);
    }

    #[test]
    fn test_rejected_selection_cancels_queued_decode() {
        let mut session = session();
        let mut queue = LocalDecodeQueue::new();

        session.select_queued(
            SelectedFile::new("a.png", "image/png", 64),
            &mut queue,
            || Ok(png_bytes(1, 1)),
        );
        let effect = session.select_queued(
            SelectedFile::new("notes.txt", "text/plain", 12),
            &mut queue,
            || panic!("rejected files are never read"),
        );

        assert_eq!(effect, Effect::None);
        assert!(queue.is_empty());
        assert!(!session.pump_decode(&mut queue));
        assert!(session.surface().presentation().is_error);
    }

    #[test]
    fn test_unreadable_file_fails_without_queueing() {
        let mut session = session();
        let mut queue = LocalDecodeQueue::new();

        session.select_queued(
            SelectedFile::new("gone.png", "image/png", 64),
            &mut queue,
            || Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")),
        );

        assert!(queue.is_empty());
        assert!(session.surface().presentation().is_error);
        assert!(session.intake().current().is_none());
    }

    #[test]
    fn test_video_suppresses_filters_even_after_slider_moves() {
        let mut session = session();
        let effect = session.update(Message::FileSelected(SelectedFile::new(
            "clip.mp4",
            "video/mp4",
            4096,
        )));
        assert_eq!(effect, Effect::None);

        let surface = session.surface();
        assert_eq!(surface.present_count(), 1);
        assert!(surface.filter().is_none());
        assert!(surface.presentation().placeholder_visible);
        assert!(surface.presentation().preview_visible);
        assert_eq!(surface.presentation().placeholder_text, VIDEO_PLACEHOLDER_TEXT);

        session.update(Message::ParameterChanged(ParameterId::Contrast, 2.5));
        assert!(session.surface().filter().is_none());
        // Readouts still follow the controls
        assert_eq!(session.surface().readout(ParameterId::Contrast), Some("2.5"));
    }

    #[test]
    fn test_unsupported_file_shows_message() {
        let mut session = session();
        session.update(Message::FileSelected(SelectedFile::new(
            "notes.txt",
            "text/plain",
            12,
        )));

        let presentation = session.surface().presentation();
        assert!(presentation.is_error);
        assert!(presentation.placeholder_visible);
        assert!(!presentation.preview_visible);
    }

    #[test]
    fn test_decode_failure_renders_error() {
        let mut session = session();
        let token = select_image(&mut session, "bad.png");
        let result = decode_image("bad.png", b"nope");
        session.update(Message::DecodeFinished { token, result });

        let presentation = session.surface().presentation();
        assert!(presentation.is_error);
        assert!(presentation.placeholder_visible);
        assert!(session.intake().current().is_none());
    }

    #[test]
    fn test_refresh_renders_current_state() {
        let mut session = session();
        session.update(Message::Refresh);
        assert_eq!(session.surface().present_count(), 1);
        assert_eq!(session.surface().readout(ParameterId::Sharpness), Some("1"));
        assert_eq!(session.surface().presentation().placeholder_text, "idle");
    }
}
