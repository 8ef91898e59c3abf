//! File selection intake and decode supersession.
//!
//! Every selection takes a fresh [`DecodeToken`]. Decodes complete later as
//! separate events, and a completion is only applied when its token is still
//! the latest one; anything older was superseded by a newer selection.

use std::fmt;

use crate::constants::{DEFAULT_MAX_UPLOAD_BYTES, VIDEO_PLACEHOLDER_TEXT};
use crate::error::{DecodeError, IntakeError};
use crate::media::{MediaAsset, MediaKind, SelectedFile, classify, extension_of};
use crate::render::Presentation;

/// Identifies one file selection. Tokens only ever increase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DecodeToken(u64);

impl DecodeToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DecodeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result of handing a selected file to the intake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeOutcome {
    /// Video installed synchronously; render now.
    VideoReady,
    /// Image decode must be started with this token.
    DecodeRequested(DecodeToken),
    /// File refused; the presentation shows why.
    Rejected(IntakeError),
}

/// What happened to a finished decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeCompletion {
    /// Asset is now current.
    Applied,
    /// Decode failed; the presentation shows the failure.
    Failed,
    /// A newer selection superseded this decode; nothing changed.
    Stale,
}

/// Holds the current asset and the visibility of placeholder and preview.
#[derive(Debug, Clone)]
pub struct UploadIntake {
    idle_text: String,
    max_upload_bytes: u64,
    /// Lowercase image extensions accepted, when restricted
    image_extensions: Option<Vec<String>>,
    last_token: u64,
    /// Token and file name of the decode that may still be applied
    pending: Option<(DecodeToken, String)>,
    current: Option<MediaAsset>,
    presentation: Presentation,
}

impl UploadIntake {
    /// Create an intake; `idle_text` is the placeholder text restored whenever
    /// an image is shown.
    pub fn new(idle_text: impl Into<String>, max_upload_bytes: u64) -> Self {
        let idle_text = idle_text.into();
        Self {
            presentation: Presentation::idle(idle_text.clone()),
            idle_text,
            max_upload_bytes,
            image_extensions: None,
            last_token: 0,
            pending: None,
            current: None,
        }
    }

    /// Only accept images with one of these extensions; `None` accepts any image.
    pub fn with_image_extensions(mut self, extensions: Option<Vec<String>>) -> Self {
        self.image_extensions = extensions.map(|exts| {
            exts.iter()
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .collect()
        });
        self
    }

    /// Handle a new selection. Always supersedes any pending decode.
    pub fn on_file_selected(&mut self, file: &SelectedFile) -> IntakeOutcome {
        let token = self.next_token();
        if let Some((old, name)) = self.pending.take() {
            log::debug!("Selection {} supersedes pending decode {} ({})", token, old, name);
        }

        let kind = match self.check(file) {
            Ok(kind) => kind,
            Err(err) => {
                log::warn!("📂 Rejected {}: {}", file.name, err);
                self.current = None;
                self.presentation = Presentation::error(err.to_string());
                return IntakeOutcome::Rejected(err);
            }
        };

        match kind {
            MediaKind::Video => {
                log::info!("📂 Video selected: {} (live preview disabled)", file.name);
                self.current = Some(MediaAsset::video(&file.name));
                self.presentation = Presentation::video(VIDEO_PLACEHOLDER_TEXT);
                IntakeOutcome::VideoReady
            }
            MediaKind::Image => {
                log::info!("📂 Image selected: {} ({} bytes), decode {}", file.name, file.size, token);
                self.pending = Some((token, file.name.clone()));
                IntakeOutcome::DecodeRequested(token)
            }
        }
    }

    /// Handle a finished decode. Only the latest selection's result is applied.
    pub fn on_decode_finished(
        &mut self,
        token: DecodeToken,
        result: Result<MediaAsset, DecodeError>,
    ) -> DecodeCompletion {
        match &self.pending {
            Some((pending, _)) if *pending == token => {}
            _ => {
                log::debug!("Discarding stale decode {}", token);
                return DecodeCompletion::Stale;
            }
        }
        self.pending = None;

        match result {
            Ok(asset) => {
                log::info!("🖼️ Showing {}", asset.name);
                self.current = Some(asset);
                self.presentation = Presentation::image(self.idle_text.clone());
                DecodeCompletion::Applied
            }
            Err(err) => {
                log::warn!("Decode {} failed: {}", token, err);
                self.current = None;
                self.presentation = Presentation::error(err.to_string());
                DecodeCompletion::Failed
            }
        }
    }

    /// The asset on the preview surface, if any.
    pub fn current(&self) -> Option<&MediaAsset> {
        self.current.as_ref()
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    /// Token of the decode still awaited, if any.
    pub fn pending_token(&self) -> Option<DecodeToken> {
        self.pending.as_ref().map(|(token, _)| *token)
    }

    pub fn is_decoding(&self) -> bool {
        self.pending.is_some()
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    fn next_token(&mut self) -> DecodeToken {
        self.last_token += 1;
        DecodeToken(self.last_token)
    }

    fn check(&self, file: &SelectedFile) -> Result<MediaKind, IntakeError> {
        let kind = classify(file)?;
        if kind == MediaKind::Image {
            if let Some(allowed) = &self.image_extensions {
                let accepted = extension_of(&file.name)
                    .is_some_and(|ext| allowed.iter().any(|a| *a == ext));
                if !accepted {
                    return Err(IntakeError::unsupported(&file.mime_type, &file.name));
                }
            }
        }
        if file.size == 0 {
            return Err(IntakeError::EmptyFile {
                name: file.name.clone(),
            });
        }
        if file.size > self.max_upload_bytes {
            return Err(IntakeError::FileTooLarge {
                name: file.name.clone(),
                size: file.size,
                limit: self.max_upload_bytes,
            });
        }
        Ok(kind)
    }
}

impl Default for UploadIntake {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_PLACEHOLDER_TEXT, DEFAULT_MAX_UPLOAD_BYTES)
    }
}
