//! Selected files, their classification, and the displayable assets built from them.

use std::io::Cursor;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::ImageReader;

use crate::constants::VIDEO_GLYPH_DATA_URL;
use crate::error::{DecodeError, IntakeError};

/// Image extensions recognised when the MIME type is missing.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tiff", "tif"];

/// Video extensions recognised when the MIME type is missing.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "mkv", "avi", "m4v"];

/// The two kinds of media the preview understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

/// Metadata of a file the user picked.
///
/// The payload itself stays with the platform (a browser `File`, or bytes read
/// from disk) and is handed to the decoder separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// File name without directories
    pub name: String,
    /// MIME type as reported by the platform (may be empty)
    pub mime_type: String,
    /// Size in bytes
    pub size: u64,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
        }
    }

    /// Describe a file on disk, guessing the MIME type from its extension.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let size = std::fs::metadata(path)?.len();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = mime_from_name(&name).unwrap_or_default();
        Ok(Self::new(name, mime_type, size))
    }
}

/// Lowercase extension of a file name, if any.
pub(crate) fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Guess a MIME type from a file name.
pub fn mime_from_name(name: &str) -> Option<&'static str> {
    let ext = extension_of(name)?;
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "webp" => Some("image/webp"),
        "tif" | "tiff" => Some("image/tiff"),
        "mp4" | "m4v" => Some("video/mp4"),
        "webm" => Some("video/webm"),
        "mov" => Some("video/quicktime"),
        "mkv" => Some("video/x-matroska"),
        "avi" => Some("video/x-msvideo"),
        _ => None,
    }
}

/// Decide whether a file is an image or a video.
///
/// The MIME type wins when present; the extension is only consulted when the
/// platform reported no type at all.
pub fn classify(file: &SelectedFile) -> Result<MediaKind, IntakeError> {
    let mime = file.mime_type.trim().to_ascii_lowercase();
    if mime.starts_with("image/") {
        return Ok(MediaKind::Image);
    }
    if mime.starts_with("video/") {
        return Ok(MediaKind::Video);
    }

    if mime.is_empty() {
        if let Some(ext) = extension_of(&file.name) {
            if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
                return Ok(MediaKind::Image);
            }
            if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
                return Ok(MediaKind::Video);
            }
        }
    }

    Err(IntakeError::unsupported(&file.mime_type, &file.name))
}

/// What the preview surface displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    /// Base64 `data:` URL of the selected image
    DataUrl(String),
    /// The fixed video glyph
    VideoGlyph,
}

impl AssetSource {
    /// URL suitable for an `<img src>`.
    pub fn as_url(&self) -> &str {
        match self {
            AssetSource::DataUrl(url) => url,
            AssetSource::VideoGlyph => VIDEO_GLYPH_DATA_URL,
        }
    }
}

/// The current selection in displayable form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAsset {
    /// Name of the file this asset was built from
    pub name: String,
    pub kind: MediaKind,
    pub source: AssetSource,
    /// Pixel dimensions, when the decoder determined them
    pub dimensions: Option<(u32, u32)>,
}

impl MediaAsset {
    /// Asset shown for a video file.
    pub fn video(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: MediaKind::Video,
            source: AssetSource::VideoGlyph,
            dimensions: None,
        }
    }

    /// Image asset from an already encoded data URL (browser reader output).
    pub fn image_from_data_url(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: MediaKind::Image,
            source: AssetSource::DataUrl(url.into()),
            dimensions: None,
        }
    }

    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }
}

/// Encode bytes as a base64 `data:` URL.
pub fn to_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, BASE64.encode(bytes))
}

/// Validate image bytes and turn them into a displayable asset.
///
/// The format is sniffed from the content, so a mislabelled file still works
/// and a corrupt one fails here rather than as a broken `<img>`.
pub fn decode_image(name: &str, bytes: &[u8]) -> Result<MediaAsset, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let format = reader.format();
    // Fails with an unsupported-format error when sniffing found nothing
    let (width, height) = reader.into_dimensions()?;
    let mime_type = format
        .map(|f| f.to_mime_type())
        .unwrap_or("application/octet-stream");

    log::debug!("🖼️ Decoded {}: {}x{} ({})", name, width, height, mime_type);

    Ok(MediaAsset {
        name: name.to_string(),
        kind: MediaKind::Image,
        source: AssetSource::DataUrl(to_data_url(mime_type, bytes)),
        dimensions: Some((width, height)),
    })
}
