//! Global constants for the OCV preview core

/// Divisor mapping the denoise strength onto a CSS blur radius in pixels.
pub const DENOISE_BLUR_DIVISOR: f64 = 40.0;

/// Default upload size limit, matching the processing server (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Initial comparison divider position in percent.
pub const DEFAULT_COMPARISON_POSITION: f64 = 50.0;

/// Placeholder text shown before any file is selected.
pub const DEFAULT_PLACEHOLDER_TEXT: &str = "Select a photo to see the preview";

/// Placeholder text shown next to the video glyph.
pub const VIDEO_PLACEHOLDER_TEXT: &str = "Preview unavailable for video";

/// Fixed glyph displayed on the preview surface for video files.
pub const VIDEO_GLYPH_DATA_URL: &str = "data:image/svg+xml;utf8,\
<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 96 96'>\
<rect x='6' y='18' width='84' height='60' rx='8' fill='%23343a40'/>\
<polygon points='40,34 40,62 64,48' fill='%23f8f9fa'/></svg>";

/// CSS class that hides an element.
pub const HIDDEN_CLASS: &str = "d-none";

/// CSS class marking the preview surface as showing a video glyph.
pub const VIDEO_MODE_CLASS: &str = "video-mode";

/// DOM element ids wired by the browser build.
pub mod dom {
    pub const FILE_INPUT: &str = "fileInput";
    pub const IMAGE_PREVIEW: &str = "imagePreview";
    pub const PREVIEW_PLACEHOLDER: &str = "previewPlaceholder";
    /// Older templates name the placeholder differently.
    pub const PREVIEW_PLACEHOLDER_FALLBACK: &str = "previewText";
    pub const RESET_BUTTON: &str = "resetSettings";
    pub const RANGE_SELECTOR: &str = ".form-range";

    pub const COMPARISON_SLIDER: &str = "slider";
    pub const PROCESSED_WRAPPER: &str = "processedImage";
    pub const COMPARISON_CONTAINER: &str = ".comparison-container";
    pub const SLIDER_BUTTON: &str = "sliderButton";
}
