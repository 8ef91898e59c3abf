//! Live preview rendering.
//!
//! The renderer maps the current parameters onto a cheap CSS-style filter that
//! approximates the server-side processing, and hands one complete
//! [`PreviewFrame`] to the display surface. Surfaces apply frames
//! idempotently, so presenting the same frame twice is harmless.

use std::fmt;

use crate::constants::{DEFAULT_PLACEHOLDER_TEXT, DENOISE_BLUR_DIVISOR};
use crate::media::{MediaAsset, MediaKind};
use crate::parameters::{ParameterId, ParameterSet};

/// Visual approximation of the processing parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterDescriptor {
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
    /// Blur radius in pixels
    pub blur_radius: f64,
}

impl FilterDescriptor {
    /// The descriptor that leaves the surface untouched.
    pub fn identity() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            saturation: 1.0,
            blur_radius: 0.0,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// CSS `filter` value, e.g. `brightness(1.15) contrast(1.15) saturate(1.3) blur(0.375px)`.
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl Default for FilterDescriptor {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for FilterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "brightness({}) contrast({}) saturate({}) blur({}px)",
            self.brightness, self.contrast, self.saturation, self.blur_radius
        )
    }
}

/// Which of the placeholder and preview surface are visible, and what the
/// placeholder says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub placeholder_visible: bool,
    pub preview_visible: bool,
    pub placeholder_text: String,
    /// Preview surface shows the video glyph
    pub video_mode: bool,
    /// Placeholder text describes a problem
    pub is_error: bool,
}

impl Presentation {
    /// Nothing selected yet.
    pub fn idle(text: impl Into<String>) -> Self {
        Self {
            placeholder_visible: true,
            preview_visible: false,
            placeholder_text: text.into(),
            video_mode: false,
            is_error: false,
        }
    }

    /// An image is on the preview surface.
    pub fn image(idle_text: impl Into<String>) -> Self {
        Self {
            placeholder_visible: false,
            preview_visible: true,
            placeholder_text: idle_text.into(),
            video_mode: false,
            is_error: false,
        }
    }

    /// Video glyph on the surface with an explanation next to it; the only
    /// state where both are visible.
    pub fn video(text: impl Into<String>) -> Self {
        Self {
            placeholder_visible: true,
            preview_visible: true,
            placeholder_text: text.into(),
            video_mode: true,
            is_error: false,
        }
    }

    /// Selection refused or decode failed.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            placeholder_visible: true,
            preview_visible: false,
            placeholder_text: message.into(),
            video_mode: false,
            is_error: true,
        }
    }
}

impl Default for Presentation {
    fn default() -> Self {
        Self::idle(DEFAULT_PLACEHOLDER_TEXT)
    }
}

/// Format a value the way a range input reports it (`15`, `1.15`, `0.375`).
pub fn format_readout(value: f64) -> String {
    format!("{}", value)
}

/// Everything a surface needs to show the current state.
#[derive(Debug, Clone)]
pub struct PreviewFrame<'a> {
    pub filter: FilterDescriptor,
    /// Text for each parameter's readout, in [`ParameterId::ALL`] order
    pub readouts: Vec<(ParameterId, String)>,
    pub media: Option<&'a MediaAsset>,
    pub presentation: &'a Presentation,
}

/// A display the preview can be drawn on.
///
/// Implementations must tolerate missing pieces (no readout element, no
/// placeholder) by skipping them.
pub trait PreviewSurface {
    /// Apply a frame. Must be idempotent.
    fn present(&mut self, frame: &PreviewFrame<'_>);

    /// Move the controls themselves to new values (after a reset).
    fn sync_controls(&mut self, _values: &ParameterSet) {}
}

/// Maps parameters onto filter descriptors.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreviewRenderer;

impl PreviewRenderer {
    /// Pure mapping from parameters and media kind to a descriptor.
    ///
    /// Videos are never filtered. Denoising has no cheap live equivalent, so it
    /// is approximated by blur. Brightness is an integer offset around 100%.
    pub fn render(params: &ParameterSet, kind: MediaKind) -> FilterDescriptor {
        if kind == MediaKind::Video {
            return FilterDescriptor::identity();
        }

        FilterDescriptor {
            brightness: (100.0 + params.brightness.trunc()) / 100.0,
            contrast: params.contrast,
            saturation: params.saturation,
            blur_radius: params.denoise / DENOISE_BLUR_DIVISOR,
        }
    }

    /// Readout text for every parameter.
    pub fn readouts(params: &ParameterSet) -> Vec<(ParameterId, String)> {
        ParameterId::ALL
            .iter()
            .map(|id| (*id, format_readout(params.get(*id))))
            .collect()
    }

    /// Build the frame for the current state.
    pub fn frame<'a>(
        params: &ParameterSet,
        media: Option<&'a MediaAsset>,
        presentation: &'a Presentation,
    ) -> PreviewFrame<'a> {
        let kind = media.map(|m| m.kind).unwrap_or_default();
        PreviewFrame {
            filter: Self::render(params, kind),
            readouts: Self::readouts(params),
            media,
            presentation,
        }
    }

    /// Render and present in one step.
    pub fn apply<S: PreviewSurface + ?Sized>(
        surface: &mut S,
        params: &ParameterSet,
        media: Option<&MediaAsset>,
        presentation: &Presentation,
    ) {
        let frame = Self::frame(params, media, presentation);
        log::trace!("Presenting filter: {}", frame.filter);
        surface.present(&frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_default_parameters_literal_values() {
        let filter = PreviewRenderer::render(&ParameterSet::default(), MediaKind::Image);
        assert!(approx_eq(filter.brightness, 1.15));
        assert!(approx_eq(filter.contrast, 1.15));
        assert!(approx_eq(filter.saturation, 1.3));
        assert!(approx_eq(filter.blur_radius, 0.375));
    }

    #[test]
    fn test_render_is_pure() {
        let params = ParameterSet {
            brightness: -30.0,
            contrast: 2.2,
            saturation: 0.7,
            denoise: 4.0,
            sharpness: 2.5,
        };
        let a = PreviewRenderer::render(&params, MediaKind::Image);
        let b = PreviewRenderer::render(&params, MediaKind::Image);
        assert_eq!(a, b);
        assert!(approx_eq(a.brightness, 0.7));
        assert!(approx_eq(a.blur_radius, 0.1));
    }

    #[test]
    fn test_brightness_is_truncated_to_integer() {
        let params = ParameterSet {
            brightness: 15.9,
            ..ParameterSet::default()
        };
        let filter = PreviewRenderer::render(&params, MediaKind::Image);
        assert!(approx_eq(filter.brightness, 1.15));

        let params = ParameterSet {
            brightness: -15.9,
            ..ParameterSet::default()
        };
        let filter = PreviewRenderer::render(&params, MediaKind::Image);
        assert!(approx_eq(filter.brightness, 0.85));
    }

    #[test]
    fn test_video_always_identity() {
        let params = ParameterSet {
            brightness: 90.0,
            contrast: 3.0,
            saturation: 2.0,
            denoise: 20.0,
            sharpness: 3.0,
        };
        let filter = PreviewRenderer::render(&params, MediaKind::Video);
        assert!(filter.is_identity());
        assert_eq!(filter, FilterDescriptor::identity());
    }

    #[test]
    fn test_css_string() {
        let filter = PreviewRenderer::render(&ParameterSet::default(), MediaKind::Image);
        assert_eq!(
            filter.to_css(),
            "brightness(1.15) contrast(1.15) saturate(1.3) blur(0.375px)"
        );
        assert_eq!(
            FilterDescriptor::identity().to_css(),
            "brightness(1) contrast(1) saturate(1) blur(0px)"
        );
    }

    #[test]
    fn test_readouts_follow_range_input_formatting() {
        let readouts = PreviewRenderer::readouts(&ParameterSet::default());
        assert_eq!(
            readouts,
            vec![
                (ParameterId::Brightness, "15".to_string()),
                (ParameterId::Contrast, "1.15".to_string()),
                (ParameterId::Saturation, "1.3".to_string()),
                (ParameterId::Denoise, "15".to_string()),
                (ParameterId::Sharpness, "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_frame_without_media_renders_as_image() {
        let presentation = Presentation::default();
        let frame = PreviewRenderer::frame(&ParameterSet::default(), None, &presentation);
        assert!(!frame.filter.is_identity());
        assert!(frame.media.is_none());
    }

    #[test]
    fn test_presentation_visibility() {
        let idle = Presentation::idle("pick");
        assert!(idle.placeholder_visible && !idle.preview_visible);

        let image = Presentation::image("pick");
        assert!(!image.placeholder_visible && image.preview_visible);

        // The one state where both are visible
        let video = Presentation::video("no preview");
        assert!(video.placeholder_visible && video.preview_visible && video.video_mode);

        let error = Presentation::error("bad file");
        assert!(error.placeholder_visible && !error.preview_visible && error.is_error);
    }
}
