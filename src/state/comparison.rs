//! Before/after comparison divider.
//!
//! The processed image sits in an overlay whose width reveals it up to the
//! divider. Both images are forced to the container's pixel width so that
//! images with different intrinsic sizes stay aligned while the container
//! resizes. Overlay width, divider offset and image widths are always computed
//! together from one position.

use crate::constants::DEFAULT_COMPARISON_POSITION;

/// Divider position in percent, always within `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonState {
    position: f64,
}

impl ComparisonState {
    pub fn new(position: f64) -> Self {
        let mut state = Self {
            position: DEFAULT_COMPARISON_POSITION,
        };
        state.set_position(position);
        state
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// Move the divider, clamping into range. Non-finite input is ignored.
    ///
    /// Returns whether the input was accepted.
    pub fn set_position(&mut self, position: f64) -> bool {
        if !position.is_finite() {
            log::warn!("Ignoring non-finite divider position: {}", position);
            return false;
        }
        self.position = position.clamp(0.0, 100.0);
        true
    }
}

impl Default for ComparisonState {
    fn default() -> Self {
        Self::new(DEFAULT_COMPARISON_POSITION)
    }
}

/// Layout values derived from a position and the container width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonGeometry {
    /// Width of the processed-image overlay, percent of the container
    pub overlay_width_pct: f64,
    /// Left offset of the divider button, percent of the container
    pub divider_offset_pct: f64,
    /// Width every image in the container is forced to, in pixels
    pub image_width_px: f64,
}

impl ComparisonGeometry {
    pub fn compute(position: f64, container_width_px: f64) -> Self {
        Self {
            overlay_width_pct: position,
            divider_offset_pct: position,
            image_width_px: container_width_px.max(0.0),
        }
    }

    /// Overlay width as a CSS length.
    pub fn overlay_css(&self) -> String {
        format!("{}%", self.overlay_width_pct)
    }

    /// Divider offset as a CSS length.
    pub fn divider_css(&self) -> String {
        format!("{}%", self.divider_offset_pct)
    }

    /// Image width as a CSS length.
    pub fn image_css(&self) -> String {
        format!("{}px", self.image_width_px)
    }
}

/// The comparison area as seen by the sync logic.
pub trait ComparisonLayout {
    /// Current pixel width of the comparison container.
    fn container_width(&self) -> f64;

    /// Apply overlay width, divider offset and image widths in one go.
    fn apply(&mut self, geometry: &ComparisonGeometry);
}

/// Keeps a [`ComparisonLayout`] in step with the divider position.
pub struct ComparisonSync<L: ComparisonLayout> {
    state: ComparisonState,
    layout: L,
}

impl<L: ComparisonLayout> ComparisonSync<L> {
    /// Create the sync and immediately lay out the initial position.
    pub fn new(layout: L, initial_position: f64) -> Self {
        let mut sync = Self {
            state: ComparisonState::new(initial_position),
            layout,
        };
        sync.sync();
        sync
    }

    /// Divider moved.
    pub fn set_position(&mut self, position: f64) -> ComparisonGeometry {
        self.state.set_position(position);
        self.sync()
    }

    /// Container may have changed size.
    pub fn on_resize(&mut self) -> ComparisonGeometry {
        self.sync()
    }

    /// Recompute everything from the current position and apply it.
    pub fn sync(&mut self) -> ComparisonGeometry {
        let geometry =
            ComparisonGeometry::compute(self.state.position(), self.layout.container_width());
        log::trace!(
            "Comparison at {}%, images {}px",
            geometry.overlay_width_pct,
            geometry.image_width_px
        );
        self.layout.apply(&geometry);
        geometry
    }

    pub fn position(&self) -> f64 {
        self.state.position()
    }

    pub fn layout(&self) -> &L {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut L {
        &mut self.layout
    }
}
