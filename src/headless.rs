//! In-memory surfaces.
//!
//! These stand in for the page when running natively: they record what a DOM
//! surface would show, including which optional elements are missing.

use std::collections::{HashMap, HashSet};

use crate::parameters::{ParameterId, ParameterSet};
use crate::render::{FilterDescriptor, Presentation, PreviewFrame, PreviewSurface};
use crate::state::{ComparisonGeometry, ComparisonLayout};

/// Records the last frame presented to it.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    /// Readout elements that exist on this surface
    readout_elements: HashSet<ParameterId>,
    filter: Option<FilterDescriptor>,
    readouts: HashMap<ParameterId, String>,
    media_src: Option<String>,
    presentation: Presentation,
    controls: Option<ParameterSet>,
    present_count: usize,
}

impl HeadlessSurface {
    /// Surface with a readout element for every parameter.
    pub fn new() -> Self {
        Self::with_readouts(&ParameterId::ALL)
    }

    /// Surface with readout elements only for `ids`.
    pub fn with_readouts(ids: &[ParameterId]) -> Self {
        Self {
            readout_elements: ids.iter().copied().collect(),
            filter: None,
            readouts: HashMap::new(),
            media_src: None,
            presentation: Presentation::default(),
            controls: None,
            present_count: 0,
        }
    }

    /// Filter currently applied, `None` when cleared (or never presented).
    pub fn filter(&self) -> Option<&FilterDescriptor> {
        self.filter.as_ref()
    }

    /// CSS `filter` value as a browser would receive it.
    pub fn filter_css(&self) -> Option<String> {
        self.filter.map(|f| f.to_css())
    }

    pub fn readout(&self, id: ParameterId) -> Option<&str> {
        self.readouts.get(&id).map(String::as_str)
    }

    pub fn media_src(&self) -> Option<&str> {
        self.media_src.as_deref()
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    /// Values last pushed back into the controls by a reset.
    pub fn controls(&self) -> Option<&ParameterSet> {
        self.controls.as_ref()
    }

    /// Number of frames presented so far.
    pub fn present_count(&self) -> usize {
        self.present_count
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewSurface for HeadlessSurface {
    fn present(&mut self, frame: &PreviewFrame<'_>) {
        self.present_count += 1;
        self.filter = (!frame.filter.is_identity()).then_some(frame.filter);

        for (id, text) in &frame.readouts {
            if self.readout_elements.contains(id) {
                self.readouts.insert(*id, text.clone());
            }
        }

        if let Some(media) = frame.media {
            self.media_src = Some(media.source.as_url().to_string());
        }
        self.presentation = frame.presentation.clone();
    }

    fn sync_controls(&mut self, values: &ParameterSet) {
        self.controls = Some(*values);
    }
}

/// Records the geometry applied to a comparison area.
#[derive(Debug, Clone)]
pub struct HeadlessComparison {
    container_width: f64,
    has_divider_button: bool,
    overlay_width: Option<String>,
    divider_offset: Option<String>,
    image_widths: Vec<String>,
    apply_count: usize,
}

impl HeadlessComparison {
    /// A container `container_width` pixels wide holding `image_count` images.
    pub fn new(container_width: f64, image_count: usize) -> Self {
        Self {
            container_width,
            has_divider_button: true,
            overlay_width: None,
            divider_offset: None,
            image_widths: vec![String::new(); image_count],
            apply_count: 0,
        }
    }

    pub fn without_divider_button(mut self) -> Self {
        self.has_divider_button = false;
        self
    }

    pub fn set_container_width(&mut self, width: f64) {
        self.container_width = width;
    }

    pub fn overlay_width(&self) -> Option<&str> {
        self.overlay_width.as_deref()
    }

    pub fn divider_offset(&self) -> Option<&str> {
        self.divider_offset.as_deref()
    }

    pub fn image_widths(&self) -> &[String] {
        &self.image_widths
    }

    pub fn apply_count(&self) -> usize {
        self.apply_count
    }
}

impl ComparisonLayout for HeadlessComparison {
    fn container_width(&self) -> f64 {
        self.container_width
    }

    fn apply(&mut self, geometry: &ComparisonGeometry) {
        self.apply_count += 1;
        self.overlay_width = Some(geometry.overlay_css());
        if self.has_divider_button {
            self.divider_offset = Some(geometry.divider_css());
        }
        let width = geometry.image_css();
        for image in &mut self.image_widths {
            image.clone_from(&width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaAsset;
    use crate::render::PreviewRenderer;

    #[test]
    fn test_missing_readouts_are_skipped() {
        let mut surface = HeadlessSurface::with_readouts(&[ParameterId::Contrast]);
        let presentation = Presentation::default();
        PreviewRenderer::apply(&mut surface, &ParameterSet::default(), None, &presentation);

        assert_eq!(surface.readout(ParameterId::Contrast), Some("1.15"));
        assert_eq!(surface.readout(ParameterId::Brightness), None);
        assert_eq!(surface.present_count(), 1);
    }

    #[test]
    fn test_identity_clears_filter() {
        let mut surface = HeadlessSurface::new();
        let presentation = Presentation::default();
        PreviewRenderer::apply(&mut surface, &ParameterSet::default(), None, &presentation);
        assert!(surface.filter().is_some());

        let video = MediaAsset::video("clip.mp4");
        PreviewRenderer::apply(
            &mut surface,
            &ParameterSet::default(),
            Some(&video),
            &presentation,
        );
        assert!(surface.filter().is_none());
        assert_eq!(surface.media_src(), Some(video.source.as_url()));
    }
}
