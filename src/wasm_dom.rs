//! DOM-backed surfaces for the browser build.
//!
//! Every element except the preview image and the comparison container is
//! optional and looked up when needed; a missing one is simply skipped.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

use crate::constants::{HIDDEN_CLASS, VIDEO_MODE_CLASS, dom};
use crate::parameters::{ParameterId, ParameterSet};
use crate::render::{PreviewFrame, PreviewSurface, format_readout};
use crate::state::{ComparisonGeometry, ComparisonLayout};

/// Look up an `<input>` by id.
pub fn input_by_id(document: &Document, id: &str) -> Option<HtmlInputElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
}

/// Current value of a parameter control.
///
/// `None` when the control is missing, `Some(None)` when it exists but its
/// value does not parse.
pub fn read_control(document: &Document, id: ParameterId) -> Option<Option<f64>> {
    let input = input_by_id(document, id.control_id())?;
    Some(input.value().trim().parse::<f64>().ok())
}

fn set_class(element: &Element, class: &str, on: bool) {
    if let Err(e) = element.class_list().toggle_with_force(class, on) {
        log::warn!("Failed to toggle class {}: {:?}", class, e);
    }
}

fn set_style(element: &HtmlElement, property: &str, value: &str) {
    if let Err(e) = element.style().set_property(property, value) {
        log::warn!("Failed to set {}: {:?}", property, e);
    }
}

/// The preview image, its placeholder and the parameter readouts.
pub struct DomSurface {
    document: Document,
    preview: HtmlElement,
    placeholder: Option<Element>,
    /// Last URL written to the preview, so unchanged frames don't reload it
    last_src: Option<String>,
}

impl DomSurface {
    /// Find the preview elements; `None` without a preview image.
    pub fn from_document(document: &Document) -> Option<Self> {
        let preview = document
            .get_element_by_id(dom::IMAGE_PREVIEW)?
            .dyn_into::<HtmlElement>()
            .ok()?;
        let placeholder = document
            .get_element_by_id(dom::PREVIEW_PLACEHOLDER)
            .or_else(|| document.get_element_by_id(dom::PREVIEW_PLACEHOLDER_FALLBACK));

        Some(Self {
            document: document.clone(),
            preview,
            placeholder,
            last_src: None,
        })
    }

    /// Text the placeholder shows in the markup, if it exists.
    pub fn placeholder_text(&self) -> Option<String> {
        self.placeholder
            .as_ref()
            .and_then(|p| p.text_content())
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

impl PreviewSurface for DomSurface {
    fn present(&mut self, frame: &PreviewFrame<'_>) {
        if frame.filter.is_identity() {
            if let Err(e) = self.preview.style().remove_property("filter") {
                log::warn!("Failed to clear filter: {:?}", e);
            }
        } else {
            set_style(&self.preview, "filter", &frame.filter.to_css());
        }

        if let Some(media) = frame.media {
            let url = media.source.as_url();
            if self.last_src.as_deref() != Some(url) {
                if let Err(e) = self.preview.set_attribute("src", url) {
                    log::warn!("Failed to set preview source: {:?}", e);
                }
                self.last_src = Some(url.to_string());
            }
        }

        let presentation = frame.presentation;
        set_class(&self.preview, HIDDEN_CLASS, !presentation.preview_visible);
        set_class(&self.preview, VIDEO_MODE_CLASS, presentation.video_mode);

        if let Some(placeholder) = &self.placeholder {
            set_class(placeholder, HIDDEN_CLASS, !presentation.placeholder_visible);
            placeholder.set_text_content(Some(&presentation.placeholder_text));
        }

        for (id, text) in &frame.readouts {
            if let Some(readout) = self.document.get_element_by_id(id.readout_id()) {
                readout.set_text_content(Some(text));
            }
        }
    }

    fn sync_controls(&mut self, values: &ParameterSet) {
        for id in ParameterId::ALL {
            if let Some(input) = input_by_id(&self.document, id.control_id()) {
                input.set_value(&format_readout(values.get(id)));
            }
        }
    }
}

/// The comparison container, its overlay and the divider button.
pub struct DomComparison {
    document: Document,
    container: HtmlElement,
    overlay: HtmlElement,
}

impl DomComparison {
    /// Find the comparison elements; `None` if the container or overlay is missing.
    pub fn from_document(document: &Document) -> Option<Self> {
        let container = document
            .query_selector(dom::COMPARISON_CONTAINER)
            .ok()??
            .dyn_into::<HtmlElement>()
            .ok()?;
        let overlay = document
            .get_element_by_id(dom::PROCESSED_WRAPPER)?
            .dyn_into::<HtmlElement>()
            .ok()?;

        Some(Self {
            document: document.clone(),
            container,
            overlay,
        })
    }
}

impl ComparisonLayout for DomComparison {
    fn container_width(&self) -> f64 {
        f64::from(self.container.offset_width())
    }

    fn apply(&mut self, geometry: &ComparisonGeometry) {
        set_style(&self.overlay, "width", &geometry.overlay_css());

        if let Some(button) = self
            .document
            .get_element_by_id(dom::SLIDER_BUTTON)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            set_style(&button, "left", &geometry.divider_css());
        }

        let images = match self.container.query_selector_all("img") {
            Ok(images) => images,
            Err(e) => {
                log::warn!("Failed to query comparison images: {:?}", e);
                return;
            }
        };
        let width = geometry.image_css();
        for i in 0..images.length() {
            if let Some(image) = images
                .get(i)
                .and_then(|node| node.dyn_into::<HtmlElement>().ok())
            {
                set_style(&image, "width", &width);
            }
        }
    }
}
