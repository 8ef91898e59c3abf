//! Browser entry point.
//!
//! Wires the page's controls to a [`PreviewSession`] and the comparison divider
//! to a [`ComparisonSync`]. Each feature is only wired when its elements exist.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, HtmlInputElement};

use crate::config::PreviewConfig;
use crate::constants::{DEFAULT_PLACEHOLDER_TEXT, dom};
use crate::message::{Effect, Message};
use crate::parameters::ParameterId;
use crate::session::PreviewSession;
use crate::state::ComparisonSync;
use crate::wasm_dom::{DomComparison, DomSurface, input_by_id, read_control};
use crate::wasm_file;

type SharedSession = Rc<RefCell<PreviewSession<DomSurface>>>;

/// Comparison divider and the sync it drives.
struct WebComparison {
    slider: HtmlInputElement,
    sync: ComparisonSync<DomComparison>,
}

impl WebComparison {
    /// Re-read the divider and lay everything out again.
    fn sync_from_slider(&mut self) {
        match self.slider.value().trim().parse::<f64>() {
            Ok(position) => {
                self.sync.set_position(position);
            }
            Err(_) => {
                self.sync.sync();
            }
        }
    }
}

thread_local! {
    /// Global comparison state so `move_slider` can reach it from JS.
    static COMPARISON: RefCell<Option<WebComparison>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let config = PreviewConfig::load_from_local_storage().unwrap_or_default();
    if let Err(e) = console_log::init_with_level(config.log_level.to_level()) {
        web_sys::console::log_1(&format!("Logger already initialised: {}", e).into());
    }

    log::info!("--- OCV: initialising ---");

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::error!("No document available");
        return;
    };

    if let Err(e) = init_preview(&document, &config) {
        log::error!("Live preview unavailable: {:?}", e);
    }
    if let Err(e) = init_comparison(&document, &config) {
        log::error!("Comparison slider unavailable: {:?}", e);
    }
}

/// Re-sync the comparison view from the divider's current value.
#[wasm_bindgen(js_name = moveSlider)]
pub fn move_slider() {
    COMPARISON.with(|comparison| {
        if let Some(comparison) = comparison.borrow_mut().as_mut() {
            comparison.sync_from_slider();
        }
    });
}

fn init_preview(document: &Document, config: &PreviewConfig) -> Result<(), JsValue> {
    let Some(surface) = DomSurface::from_document(document) else {
        log::debug!("No preview surface on this page");
        return Ok(());
    };

    let idle_text = surface
        .placeholder_text()
        .unwrap_or_else(|| DEFAULT_PLACEHOLDER_TEXT.to_string());
    let mut session = PreviewSession::from_config(config, idle_text, surface);
    for id in ParameterId::ALL {
        if let Some(value) = read_control(document, id) {
            session.parameter_store_mut().attach_control(id, value);
        }
    }
    let session: SharedSession = Rc::new(RefCell::new(session));

    if let Some(input) = input_by_id(document, dom::FILE_INPUT) {
        let shared = session.clone();
        let onchange = Closure::wrap(Box::new(move |event: Event| {
            on_file_change(&shared, event);
        }) as Box<dyn FnMut(Event)>);
        input.add_event_listener_with_callback("change", onchange.as_ref().unchecked_ref())?;
        onchange.forget();
    }

    let ranges = document.query_selector_all(dom::RANGE_SELECTOR)?;
    for i in 0..ranges.length() {
        let Some(input) = ranges
            .get(i)
            .and_then(|node| node.dyn_into::<HtmlInputElement>().ok())
        else {
            continue;
        };
        let Ok(id) = input.id().parse::<ParameterId>() else {
            // The comparison divider shares the range styling
            log::debug!("Range '{}' is not a preview parameter", input.id());
            continue;
        };

        let shared = session.clone();
        let oninput = Closure::wrap(Box::new(move |event: Event| {
            let Some(input) = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            let mut session = shared.borrow_mut();
            match input.value().trim().parse::<f64>() {
                Ok(value) => {
                    session.update(Message::ParameterChanged(id, value));
                }
                Err(_) => {
                    session.parameter_store_mut().attach_control(id, None);
                    session.update(Message::Refresh);
                }
            }
        }) as Box<dyn FnMut(Event)>);
        input.add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
        oninput.forget();
    }

    if let Some(button) = document.get_element_by_id(dom::RESET_BUTTON) {
        let shared = session.clone();
        let onclick = Closure::wrap(Box::new(move |_event: Event| {
            shared.borrow_mut().update(Message::ResetRequested);
        }) as Box<dyn FnMut(Event)>);
        button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    session.borrow_mut().update(Message::Refresh);
    log::info!("Live preview ready");
    Ok(())
}

fn on_file_change(session: &SharedSession, event: Event) {
    let Some(input) = event
        .target()
        .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
    else {
        return;
    };
    let Some(file) = input.files().and_then(|files| files.get(0)) else {
        log::debug!("📂 Selection cleared");
        return;
    };

    let effect = session
        .borrow_mut()
        .update(Message::FileSelected(wasm_file::selected_file(&file)));

    if let Effect::StartDecode(token) = effect {
        let shared = session.clone();
        let started = wasm_file::read_as_data_url(token, &file, move |token, result| {
            shared
                .borrow_mut()
                .update(Message::DecodeFinished { token, result });
        });
        if let Err(e) = started {
            session.borrow_mut().update(Message::DecodeFinished {
                token,
                result: Err(e),
            });
        }
    }
}

fn init_comparison(document: &Document, config: &PreviewConfig) -> Result<(), JsValue> {
    let Some(layout) = DomComparison::from_document(document) else {
        log::debug!("No comparison view on this page");
        return Ok(());
    };
    let Some(slider) = input_by_id(document, dom::COMPARISON_SLIDER) else {
        log::debug!("Comparison view without divider control");
        return Ok(());
    };

    let initial = match slider.value().trim().parse::<f64>() {
        Ok(position) => position,
        Err(_) => {
            let position = config.comparison.initial_position;
            slider.set_value(&position.to_string());
            position
        }
    };

    let oninput = Closure::wrap(Box::new(move |_event: Event| {
        move_slider();
    }) as Box<dyn FnMut(Event)>);
    slider.add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
    oninput.forget();

    let onresize = Closure::wrap(Box::new(move |_event: Event| {
        COMPARISON.with(|comparison| {
            if let Some(comparison) = comparison.borrow_mut().as_mut() {
                comparison.sync.on_resize();
            }
        });
    }) as Box<dyn FnMut(Event)>);
    if let Some(window) = web_sys::window() {
        window.add_event_listener_with_callback("resize", onresize.as_ref().unchecked_ref())?;
    }
    onresize.forget();

    // Creating the sync lays out the initial position
    let sync = ComparisonSync::new(layout, initial);
    COMPARISON.with(|comparison| {
        *comparison.borrow_mut() = Some(WebComparison { slider, sync });
    });
    log::info!("Comparison slider ready at {}%", initial);
    Ok(())
}
