//! WASM file reading.
//!
//! Reads a browser `File` into a `data:` URL with `FileReader`. The completion
//! arrives as a later event and is tagged with the selection's token so the
//! session can discard results that were superseded in the meantime.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, File, FileReader};

use crate::error::DecodeError;
use crate::media::{MediaAsset, SelectedFile};
use crate::state::DecodeToken;

/// Describe a browser file for the intake.
pub fn selected_file(file: &File) -> SelectedFile {
    SelectedFile::new(file.name(), file.type_(), file.size() as u64)
}

/// Start reading `file`; `on_done` runs once with the result.
pub fn read_as_data_url<F>(token: DecodeToken, file: &File, on_done: F) -> Result<(), DecodeError>
where
    F: FnOnce(DecodeToken, Result<MediaAsset, DecodeError>) + 'static,
{
    let reader = FileReader::new().map_err(|e| DecodeError::Reader(format!("{:?}", e)))?;
    let name = file.name();
    let started = web_time::Instant::now();

    // Shared between onload and onerror; whichever fires first takes it
    let on_done = std::rc::Rc::new(std::cell::RefCell::new(Some(on_done)));

    let done_load = on_done.clone();
    let onload = Closure::wrap(Box::new(move |event: Event| {
        let result = event
            .target()
            .and_then(|t| t.dyn_into::<FileReader>().ok())
            .ok_or_else(|| DecodeError::Reader("load event without reader".to_string()))
            .and_then(|reader| {
                reader
                    .result()
                    .map_err(|e| DecodeError::Reader(format!("{:?}", e)))
            })
            .and_then(|value| {
                value
                    .as_string()
                    .ok_or_else(|| DecodeError::Reader("reader result is not a string".to_string()))
            })
            .map(|url| MediaAsset::image_from_data_url(&name, url));

        log::debug!(
            "Read {} in {:.1} ms",
            token,
            started.elapsed().as_secs_f64() * 1000.0
        );
        let callback = done_load.borrow_mut().take();
        if let Some(callback) = callback {
            callback(token, result);
        }
    }) as Box<dyn FnMut(Event)>);

    let done_error = on_done;
    let onerror = Closure::wrap(Box::new(move |_event: Event| {
        let callback = done_error.borrow_mut().take();
        if let Some(callback) = callback {
            callback(token, Err(DecodeError::Reader("could not read file".to_string())));
        }
    }) as Box<dyn FnMut(Event)>);

    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    reader.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    // Leak the closures to keep them alive until the reader fires
    onload.forget();
    onerror.forget();

    reader
        .read_as_data_url(file)
        .map_err(|e| DecodeError::Reader(format!("{:?}", e)))
}
