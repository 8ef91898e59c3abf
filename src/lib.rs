//! OCV Preview - live processing preview and before/after comparison
//!
//! Keeps a cheap visual approximation of the image processing parameters in
//! sync with the user's controls, and keeps a comparison divider in sync with
//! two overlaid images. Runs in the browser (WASM) and natively (headless).

pub mod config;
pub mod constants;
pub mod error;
pub mod headless;
pub mod media;
pub mod message;
pub mod parameters;
pub mod render;
pub mod session;
pub mod state;

pub use config::PreviewConfig;
pub use error::{DecodeError, IntakeError, ParameterError};
pub use media::{MediaAsset, MediaKind, SelectedFile};
pub use message::{Effect, Message};
pub use parameters::{ParameterId, ParameterSet, ParameterStore};
pub use render::{FilterDescriptor, Presentation, PreviewFrame, PreviewRenderer, PreviewSurface};
pub use session::PreviewSession;
pub use state::{ComparisonGeometry, ComparisonLayout, ComparisonSync, DecodeToken};

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;
#[cfg(target_arch = "wasm32")]
mod wasm_dom;
#[cfg(target_arch = "wasm32")]
mod wasm_file;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
