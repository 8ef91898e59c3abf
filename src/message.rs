//! Message types driving the preview session.
//!
//! All user input and asynchronous completions are represented as messages in
//! the Elm architecture style and processed one at a time.

use crate::error::DecodeError;
use crate::media::{MediaAsset, SelectedFile};
use crate::parameters::ParameterId;
use crate::state::DecodeToken;

/// Messages that can be sent to update the session.
#[derive(Debug)]
pub enum Message {
    /// A parameter control reported a new value
    ParameterChanged(ParameterId, f64),
    /// Reset button pressed
    ResetRequested,
    /// User picked a file
    FileSelected(SelectedFile),
    /// A decode started earlier has finished
    DecodeFinished {
        /// Token of the selection that started the decode
        token: DecodeToken,
        /// Decoded asset or the failure
        result: Result<MediaAsset, DecodeError>,
    },
    /// Redraw from current state without changing anything
    Refresh,
}

/// Work the host must perform after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Nothing to do
    None,
    /// Start decoding the selected file's payload under this token
    StartDecode(DecodeToken),
}
