//! Error types for the preview core.
//!
//! None of these are fatal: each one ends up as a log line and, where the user
//! needs to act, as text in the preview placeholder.

use thiserror::Error;

/// A parameter name that is not part of the fixed parameter set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParameterError {
    /// Name did not match any parameter or control id
    #[error("Unknown parameter: {0}")]
    Unknown(String),
}

/// Reasons a selected file is refused before any decoding starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    /// Neither an image nor a video
    #[error("Unsupported file type '{mime_type}' for '{name}'. Please choose an image or a video.")]
    UnsupportedMediaType {
        /// Reported MIME type (may be empty)
        mime_type: String,
        /// File name as selected by the user
        name: String,
    },

    /// Larger than the upload limit
    #[error("'{name}' is {size} bytes, the limit is {limit} bytes.")]
    FileTooLarge {
        /// File name as selected by the user
        name: String,
        /// File size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },

    /// Zero-length file
    #[error("'{name}' is empty.")]
    EmptyFile {
        /// File name as selected by the user
        name: String,
    },
}

impl IntakeError {
    /// Create an unsupported media type error.
    pub fn unsupported(mime_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnsupportedMediaType {
            mime_type: mime_type.into(),
            name: name.into(),
        }
    }
}

/// Errors produced while turning a selected image into a displayable asset.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The bytes are not a readable image
    #[error("Could not read image: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error while reading the file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Browser `FileReader` reported a failure
    #[error("File reader failed: {0}")]
    Reader(String),
}
