//! Application state management modules.

mod comparison;
mod decode_queue;
mod intake;

pub use comparison::{ComparisonGeometry, ComparisonLayout, ComparisonState, ComparisonSync};
pub use decode_queue::{DecodeDone, LocalDecodeQueue};
pub use intake::{DecodeCompletion, DecodeToken, IntakeOutcome, UploadIntake};
