pub mod amortization;
pub mod deal;
pub mod error;
pub mod profile;
pub mod types;

#[cfg(feature = "schedule")]
pub mod schedule;

#[cfg(feature = "grid")]
pub mod grid;

pub use deal::{calculate, DealInputs, DealResult};
pub use error::{DeskingError, ErrorKind, ErrorResponse};
pub use profile::DeskingProfile;
pub use types::*;

/// Standard result type for all desking operations
pub type DeskingResult<T> = Result<T, DeskingError>;
