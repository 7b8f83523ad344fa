pub mod amortization;
pub mod annuity;
pub mod dates;
pub mod error;
pub mod types;

#[cfg(feature = "posting")]
pub mod posting;

pub use error::PitiError;
pub use types::*;

/// Standard result type for all piti operations
pub type PitiResult<T> = Result<T, PitiError>;
