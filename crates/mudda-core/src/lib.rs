pub mod calculator;
pub mod calendar;
pub mod case;
pub mod error;
pub mod numerals;
pub mod store;
pub mod types;

#[cfg(feature = "report")]
pub mod report;

pub use error::MuddaError;
pub use types::*;

/// Standard result type for all mudda operations
pub type MuddaResult<T> = Result<T, MuddaError>;
