pub mod error;
pub mod multiples;
pub mod scenarios;
pub mod strategy;
pub mod types;

#[cfg(feature = "tax")]
pub mod tax;

#[cfg(feature = "wizard")]
pub mod wizard;

pub use error::ValuarError;
pub use types::*;

/// Standard result type for all valuar operations
pub type ValuarResult<T> = Result<T, ValuarError>;
