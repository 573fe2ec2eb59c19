pub mod error;
pub mod types;

#[cfg(feature = "pricing")]
pub mod pricing;

#[cfg(feature = "analytics")]
pub mod analytics;

#[cfg(feature = "catalog")]
pub mod catalog;

#[cfg(feature = "audit_log")]
pub mod audit_log;

pub use error::LabPricingError;
pub use types::*;

/// Standard result type for all lab-pricing operations
pub type LabPricingResult<T> = Result<T, LabPricingError>;
