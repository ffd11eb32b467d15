pub mod emi;
pub mod error;
pub mod types;

#[cfg(feature = "schedule")]
pub mod amortization;

#[cfg(feature = "scenarios")]
pub mod scenarios;

pub use error::EmiPlannerError;
pub use types::*;

/// Standard result type for all emi-planner operations
pub type EmiPlannerResult<T> = Result<T, EmiPlannerError>;
