pub mod export;
pub mod plans;
pub mod schedule;
