pub mod composer;
pub mod insights;

#[cfg(feature = "tenure")]
pub mod tenure;
