#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image statistics and sample conversion module.
pub mod core;

/// error types for the filtering engine.
pub mod error;

/// image filtering module.
pub mod filter;

/// synthetic noise generation module.
pub mod noise;

/// border extension module.
pub mod padding;

/// module containing parallelization utilities.
pub mod parallel;

pub use crate::error::FilterError;
