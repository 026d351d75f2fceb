#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color transformations module.
pub mod color;

/// edge detection pipeline module.
pub mod edges;

/// image filtering module.
pub mod filter;

/// image flipping module.
pub mod flip;

/// module containing parallelization utilities.
pub mod parallel;
