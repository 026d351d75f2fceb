//! Filter operations
//!
//! This module provides the 3x3 neighborhood operators.

/// Filter kernels
pub mod kernels;

/// Filter operations
mod ops;
pub use ops::*;
