//! Common types and utilities shared across the CTM query crates.

pub mod coord;
pub mod error;
pub mod raw;

pub use coord::Coordinate;
pub use error::{CtmError, CtmResult};
pub use raw::{RawDimension, RawGrid, RawVariable};
