//! Utilities
//!
//! Small types used throughout the crate.

mod allocator;
mod label;
mod span;
mod temp;

pub use allocator::Allocator;
pub use label::Label;
pub use span::Span;
pub use temp::Temp;
