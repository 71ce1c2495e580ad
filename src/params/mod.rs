//! Parameter definitions with units and documented semantics.
//!
//! All tuning constants are extracted here with:
//! - Units (seconds, milliseconds, Hz, linear gain)
//! - Documented ranges and meanings
//! - `Default` impls holding the stock values

mod audio;
mod expression;
mod link;

// Re-export all types
pub use audio::{SynthConfig, TestTone};
pub use expression::ExpressionMapping;
pub use link::{LinkConfig, DEFAULT_HOST_URL};
