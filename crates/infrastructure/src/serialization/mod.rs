//! Deterministic JSON serialization for suite reports.
//!
//! Reports diff cleanly between runs:
//! - 2-space indentation
//! - Trailing newline
//! - UTF-8 encoding without BOM

mod json;

pub use json::*;
