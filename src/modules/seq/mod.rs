//! Sequence module
//!
//! Symbol-level helpers shared by the metrics and the annotator.

pub mod alphabet;

/// Convenience re-exports
pub use alphabet::{ClassKind, SymbolClass};
