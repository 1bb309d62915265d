//! Common types and utilities for the dtx declaration tool.
//!
//! This crate provides foundational types used across all dtx crates:
//! - String interning (`Atom`, `Interner`)
//! - Source spans (`Span`)
//! - The fatal error taxonomy (`ResolveError`)

// String interning for identifier deduplication
pub mod interner;
pub use interner::{Atom, Interner};

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Fatal error taxonomy shared by the whole pipeline
pub mod errors;
pub use errors::{ResolveError, Result};
