//! Declaration-subset scanner/tokenizer for the dtx tool.
//!
//! This crate provides the lexical analysis phase:
//! - `SyntaxKind` - Token and node kinds
//! - `ScannerState` - Tokenizer state machine

pub mod scanner;
pub mod syntax_kind;

pub use scanner::{ScannerSnapshot, ScannerState};
pub use syntax_kind::SyntaxKind;
