//! Declaration parser and AST types for the dtx tool.
//!
//! Arena-based AST: every node lives in a `NodeArena`, referenced by
//! `NodeIndex`. Per-kind payloads sit in side tables so the node pool itself
//! stays small and uniform.

pub mod node;
pub mod node_arena;
pub mod state;
mod state_types;

pub use node::{Node, NodeIndex, NodeList};
pub use node_arena::NodeArena;
pub use state::ParserState;
