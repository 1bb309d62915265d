//! Program construction, symbol resolution and type extraction.
//!
//! The crate owns the whole semantic side of the pipeline:
//!
//! - `config` - JSONC configuration loading (`tsconfig.types.json`)
//! - `module_resolver` - relative / paths-mapped / node_modules resolution
//! - `program` - one-shot immutable analysis context over the reachable files
//! - `types` - interned structural type representation (`TypeId`, `TypeData`)
//! - `state` - `CheckerState`: import resolution, declared types, property
//!   extraction
//! - `format` - `TypeFormatter`: type-to-source-text rendering, never
//!   truncated

pub mod config;
pub mod format;
pub mod module_resolver;
pub mod program;
pub mod state;
pub mod types;

pub use config::{ResolvedOptions, TsConfig};
pub use format::TypeFormatter;
pub use module_resolver::ModuleResolver;
pub use program::{Program, SourceFile};
pub use state::{CheckerState, ResolvedImport};
pub use types::{TypeData, TypeId, TypeInterner};
