//! Fatal error taxonomy for the declaration pipeline.
//!
//! Every variant aborts the run. None is retried and none is recovered
//! locally: a mismatch between the tool's assumptions and the actual shape
//! of the upstream type must stop the build rather than emit a
//! silently-wrong declaration.

use std::fmt;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, ResolveError>;

/// A fatal pipeline failure.
#[derive(Debug)]
pub enum ResolveError {
    /// The type-checking configuration file is missing or malformed.
    Configuration { path: PathBuf, message: String },
    /// The entry source file is not part of the constructed program.
    FileNotFound { path: PathBuf },
    /// No import declaration in the entry file binds the target name.
    SymbolNotFound { name: String, file: String },
    /// A requested property does not exist on the resolved type.
    PropertyNotFound { property: String, type_name: String },
    /// The output file could not be persisted.
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::Configuration { path, message } => {
                write!(f, "invalid configuration {}: {}", path.display(), message)
            }
            ResolveError::FileNotFound { path } => {
                write!(f, "entry file {} is not part of the program", path.display())
            }
            ResolveError::SymbolNotFound { name, file } => {
                write!(f, "could not find an import of '{name}' in {file}")
            }
            ResolveError::PropertyNotFound {
                property,
                type_name,
            } => {
                write!(f, "property '{property}' not found on {type_name}")
            }
            ResolveError::Write { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolveError::Write { source, .. } => Some(source),
            _ => None,
        }
    }
}
