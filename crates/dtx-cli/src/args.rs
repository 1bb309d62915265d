//! CLI arguments for the dtx binary.

use clap::Parser;
use std::path::PathBuf;

/// dtx resolves option member types from svelte-inspect-value at build time
/// and generates a standalone declaration file with no external imports.
///
/// Invoked with no arguments it uses the fixed project layout; every path
/// can be overridden for tests and unusual setups.
#[derive(Parser, Debug)]
#[command(
    name = "dtx",
    version,
    about = "Generate self-contained type declarations for the inspect-value custom elements"
)]
pub struct CliArgs {
    /// Path to the type-checking configuration file.
    #[arg(short = 'p', long = "project", default_value = "tsconfig.types.json")]
    pub project: PathBuf,

    /// Entry source file containing the designated import.
    #[arg(long, default_value = "src/types.ts")]
    pub entry: PathBuf,

    /// Destination for the generated declaration file.
    #[arg(long, default_value = "dist/index.d.ts")]
    pub out: PathBuf,

    /// Name of the imported type whose members are resolved.
    #[arg(long = "target-import", default_value = "InspectOptions")]
    pub target_import: String,

    /// Print the resolved configuration instead of generating.
    #[arg(long = "showConfig", alias = "show-config")]
    pub show_config: bool,
}
