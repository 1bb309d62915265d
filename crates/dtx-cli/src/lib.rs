//! CLI surface for the dtx declaration tool.

pub mod args;
pub mod driver;
pub mod tracing_config;

pub use args::CliArgs;
