#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use dtx_cli::args::CliArgs;
use dtx_cli::{driver, tracing_config};

fn main() -> Result<()> {
    // Initialize tracing if DTX_LOG or RUST_LOG is set (zero cost otherwise).
    tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;

    if args.show_config {
        match driver::show_config(&args, &cwd) {
            Ok(text) => {
                println!("{text}");
                return Ok(());
            }
            Err(err) => {
                eprintln!("{} {}", format!("error[{}]:", err.stage).red().bold(), err.error);
                std::process::exit(1);
            }
        }
    }

    match driver::run(&args, &cwd) {
        Ok(path) => {
            tracing::info!(path = %path.display(), "declarations generated");
            Ok(())
        }
        Err(err) => {
            eprintln!("{} {}", format!("error[{}]:", err.stage).red().bold(), err.error);
            std::process::exit(1);
        }
    }
}
