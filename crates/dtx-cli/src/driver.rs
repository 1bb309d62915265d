//! Pipeline driver.
//!
//! Runs the four stages in order - loading, resolving, extracting,
//! synthesizing - and tags any failure with the stage it happened in. The
//! pipeline is linear and non-resumable: a failure before the write leaves
//! any previously generated file untouched.

use crate::args::CliArgs;
use dtx_checker::{CheckerState, Program};
use dtx_common::ResolveError;
use dtx_emitter::{ResolvedOptionTypes, render_declarations, write_declaration_file};
use std::fmt;
use std::path::{Path, PathBuf};

/// Pipeline stage, for failure diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Loading,
    Resolving,
    Extracting,
    Synthesizing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Stage::Loading => "loading",
            Stage::Resolving => "resolving",
            Stage::Extracting => "extracting",
            Stage::Synthesizing => "synthesizing",
        };
        f.write_str(text)
    }
}

/// A fatal pipeline failure, tagged with the stage it happened in.
#[derive(Debug)]
pub struct StageError {
    pub stage: Stage,
    pub error: ResolveError,
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.stage, self.error)
    }
}

impl std::error::Error for StageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

fn at(stage: Stage) -> impl FnOnce(ResolveError) -> StageError {
    move |error| StageError { stage, error }
}

fn resolve_against(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Run the whole pipeline. Returns the written output path.
pub fn run(args: &CliArgs, cwd: &Path) -> Result<PathBuf, StageError> {
    let config_path = resolve_against(cwd, &args.project);
    let entry_path = resolve_against(cwd, &args.entry);
    let out_path = resolve_against(cwd, &args.out);

    let program = {
        let _span = tracing::info_span!("loading").entered();
        Program::load(&config_path, &entry_path).map_err(at(Stage::Loading))?
    };

    let mut checker = CheckerState::new();
    let declared = {
        let _span = tracing::info_span!("resolving").entered();
        let import = checker
            .resolve_named_import(&program, &args.target_import)
            .map_err(at(Stage::Resolving))?;
        checker.declared_type_of_symbol(&program, import.file, import.symbol)
    };

    let resolved = {
        let _span = tracing::info_span!("extracting").entered();
        let mut resolve = |property: &str| {
            checker
                .property_type_text(declared, property, &args.target_import)
                .map_err(at(Stage::Extracting))
        };
        ResolvedOptionTypes {
            theme: resolve("theme")?,
            search: resolve("search")?,
            show_types: resolve("showTypes")?,
            show_length: resolve("showLength")?,
            show_preview: resolve("showPreview")?,
            expand_all: resolve("expandAll")?,
        }
    };

    {
        let _span = tracing::info_span!("synthesizing").entered();
        let content = render_declarations(&resolved);
        write_declaration_file(&out_path, &content).map_err(at(Stage::Synthesizing))?;
    }

    Ok(out_path)
}

/// `--showConfig`: the resolved configuration as the tool sees it.
pub fn show_config(args: &CliArgs, cwd: &Path) -> Result<String, StageError> {
    let config_path = resolve_against(cwd, &args.project);
    let config = dtx_checker::config::load_config(&config_path).map_err(at(Stage::Loading))?;
    let base_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| cwd.to_path_buf());
    let options = dtx_checker::config::resolve_options(&config, &base_dir);
    Ok(format!("{options:#?}"))
}
