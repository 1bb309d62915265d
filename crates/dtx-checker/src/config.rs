//! Type-checking configuration loading (tsconfig-style JSONC).
//!
//! The configuration file may contain comments and trailing commas, may
//! `extends` another configuration, and uses camelCase keys. Only the
//! options that affect module resolution are consumed; everything else is
//! tolerated and ignored.

use dtx_common::{ResolveError, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TsConfig {
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub compiler_options: Option<CompilerOptions>,
    #[serde(default)]
    pub include: Option<Vec<String>>,
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
    #[serde(default)]
    pub files: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub paths: Option<HashMap<String, Vec<String>>>,
    #[serde(default)]
    pub module_resolution: Option<String>,
    #[serde(default)]
    pub type_roots: Option<Vec<String>>,
}

/// Options resolved against the configuration file's directory.
#[derive(Debug, Clone, Default)]
pub struct ResolvedOptions {
    pub base_url: Option<PathBuf>,
    pub paths: Vec<PathMapping>,
}

/// One `paths` mapping pattern (`"@lib/*": ["src/lib/*"]`).
#[derive(Debug, Clone)]
pub struct PathMapping {
    pattern: String,
    prefix: String,
    suffix: String,
    pub targets: Vec<String>,
}

impl PathMapping {
    fn new(pattern: String, targets: Vec<String>) -> Self {
        let (prefix, suffix) = match pattern.split_once('*') {
            Some((prefix, suffix)) => (prefix.to_string(), suffix.to_string()),
            None => (String::new(), String::new()),
        };
        Self {
            pattern,
            prefix,
            suffix,
            targets,
        }
    }

    /// Match a specifier, returning the `*` capture (empty for exact
    /// patterns).
    pub(crate) fn match_specifier(&self, specifier: &str) -> Option<String> {
        if !self.pattern.contains('*') {
            return if self.pattern == specifier {
                Some(String::new())
            } else {
                None
            };
        }

        if !specifier.starts_with(&self.prefix) || !specifier.ends_with(&self.suffix) {
            return None;
        }

        let start = self.prefix.len();
        let end = specifier.len().saturating_sub(self.suffix.len());
        if end < start {
            return None;
        }

        Some(specifier[start..end].to_string())
    }

    pub(crate) fn specificity(&self) -> usize {
        self.prefix.len() + self.suffix.len()
    }
}

fn configuration_error(path: &Path, message: impl Into<String>) -> ResolveError {
    ResolveError::Configuration {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

/// Parse configuration source text (JSONC tolerated).
pub fn parse_config(path: &Path, source: &str) -> Result<TsConfig> {
    let stripped = strip_jsonc(source);
    let normalized = remove_trailing_commas(&stripped);
    serde_json::from_str(&normalized).map_err(|err| configuration_error(path, err.to_string()))
}

/// Load a configuration file, following `extends` chains.
pub fn load_config(path: &Path) -> Result<TsConfig> {
    let mut visited = HashSet::new();
    load_config_inner(path, &mut visited)
}

fn load_config_inner(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<TsConfig> {
    let canonical = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical.clone()) {
        return Err(configuration_error(path, "extends cycle detected"));
    }

    let source = std::fs::read_to_string(path)
        .map_err(|err| configuration_error(path, format!("failed to read: {err}")))?;
    let mut config = parse_config(path, &source)?;

    let extends = config.extends.take();
    if let Some(extends_path) = extends {
        let base_path = resolve_extends_path(path, &extends_path)?;
        let base_config = load_config_inner(&base_path, visited)?;
        config = merge_configs(base_config, config);
    }

    visited.remove(&canonical);
    Ok(config)
}

fn resolve_extends_path(current_path: &Path, extends: &str) -> Result<PathBuf> {
    let base_dir = current_path
        .parent()
        .ok_or_else(|| configuration_error(current_path, "no parent directory"))?;
    let mut candidate = PathBuf::from(extends);
    if candidate.extension().is_none() {
        candidate.set_extension("json");
    }

    if candidate.is_absolute() {
        Ok(candidate)
    } else {
        Ok(base_dir.join(candidate))
    }
}

fn merge_configs(base: TsConfig, mut child: TsConfig) -> TsConfig {
    let compiler_options = match (base.compiler_options, child.compiler_options.take()) {
        (Some(base_opts), Some(child_opts)) => Some(merge_compiler_options(base_opts, child_opts)),
        (Some(base_opts), None) => Some(base_opts),
        (None, Some(child_opts)) => Some(child_opts),
        (None, None) => None,
    };

    TsConfig {
        extends: None,
        compiler_options,
        include: child.include.or(base.include),
        exclude: child.exclude.or(base.exclude),
        files: child.files.or(base.files),
    }
}

fn merge_compiler_options(base: CompilerOptions, child: CompilerOptions) -> CompilerOptions {
    CompilerOptions {
        base_url: child.base_url.or(base.base_url),
        paths: child.paths.or(base.paths),
        module_resolution: child.module_resolution.or(base.module_resolution),
        type_roots: child.type_roots.or(base.type_roots),
    }
}

/// Resolve path-valued options against the configuration directory.
#[must_use]
pub fn resolve_options(config: &TsConfig, base_dir: &Path) -> ResolvedOptions {
    let mut resolved = ResolvedOptions::default();
    let Some(options) = config.compiler_options.as_ref() else {
        return resolved;
    };

    if let Some(base_url) = options.base_url.as_deref()
        && !base_url.is_empty()
    {
        resolved.base_url = Some(base_dir.join(base_url));
    }

    if let Some(paths) = options.paths.as_ref() {
        let mut mappings: Vec<PathMapping> = paths
            .iter()
            .map(|(pattern, targets)| PathMapping::new(pattern.clone(), targets.clone()))
            .collect();
        // Most specific pattern first; ties broken by pattern text so the
        // resolution order is deterministic regardless of map iteration.
        mappings.sort_by(|left, right| {
            right
                .specificity()
                .cmp(&left.specificity())
                .then_with(|| left.pattern.cmp(&right.pattern))
        });
        resolved.paths = mappings;
    }

    resolved
}

fn strip_jsonc(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape = false;
    let mut in_line_comment = false;
    let mut in_block_comment = false;

    while let Some(ch) = chars.next() {
        if in_line_comment {
            if ch == '\n' {
                in_line_comment = false;
                out.push(ch);
            }
            continue;
        }

        if in_block_comment {
            if ch == '*' {
                if let Some('/') = chars.peek().copied() {
                    chars.next();
                    in_block_comment = false;
                }
            } else if ch == '\n' {
                out.push(ch);
            }
            continue;
        }

        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        if ch == '"' {
            in_string = true;
            out.push(ch);
            continue;
        }

        if ch == '/'
            && let Some(&next) = chars.peek()
        {
            if next == '/' {
                chars.next();
                in_line_comment = true;
                continue;
            }
            if next == '*' {
                chars.next();
                in_block_comment = true;
                continue;
            }
        }

        out.push(ch);
    }

    out
}

fn remove_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape = false;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        if ch == '"' {
            in_string = true;
            out.push(ch);
            continue;
        }

        if ch == ',' {
            let mut lookahead = chars.clone();
            while let Some(next) = lookahead.peek().copied() {
                if next.is_whitespace() {
                    lookahead.next();
                    continue;
                }
                break;
            }
            if let Some(next) = lookahead.peek().copied()
                && (next == '}' || next == ']')
            {
                continue;
            }
        }

        out.push(ch);
    }

    out
}
