//! One-shot program construction.
//!
//! A `Program` is an immutable analysis context: the entry source file plus
//! every file reachable through its import and re-export specifiers, each
//! parsed and bound. Constructed exactly once per run, queried, discarded.

use crate::config::{self, ResolvedOptions};
use crate::module_resolver::ModuleResolver;
use dtx_binder::BinderState;
use dtx_common::{ResolveError, Result};
use dtx_parser::{NodeArena, NodeIndex, ParserState};
use dtx_scanner::SyntaxKind;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// One parsed and bound file of the program.
#[derive(Debug)]
pub struct SourceFile {
    pub file_name: String,
    pub path: PathBuf,
    pub arena: NodeArena,
    pub root: NodeIndex,
    pub binder: BinderState,
}

#[derive(Debug)]
pub struct Program {
    files: Vec<SourceFile>,
    by_path: FxHashMap<PathBuf, usize>,
    entry: usize,
    pub options: ResolvedOptions,
}

impl Program {
    /// Build a program from a configuration file and one entry source file.
    pub fn load(config_path: &Path, entry_path: &Path) -> Result<Program> {
        let config = config::load_config(config_path)?;
        let base_dir = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let options = config::resolve_options(&config, &base_dir);

        let entry_canonical = canonicalize_or_owned(entry_path);
        let mut files = Vec::new();
        let mut by_path: FxHashMap<PathBuf, usize> = FxHashMap::default();
        let mut pending = VecDeque::new();
        pending.push_back(entry_canonical.clone());

        while let Some(path) = pending.pop_front() {
            if by_path.contains_key(&path) {
                continue;
            }
            let source = match std::fs::read_to_string(&path) {
                Ok(source) => source,
                Err(_) => {
                    // A dependency that cannot be read just does not join the
                    // file set; the entry itself is checked below.
                    continue;
                }
            };

            let file_name = path.to_string_lossy().to_string();
            let mut parser = ParserState::new(file_name.clone(), source);
            let root = parser.parse_source_file();
            let arena = parser.into_arena();

            let mut binder = BinderState::new();
            binder.bind_source_file(&arena, root);

            let resolver = ModuleResolver::new(&options);
            for specifier in collect_module_specifiers(&arena, root) {
                if let Some(resolved) = resolver.resolve(&specifier, &path) {
                    let canonical = canonicalize_or_owned(&resolved);
                    if !by_path.contains_key(&canonical) {
                        pending.push_back(canonical);
                    }
                }
            }

            let idx = files.len();
            by_path.insert(path.clone(), idx);
            files.push(SourceFile {
                file_name,
                path,
                arena,
                root,
                binder,
            });
        }

        let Some(&entry) = by_path.get(&entry_canonical) else {
            return Err(ResolveError::FileNotFound {
                path: entry_path.to_path_buf(),
            });
        };

        tracing::debug!(files = files.len(), "program constructed");
        Ok(Program {
            files,
            by_path,
            entry,
            options,
        })
    }

    #[must_use]
    pub fn entry(&self) -> &SourceFile {
        &self.files[self.entry]
    }

    #[must_use]
    pub fn entry_index(&self) -> usize {
        self.entry
    }

    #[must_use]
    pub fn file(&self, idx: usize) -> &SourceFile {
        &self.files[idx]
    }

    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Resolve a module specifier written in `files[from]` to a program file
    /// index.
    #[must_use]
    pub fn resolve_module(&self, specifier: &str, from: usize) -> Option<usize> {
        let resolver = ModuleResolver::new(&self.options);
        let resolved = resolver.resolve(specifier, &self.files[from].path)?;
        let canonical = canonicalize_or_owned(&resolved);
        self.by_path.get(&canonical).copied()
    }
}

/// Import and re-export specifiers of one file, in source order.
fn collect_module_specifiers(arena: &NodeArena, root: NodeIndex) -> Vec<String> {
    let mut specifiers = Vec::new();
    let Some(root_node) = arena.get(root) else {
        return specifiers;
    };
    let Some(file) = arena.get_source_file(root_node) else {
        return specifiers;
    };

    for &stmt_idx in &file.statements.nodes {
        let Some(stmt) = arena.get(stmt_idx) else {
            continue;
        };
        let module_specifier = match stmt.kind {
            SyntaxKind::ImportDeclaration => {
                arena.get_import_decl(stmt).map(|decl| decl.module_specifier)
            }
            SyntaxKind::ExportDeclaration => {
                arena.get_export_decl(stmt).map(|decl| decl.module_specifier)
            }
            _ => None,
        };
        if let Some(specifier_idx) = module_specifier
            && let Some(specifier_node) = arena.get(specifier_idx)
            && let Some(literal) = arena.get_literal(specifier_node)
        {
            specifiers.push(literal.text.clone());
        }
    }
    specifiers
}

pub(crate) fn canonicalize_or_owned(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
