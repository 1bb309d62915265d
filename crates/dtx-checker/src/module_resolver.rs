//! Module resolution for import specifiers.
//!
//! Covers the three shapes the tool meets in practice:
//! - relative specifiers (`./options`, `../shared/types`)
//! - `paths`/`baseUrl` mappings from the configuration
//! - bare package specifiers resolved through `node_modules`, entering the
//!   package at its `types`/`typings` declaration file
//!
//! Resolution is declaration-oriented: candidate extensions prefer `.ts` and
//! `.d.ts`, and `.js` suffixes written in ESM-style imports are mapped back
//! to their declaration sources.

use crate::config::ResolvedOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Fields of package.json the resolver consumes.
#[derive(Debug, Deserialize, Default)]
struct PackageManifest {
    #[serde(default)]
    types: Option<String>,
    #[serde(default)]
    typings: Option<String>,
}

pub struct ModuleResolver<'a> {
    options: &'a ResolvedOptions,
}

impl<'a> ModuleResolver<'a> {
    #[must_use]
    pub fn new(options: &'a ResolvedOptions) -> Self {
        Self { options }
    }

    /// Resolve a specifier as written in `containing_file`. `None` means the
    /// module is outside the reachable file set (tolerated at program
    /// construction; the designated chain failing surfaces later with a
    /// precise error).
    #[must_use]
    pub fn resolve(&self, specifier: &str, containing_file: &Path) -> Option<PathBuf> {
        if specifier.is_empty() {
            return None;
        }

        if specifier.starts_with("./") || specifier.starts_with("../") {
            let base = containing_file.parent()?;
            return resolve_as_file_or_directory(&base.join(specifier));
        }

        if let Some(resolved) = self.resolve_with_paths(specifier) {
            return Some(resolved);
        }

        if let Some(base_url) = self.options.base_url.as_deref()
            && let Some(resolved) = resolve_as_file_or_directory(&base_url.join(specifier))
        {
            return Some(resolved);
        }

        self.resolve_from_node_modules(specifier, containing_file)
    }

    fn resolve_with_paths(&self, specifier: &str) -> Option<PathBuf> {
        let base = self.options.base_url.as_deref()?;
        for mapping in &self.options.paths {
            let Some(capture) = mapping.match_specifier(specifier) else {
                continue;
            };
            for target in &mapping.targets {
                let substituted = target.replace('*', &capture);
                if let Some(resolved) = resolve_as_file_or_directory(&base.join(substituted)) {
                    return Some(resolved);
                }
            }
        }
        None
    }

    /// Walk up from the importing file probing `node_modules/<package>`.
    fn resolve_from_node_modules(
        &self,
        specifier: &str,
        containing_file: &Path,
    ) -> Option<PathBuf> {
        let (package_name, subpath) = split_package_specifier(specifier);

        let mut dir = containing_file.parent();
        while let Some(current) = dir {
            let package_root = current.join("node_modules").join(package_name);
            if package_root.is_dir() {
                let resolved = if subpath.is_empty() {
                    resolve_package_entry(&package_root)
                } else {
                    resolve_as_file_or_directory(&package_root.join(subpath))
                };
                if resolved.is_some() {
                    return resolved;
                }
            }
            dir = current.parent();
        }
        None
    }
}

/// Split a bare specifier into package name and subpath, honoring scopes:
/// `@scope/pkg/sub` -> (`@scope/pkg`, `sub`).
fn split_package_specifier(specifier: &str) -> (&str, &str) {
    let mut segments = specifier.splitn(3, '/');
    let first = segments.next().unwrap_or(specifier);
    if first.starts_with('@') {
        let Some(second) = segments.next() else {
            return (specifier, "");
        };
        let name_len = first.len() + 1 + second.len();
        let rest = specifier.get(name_len + 1..).unwrap_or("");
        (&specifier[..name_len], rest)
    } else {
        let rest = specifier.get(first.len() + 1..).unwrap_or("");
        (first, rest)
    }
}

/// Package entry point: `types`/`typings` from package.json, falling back to
/// `index.d.ts`.
fn resolve_package_entry(package_root: &Path) -> Option<PathBuf> {
    let manifest_path = package_root.join("package.json");
    if let Ok(source) = std::fs::read_to_string(&manifest_path) {
        let manifest: PackageManifest = serde_json::from_str(&source).unwrap_or_default();
        if let Some(types) = manifest.types.or(manifest.typings)
            && let Some(resolved) = resolve_as_file_or_directory(&package_root.join(types))
        {
            return Some(resolved);
        }
    }
    resolve_as_file_or_directory(&package_root.join("index.d.ts"))
}

/// Try a path as a file (with declaration-oriented extension candidates),
/// then as a directory with an index file.
fn resolve_as_file_or_directory(path: &Path) -> Option<PathBuf> {
    if path.is_file() && has_source_extension(path) {
        return Some(path.to_path_buf());
    }

    let text = path.to_string_lossy();

    // ESM-style `./options.js` points at the emitted file; the declaration
    // source sits next to it.
    if let Some(stem) = text.strip_suffix(".js") {
        for ext in [".ts", ".d.ts"] {
            let candidate = PathBuf::from(format!("{stem}{ext}"));
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }

    for ext in [".ts", ".d.ts"] {
        let candidate = PathBuf::from(format!("{text}{ext}"));
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    if path.is_dir() {
        for index in ["index.ts", "index.d.ts"] {
            let candidate = path.join(index);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }

    None
}

fn has_source_extension(path: &Path) -> bool {
    let text = path.to_string_lossy();
    text.ends_with(".ts") || text.ends_with(".d.ts") || text.ends_with(".tsx")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ResolvedOptions, resolve_options};

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn splits_scoped_and_plain_specifiers() {
        assert_eq!(split_package_specifier("lodash"), ("lodash", ""));
        assert_eq!(split_package_specifier("lodash/fp"), ("lodash", "fp"));
        assert_eq!(
            split_package_specifier("@scope/pkg/deep/mod"),
            ("@scope/pkg", "deep/mod")
        );
        assert_eq!(split_package_specifier("@scope/pkg"), ("@scope/pkg", ""));
    }

    #[test]
    fn resolves_relative_with_extension_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("src/types.ts"), "");
        write(&root.join("src/options.d.ts"), "");

        let options = ResolvedOptions::default();
        let resolver = ModuleResolver::new(&options);
        let containing = root.join("src/types.ts");
        assert_eq!(
            resolver.resolve("./options", &containing),
            Some(root.join("src/options.d.ts"))
        );
        assert_eq!(resolver.resolve("./missing", &containing), None);
    }

    #[test]
    fn resolves_js_suffix_to_declaration_source() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("src/entry.ts"), "");
        write(&root.join("src/options.ts"), "");

        let options = ResolvedOptions::default();
        let resolver = ModuleResolver::new(&options);
        assert_eq!(
            resolver.resolve("./options.js", &root.join("src/entry.ts")),
            Some(root.join("src/options.ts"))
        );
    }

    #[test]
    fn resolves_package_through_types_field() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("src/types.ts"), "");
        let package = root.join("node_modules/svelte-inspect-value");
        write(
            &package.join("package.json"),
            r#"{ "types": "./dist/index.d.ts" }"#,
        );
        write(&package.join("dist/index.d.ts"), "");

        let options = ResolvedOptions::default();
        let resolver = ModuleResolver::new(&options);
        assert_eq!(
            resolver.resolve("svelte-inspect-value", &root.join("src/types.ts")),
            Some(package.join("dist/index.d.ts"))
        );
    }

    #[test]
    fn falls_back_to_index_dts_without_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("src/types.ts"), "");
        let package = root.join("node_modules/bare");
        write(&package.join("index.d.ts"), "");

        let options = ResolvedOptions::default();
        let resolver = ModuleResolver::new(&options);
        assert_eq!(
            resolver.resolve("bare", &root.join("src/types.ts")),
            Some(package.join("index.d.ts"))
        );
    }

    #[test]
    fn paths_mapping_wins_over_node_modules() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("src/entry.ts"), "");
        write(&root.join("src/lib/util.ts"), "");
        let config = crate::config::parse_config(
            Path::new("tsconfig.types.json"),
            r#"{ "compilerOptions": { "baseUrl": ".", "paths": { "@lib/*": ["src/lib/*"] } } }"#,
        )
        .unwrap();
        let options = resolve_options(&config, root);

        let resolver = ModuleResolver::new(&options);
        assert_eq!(
            resolver.resolve("@lib/util", &root.join("src/entry.ts")),
            Some(root.join("src/lib/util.ts"))
        );
    }
}
