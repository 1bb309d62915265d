//! Declaration file synthesis.
//!
//! Interpolates the resolved option type texts into the fixed declaration
//! template and persists the result. The emitted file embeds every resolved
//! type as a literal and carries no import of the introspected package, so
//! consumers do not need that package installed.

use dtx_common::{ResolveError, Result};
use std::path::Path;

/// Property names resolved from the upstream options type, in emission order.
pub const RESOLVED_PROPERTIES: [&str; 6] = [
    "theme",
    "search",
    "showTypes",
    "showLength",
    "showPreview",
    "expandAll",
];

/// The resolved type text for each extracted property.
#[derive(Clone, Debug)]
pub struct ResolvedOptionTypes {
    pub theme: String,
    pub search: String,
    pub show_types: String,
    pub show_length: String,
    pub show_preview: String,
    pub expand_all: String,
}

/// Compose the full declaration file content.
#[must_use]
pub fn render_declarations(resolved: &ResolvedOptionTypes) -> String {
    let ResolvedOptionTypes {
        theme,
        search,
        show_types,
        show_length,
        show_preview,
        expand_all,
    } = resolved;

    format!(
        r#"/**
 * Type declarations for inspect-value-element custom elements.
 * Provides autocomplete in React (JSX) and Vue templates.
 *
 * Types for theme, search, showTypes, showLength, showPreview, and expandAll
 * are resolved from svelte-inspect-value's InspectOptions at build time.
 *
 * @module
 */

export interface InspectValueAttributes {{
  /** The value to inspect. Must be set via the DOM property for non-primitives. */
  value?: unknown;
  /** Label displayed before the value. */
  name?: string;
  /** Color theme. */
  theme?: {theme};
  /** Enable search. */
  search?: {search};
  /** Max expansion depth. Nodes deeper than this start collapsed. */
  depth?: number;
  /** Show type annotations next to values. */
  showTypes?: {show_types};
  /** Show collection lengths (e.g., Array(3)). */
  showLength?: {show_length};
  /** Show inline previews for collapsed objects/arrays. */
  showPreview?: {show_preview};
  /** Expand all nodes on render. */
  expandAll?: {expand_all};
}}

export interface InspectPanelAttributes {{
  /** A single value to inspect. */
  value?: unknown;
  /** Multiple values to inspect (displayed as a list). */
  values?: unknown;
  /** Label displayed in the panel header. */
  name?: string;
  /** Color theme. */
  theme?: {theme};
  /** Enable search. */
  search?: {search};
  /** Max expansion depth. */
  depth?: number;
  /** Panel position: 'bottom-right' | 'bottom-left' | 'top-right' | 'top-left'. */
  position?: string;
  /** Whether the panel is expanded. */
  open?: boolean;
  /** Panel height when open (CSS value, e.g. '40vh'). */
  height?: string;
  /** Panel width (CSS value, e.g. '100%'). */
  width?: string;
  /** Z-index for the panel. Defaults to 9999 to stay above most UI. */
  zIndex?: number;
  /** Show type annotations next to values. */
  showTypes?: {show_types};
  /** Show collection lengths. */
  showLength?: {show_length};
  /** Show inline previews. */
  showPreview?: {show_preview};
}}

// ─── React JSX augmentation ──────────────────────────────────

declare namespace JSX {{
  interface IntrinsicElements {{
    'inspect-value': InspectValueAttributes &
      React.DetailedHTMLProps<React.HTMLAttributes<HTMLElement>, HTMLElement>;
    'inspect-panel': InspectPanelAttributes &
      React.DetailedHTMLProps<React.HTMLAttributes<HTMLElement>, HTMLElement>;
  }}
}}

// ─── Vue template augmentation ───────────────────────────────

declare module 'vue' {{
  export interface GlobalComponents {{
    'inspect-value': InspectValueAttributes;
    'inspect-panel': InspectPanelAttributes;
  }}
}}

export {{}};
"#
    )
}

/// Persist the declaration file, overwriting any prior content.
///
/// The content is fully composed before this is called, so the write is
/// all-or-nothing: a failure here leaves no partial file from this run.
pub fn write_declaration_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|source| ResolveError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = content.len(), "declarations written");
    Ok(())
}
