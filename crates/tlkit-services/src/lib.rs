//! High-level orchestration layer over the rewrite and translate crates.
//! Intentionally thin: owns file I/O and per-unit error isolation, exposes stable
//! functions used by the CLI.

pub mod rewrite;
pub mod translate;
mod util;

pub use rewrite::{apply_tree, collect_candidates, ApplyOptions};
pub use tlkit_core::{Document, Result, TlkitError};
pub use tlkit_domain::{
    FileFailure, LanguageReport, RewriteFilePlan, RewriteSummary, TranslateSummary,
};
pub use translate::{
    load_canonical, save_translation, translate_all, translate_one, TranslateOptions,
};
