//! Source rewriting: wrap hardcoded UI text literals with the translation lookup call,
//! drop compile-time qualifiers the rewrite invalidates, and import the lookup module.
//!
//! Matching is purely textual and lives behind [`LiteralLocator`]; the wrap, qualifier and
//! import steps only see its [`LiteralMatch`] output.

mod imports;
mod locate;
mod qualifier;
mod wrap;

use regex::Regex;
use std::path::{Path, PathBuf};

pub use imports::{relative_import, ImportFixer};
pub use locate::{LiteralLocator, RegexLocator};
pub use qualifier::QualifierStripper;
pub use tlkit_core::{LiteralMatch, Result};
pub use wrap::{wrap_literals, wrapped_call};

/// Tables and names driving one rewrite run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRules {
    /// Lookup function inserted around literals (`tl`).
    pub lookup_fn: String,
    /// File defining the lookup function; imports are computed relative to it.
    pub lookup_module: PathBuf,
    /// Compile-time constant qualifier keyword (`const`).
    pub const_keyword: String,
    /// Calls whose first-argument literal gets wrapped.
    pub text_calls: Vec<String>,
    /// Parents whose qualifier is dropped once the file uses the lookup call.
    pub const_parents: Vec<String>,
    /// Source file extension, without the dot.
    pub extension: String,
}

impl Default for RewriteRules {
    fn default() -> Self {
        Self {
            lookup_fn: "tl".into(),
            lookup_module: PathBuf::from("lib/core/translate.dart"),
            const_keyword: "const".into(),
            text_calls: vec!["Text".into()],
            const_parents: [
                "Center",
                "AppBar",
                "PopupMenuItem",
                "SnackBar",
                "AlertDialog",
                "ListTile",
                "SwitchListTile",
                "CheckboxListTile",
                "ElevatedButton",
                "TextButton",
                "OutlinedButton",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            extension: "dart".into(),
        }
    }
}

impl RewriteRules {
    /// Whether `path` carries the designated source extension.
    pub fn is_candidate(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }
}

/// Result of processing one file's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed {
    pub content: String,
    pub changed: bool,
    pub literals: usize,
    pub qualifiers_stripped: usize,
    pub import_added: bool,
}

pub struct Rewriter {
    rules: RewriteRules,
    locator: Box<dyn LiteralLocator>,
    stripper: QualifierStripper,
    imports: ImportFixer,
    lookup_call: Regex,
}

impl Rewriter {
    pub fn new(rules: RewriteRules) -> Result<Self> {
        let locator =
            RegexLocator::new(&rules.text_calls, &rules.const_keyword, &rules.lookup_fn)?;
        Self::with_locator(rules, Box::new(locator))
    }

    /// Use a custom matching strategy; qualifier and import handling stay the same.
    pub fn with_locator(rules: RewriteRules, locator: Box<dyn LiteralLocator>) -> Result<Self> {
        let stripper = QualifierStripper::new(&rules.const_keyword, &rules.const_parents)?;
        let imports = ImportFixer::new(&rules.lookup_module)?;
        let lookup_call = Regex::new(&format!(r"\b{}\(", regex::escape(&rules.lookup_fn)))?;
        Ok(Self {
            rules,
            locator,
            stripper,
            imports,
            lookup_call,
        })
    }

    pub fn rules(&self) -> &RewriteRules {
        &self.rules
    }

    pub fn find_matches(&self, content: &str) -> Vec<LiteralMatch> {
        self.locator.find_matches(content)
    }

    pub fn uses_lookup(&self, content: &str) -> bool {
        self.lookup_call.is_match(content)
    }

    /// Run the three steps on one file: wrap literals, strip qualifiers, fix the import.
    /// `path` is only used to compute the relative import.
    pub fn process(&self, path: &Path, content: &str) -> Processed {
        let matches = self.locator.find_matches(content);
        let (wrapped, literals) = wrap_literals(content, &matches, &self.rules.lookup_fn);

        let uses_lookup = self.uses_lookup(&wrapped);
        let (stripped, qualifiers_stripped) = if uses_lookup {
            self.stripper.strip(&wrapped)
        } else {
            (wrapped, 0)
        };

        let import_added = uses_lookup && !self.imports.has_import(&stripped);
        let new_content = if import_added {
            let rel = relative_import(&self.rules.lookup_module, path);
            tracing::debug!(event = "import_inserted", path = %path.display(), import = %rel);
            self.imports.insert(&stripped, &rel)
        } else {
            stripped
        };

        Processed {
            changed: new_content != content,
            content: new_content,
            literals,
            qualifiers_stripped,
            import_added,
        }
    }

    /// `(new_content, changed)` form of [`Rewriter::process`].
    pub fn process_content(&self, path: &Path, content: &str) -> (String, bool) {
        let p = self.process(path, content);
        (p.content, p.changed)
    }
}
