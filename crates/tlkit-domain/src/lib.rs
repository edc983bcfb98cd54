use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// What one rewrite pass did (or would do) to a single source file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct RewriteFilePlan {
    pub path: String,
    /// Literals wrapped with the lookup call.
    pub literals: usize,
    /// Compile-time qualifiers removed from parent constructs.
    pub qualifiers: usize,
    pub import_added: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FileFailure {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RewriteSummary {
    pub schema_version: u32,
    pub dry_run: bool,
    /// Candidate files visited.
    pub processed: usize,
    /// Files whose content changed, in visit order.
    pub changed: Vec<String>,
    pub files: Vec<RewriteFilePlan>,
    pub failures: Vec<FileFailure>,
}

impl RewriteSummary {
    pub fn new(dry_run: bool) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            dry_run,
            processed: 0,
            changed: Vec::new(),
            files: Vec::new(),
            failures: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LanguageReport {
    pub code: String,
    pub name: String,
    /// Written output file; `None` when the language failed.
    pub output: Option<String>,
    /// Strings sent to the translation provider.
    pub strings: usize,
    /// Strings kept untranslated after a provider failure.
    pub failed: usize,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TranslateSummary {
    pub schema_version: u32,
    pub source: String,
    pub keys: usize,
    pub languages: Vec<LanguageReport>,
}
