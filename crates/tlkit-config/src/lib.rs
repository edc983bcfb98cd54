use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "tlkit.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TlkitConfig {
    pub rewrite: Option<RewriteCfg>,
    pub translate: Option<TranslateCfg>,
    pub schema: Option<SchemaCfg>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RewriteCfg {
    pub root: Option<String>,
    pub extension: Option<String>,
    pub lookup_fn: Option<String>,
    pub lookup_module: Option<String>,
    pub const_keyword: Option<String>,
    pub text_calls: Option<Vec<String>>,
    pub const_parents: Option<Vec<String>>,
    pub backup: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslateCfg {
    pub source_file: Option<String>,
    pub out_dir: Option<String>,
    pub source_lang: Option<String>,
    pub provider: Option<String>,
    pub endpoint: Option<String>,
    pub delay_ms: Option<u64>,
    pub language_delay_ms: Option<u64>,
    pub timeout_ms: Option<u64>,
    pub retries: Option<u32>,
    pub cache_size: Option<usize>,
    /// Recognized target languages, in translation order.
    pub languages: Option<Vec<LanguageCfg>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LanguageCfg {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaCfg {
    pub out_dir: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}

/// Default lookup order: CWD/tlkit.toml, then <config_dir>/tlkit/tlkit.toml.
pub fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(CONFIG_FILE_NAME));
    }
    if let Some(base) = dirs::config_dir() {
        paths.push(base.join("tlkit").join(CONFIG_FILE_NAME));
    }
    paths
}

pub fn load_config() -> TlkitConfig {
    load_config_from(&config_search_paths())
}

/// Merge every readable config in `paths`; earlier files win field by field.
/// Files that fail to parse are reported and skipped.
pub fn load_config_from(paths: &[PathBuf]) -> TlkitConfig {
    let mut merged = TlkitConfig::default();
    for path in paths {
        match read_config(path) {
            Ok(Some(cfg)) => {
                tracing::debug!(event = "config_loaded", path = %path.display());
                merged = merge(merged, cfg);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(event = "config_ignored", error = %e),
        }
    }
    merged
}

fn read_config(path: &Path) -> Result<Option<TlkitConfig>, ConfigError> {
    let Ok(s) = std::fs::read_to_string(path) else {
        return Ok(None);
    };
    toml::from_str::<TlkitConfig>(&s)
        .map(Some)
        .map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

fn merge(mut a: TlkitConfig, b: TlkitConfig) -> TlkitConfig {
    a.rewrite = merge_opt(a.rewrite, b.rewrite, merge_rewrite);
    a.translate = merge_opt(a.translate, b.translate, merge_translate);
    a.schema = merge_opt(a.schema, b.schema, merge_schema);
    a
}

fn merge_opt<T: Default>(a: Option<T>, b: Option<T>, f: fn(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (None, Some(b)) => Some(b),
        (Some(a), None) => Some(a),
        (None, None) => None,
    }
}

fn merge_rewrite(mut a: RewriteCfg, b: RewriteCfg) -> RewriteCfg {
    a.root = a.root.or(b.root);
    a.extension = a.extension.or(b.extension);
    a.lookup_fn = a.lookup_fn.or(b.lookup_fn);
    a.lookup_module = a.lookup_module.or(b.lookup_module);
    a.const_keyword = a.const_keyword.or(b.const_keyword);
    a.text_calls = a.text_calls.or(b.text_calls);
    a.const_parents = a.const_parents.or(b.const_parents);
    a.backup = a.backup.or(b.backup);
    a
}

fn merge_translate(mut a: TranslateCfg, b: TranslateCfg) -> TranslateCfg {
    a.source_file = a.source_file.or(b.source_file);
    a.out_dir = a.out_dir.or(b.out_dir);
    a.source_lang = a.source_lang.or(b.source_lang);
    a.provider = a.provider.or(b.provider);
    a.endpoint = a.endpoint.or(b.endpoint);
    a.delay_ms = a.delay_ms.or(b.delay_ms);
    a.language_delay_ms = a.language_delay_ms.or(b.language_delay_ms);
    a.timeout_ms = a.timeout_ms.or(b.timeout_ms);
    a.retries = a.retries.or(b.retries);
    a.cache_size = a.cache_size.or(b.cache_size);
    a.languages = a.languages.or(b.languages);
    a
}

fn merge_schema(mut a: SchemaCfg, b: SchemaCfg) -> SchemaCfg {
    a.out_dir = a.out_dir.or(b.out_dir);
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn earlier_file_wins_per_field() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.toml");
        let second = dir.path().join("second.toml");
        fs::write(
            &first,
            "[rewrite]\nlookup_fn = \"tr\"\n\n[translate]\ndelay_ms = 0\n",
        )
        .unwrap();
        fs::write(
            &second,
            "[rewrite]\nlookup_fn = \"ignored\"\nroot = \"src\"\n\n[schema]\nout_dir = \"out\"\n",
        )
        .unwrap();

        let cfg = load_config_from(&[first, second]);
        let rw = cfg.rewrite.unwrap();
        assert_eq!(rw.lookup_fn.as_deref(), Some("tr"));
        assert_eq!(rw.root.as_deref(), Some("src"));
        assert_eq!(cfg.translate.unwrap().delay_ms, Some(0));
        assert_eq!(cfg.schema.unwrap().out_dir.as_deref(), Some("out"));
    }

    #[test]
    fn languages_keep_declared_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            r#"
[[translate.languages]]
code = "ko"
name = "Korean"

[[translate.languages]]
code = "de"
name = "German"
"#,
        )
        .unwrap();

        let cfg = load_config_from(&[path]);
        let langs = cfg.translate.unwrap().languages.unwrap();
        let codes: Vec<_> = langs.iter().map(|l| l.code.as_str()).collect();
        assert_eq!(codes, ["ko", "de"]);
    }

    #[test]
    fn malformed_and_missing_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.toml");
        fs::write(&bad, "[rewrite\nroot = ").unwrap();
        let missing = dir.path().join("missing.toml");

        let cfg = load_config_from(&[bad, missing]);
        assert!(cfg.rewrite.is_none());
        assert!(cfg.translate.is_none());
    }
}
