use crate::util::absolutize;
use crate::{Document, Result, TlkitError};
use color_eyre::eyre::WrapErr;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tlkit_domain::{LanguageReport, TranslateSummary, SCHEMA_VERSION};
use tlkit_translate::{
    count_document_keys, Language, LanguageTable, Propagator, Throttle, Translator,
};

#[derive(Debug, Clone)]
pub struct TranslateOptions {
    /// Canonical source-language document.
    pub source_file: PathBuf,
    /// Directory receiving `<code>.json` outputs.
    pub out_dir: PathBuf,
    pub source_lang: String,
    pub throttle: Throttle,
}

/// Read the canonical mapping. Missing file, malformed JSON or a non-object top level are fatal.
pub fn load_canonical(path: &Path) -> Result<Document> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("cannot read canonical mapping {}", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .wrap_err_with(|| format!("malformed JSON in {}", path.display()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(TlkitError::CanonicalNotObject {
            path: path.to_path_buf(),
        }
        .into()),
    }
}

/// Write `<out_dir>/<code>.json`: two-space indentation, UTF-8, non-ASCII kept as is.
pub fn save_translation(out_dir: &Path, code: &str, doc: &Document) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(format!("{code}.json"));
    let mut body = serde_json::to_string_pretty(doc)?;
    body.push('\n');
    std::fs::write(&path, body)?;
    Ok(path)
}

/// Translate into every recognized language, one after another.
pub fn translate_all(
    opts: &TranslateOptions,
    table: &LanguageTable,
    translator: &mut dyn Translator,
) -> Result<TranslateSummary> {
    let canonical = load_canonical(&opts.source_file)?;
    let languages: Vec<&Language> = table.iter().collect();
    Ok(run_languages(opts, &canonical, &languages, translator))
}

/// Translate into a single language. An unrecognized code fails before any file is read.
pub fn translate_one(
    opts: &TranslateOptions,
    table: &LanguageTable,
    code: &str,
    translator: &mut dyn Translator,
) -> Result<TranslateSummary> {
    let lang = table.resolve(code)?;
    let canonical = load_canonical(&opts.source_file)?;
    Ok(run_languages(opts, &canonical, &[lang], translator))
}

fn run_languages(
    opts: &TranslateOptions,
    canonical: &Document,
    languages: &[&Language],
    translator: &mut dyn Translator,
) -> TranslateSummary {
    let keys = count_document_keys(canonical);
    tracing::info!(
        event = "translate_start",
        source = %opts.source_file.display(),
        keys = keys,
        languages = languages.len()
    );

    let mut propagator = Propagator::new(translator, opts.source_lang.clone(), opts.throttle);
    let mut reports = Vec::with_capacity(languages.len());
    for (idx, lang) in languages.iter().enumerate() {
        tracing::info!(event = "translate_language_start", code = %lang.code, name = %lang.name);
        let report = translate_language(opts, canonical, lang, &mut propagator);
        match &report.error {
            None => tracing::info!(
                event = "translate_language_done",
                code = %lang.code,
                strings = report.strings,
                failed = report.failed
            ),
            Some(e) => {
                tracing::error!(event = "translate_language_failed", code = %lang.code, error = %e)
            }
        }
        reports.push(report);
        if idx + 1 < languages.len() {
            propagator.throttle().pause_language();
        }
    }

    TranslateSummary {
        schema_version: SCHEMA_VERSION,
        source: opts.source_file.display().to_string(),
        keys,
        languages: reports,
    }
}

fn translate_language(
    opts: &TranslateOptions,
    canonical: &Document,
    lang: &Language,
    propagator: &mut Propagator<'_>,
) -> LanguageReport {
    let mut report = LanguageReport {
        code: lang.code.clone(),
        name: lang.name.clone(),
        output: None,
        strings: 0,
        failed: 0,
        error: None,
    };

    let target = opts.out_dir.join(format!("{}.json", lang.code));
    if absolutize(&target) == absolutize(&opts.source_file) {
        report.error = Some(format!(
            "refusing to overwrite the canonical mapping {}",
            opts.source_file.display()
        ));
        return report;
    }

    let translated = propagator.translate_document(canonical, &lang.code);
    report.strings = translated.strings;
    report.failed = translated.failed;
    match save_translation(&opts.out_dir, &lang.code, &translated.document) {
        Ok(path) => report.output = Some(path.display().to_string()),
        Err(e) => report.error = Some(format!("{e:#}")),
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;
    use tlkit_translate::{DummyTranslator, TranslateError};

    fn opts(dir: &Path) -> TranslateOptions {
        TranslateOptions {
            source_file: dir.join("en.json"),
            out_dir: dir.to_path_buf(),
            source_lang: "en".into(),
            throttle: Throttle::none(),
        }
    }

    fn table() -> LanguageTable {
        LanguageTable::new(vec![Language::new("vi", "Vietnamese"), Language::new("ja", "Japanese")])
    }

    #[test]
    fn writes_one_file_per_language() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("en.json"), r#"{"a": {"b": "hello", "c": ["x", "y"]}}"#)?;

        let summary = translate_all(&opts(dir.path()), &table(), &mut DummyTranslator)?;
        assert_eq!(summary.keys, 3);
        assert_eq!(summary.languages.len(), 2);

        let vi: Value = serde_json::from_str(&fs::read_to_string(dir.path().join("vi.json"))?)?;
        assert_eq!(vi, json!({"a": {"b": "[vi] hello", "c": ["[vi] x", "[vi] y"]}}));
        assert!(dir.path().join("ja.json").exists());
        Ok(())
    }

    #[test]
    fn output_keeps_non_ascii_and_indentation() -> Result<()> {
        let dir = tempdir()?;
        let mut doc = Document::new();
        doc.insert("greet".into(), json!("Xin chào"));
        let path = save_translation(&dir.path().join("out"), "vi", &doc)?;
        assert_eq!(fs::read_to_string(path)?, "{\n  \"greet\": \"Xin chào\"\n}\n");
        Ok(())
    }

    #[test]
    fn unsupported_language_does_no_work() -> Result<()> {
        let dir = tempdir()?;
        // no canonical file on purpose: resolution must fail first
        let err =
            translate_one(&opts(dir.path()), &table(), "xx", &mut DummyTranslator).unwrap_err();
        match err.downcast_ref::<TlkitError>() {
            Some(TlkitError::UnsupportedLanguage { supported, .. }) => {
                assert_eq!(supported, &["vi", "ja"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(fs::read_dir(dir.path())?.count(), 0);
        Ok(())
    }

    #[test]
    fn failing_translator_keeps_original_strings() -> Result<()> {
        struct Down;
        impl Translator for Down {
            fn translate(
                &mut self,
                _: &str,
                _: &str,
                _: &str,
            ) -> std::result::Result<String, TranslateError> {
                Err(TranslateError::Status(503))
            }
        }
        let dir = tempdir()?;
        fs::write(dir.path().join("en.json"), r#"{"title": "Settings"}"#)?;

        let summary = translate_one(&opts(dir.path()), &table(), "ja", &mut Down)?;
        let ja = &summary.languages[0];
        assert_eq!((ja.strings, ja.failed), (1, 1));
        assert!(ja.error.is_none());
        let out: Value = serde_json::from_str(&fs::read_to_string(dir.path().join("ja.json"))?)?;
        assert_eq!(out, json!({"title": "Settings"}));
        Ok(())
    }

    #[test]
    fn unwritable_language_is_reported_and_others_continue() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("en.json"), r#"{"k": "v"}"#)?;
        // a directory squatting on vi.json makes that write fail
        fs::create_dir(dir.path().join("vi.json"))?;

        let summary = translate_all(&opts(dir.path()), &table(), &mut DummyTranslator)?;
        assert!(summary.languages[0].error.is_some());
        assert!(summary.languages[0].output.is_none());
        assert!(summary.languages[1].error.is_none());
        assert!(dir.path().join("ja.json").is_file());
        Ok(())
    }

    #[test]
    fn canonical_errors_are_fatal() {
        let dir = tempdir().unwrap();
        assert!(load_canonical(&dir.path().join("missing.json")).is_err());

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        assert!(load_canonical(&bad).is_err());

        let list = dir.path().join("list.json");
        fs::write(&list, "[1, 2]").unwrap();
        let err = load_canonical(&list).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TlkitError>(),
            Some(TlkitError::CanonicalNotObject { .. })
        ));
    }

    #[test]
    fn source_language_never_overwrites_canonical() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("en.json"), r#"{"k": "v"}"#)?;
        let table = LanguageTable::new(vec![Language::new("en", "English")]);

        let summary = translate_all(&opts(dir.path()), &table, &mut DummyTranslator)?;
        assert!(summary.languages[0].error.is_some());
        assert_eq!(fs::read_to_string(dir.path().join("en.json"))?, r#"{"k": "v"}"#);
        Ok(())
    }
}
