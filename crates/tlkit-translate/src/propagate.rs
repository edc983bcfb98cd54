use serde_json::Value;
use std::time::Duration;
use tlkit_core::Document;

use crate::Translator;

/// Pauses applied to stay under the provider's rate limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    pub between_strings: Duration,
    pub between_languages: Duration,
}

impl Default for Throttle {
    fn default() -> Self {
        Self {
            between_strings: Duration::from_millis(100),
            between_languages: Duration::from_millis(1000),
        }
    }
}

impl Throttle {
    pub fn none() -> Self {
        Self {
            between_strings: Duration::ZERO,
            between_languages: Duration::ZERO,
        }
    }

    fn pause(d: Duration) {
        if !d.is_zero() {
            std::thread::sleep(d);
        }
    }

    pub fn pause_string(&self) {
        Self::pause(self.between_strings);
    }

    pub fn pause_language(&self) {
        Self::pause(self.between_languages);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslateStats {
    /// Strings sent to the translator.
    pub strings: usize,
    /// Strings the translator failed on; the original text was kept.
    pub failed: usize,
}

#[derive(Debug, Clone)]
pub struct TranslatedDocument {
    pub document: Document,
    pub strings: usize,
    pub failed: usize,
}

/// Number of translatable entries: mappings sum their children, sequences count their
/// elements, anything else counts as one.
pub fn count_keys(value: &Value) -> usize {
    match value {
        Value::Object(map) => count_document_keys(map),
        Value::Array(items) => items.len(),
        _ => 1,
    }
}

pub fn count_document_keys(doc: &Document) -> usize {
    doc.values().map(count_keys).sum()
}

/// Walks a canonical document and sends every string through a [`Translator`].
pub struct Propagator<'a> {
    translator: &'a mut dyn Translator,
    source_lang: String,
    throttle: Throttle,
    calls: usize,
}

impl<'a> Propagator<'a> {
    pub fn new(
        translator: &'a mut dyn Translator,
        source_lang: impl Into<String>,
        throttle: Throttle,
    ) -> Self {
        Self {
            translator,
            source_lang: source_lang.into(),
            throttle,
            calls: 0,
        }
    }

    pub fn throttle(&self) -> Throttle {
        self.throttle
    }

    /// Translate one value, recursing into mappings and sequences.
    pub fn translate_value(&mut self, value: &Value, target: &str) -> Value {
        let mut stats = TranslateStats::default();
        self.translate_value_with(value, target, &mut stats)
    }

    pub fn translate_document(&mut self, doc: &Document, target: &str) -> TranslatedDocument {
        let total = count_document_keys(doc);
        let mut processed = 0usize;
        let mut stats = TranslateStats::default();
        let mut out = Document::new();
        for (key, value) in doc {
            processed += count_keys(value);
            tracing::info!(
                event = "translate_progress",
                lang = target,
                processed = processed,
                total = total,
                key = %key
            );
            let translated = self.translate_value_with(value, target, &mut stats);
            out.insert(key.clone(), translated);
        }
        TranslatedDocument {
            document: out,
            strings: stats.strings,
            failed: stats.failed,
        }
    }

    fn translate_value_with(
        &mut self,
        value: &Value,
        target: &str,
        stats: &mut TranslateStats,
    ) -> Value {
        match value {
            Value::String(s) => Value::String(self.translate_text(s, target, stats)),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), self.translate_value_with(v, target, stats)))
                    .collect(),
            ),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|v| self.translate_value_with(v, target, stats))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    fn translate_text(&mut self, text: &str, target: &str, stats: &mut TranslateStats) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }
        if self.calls > 0 {
            self.throttle.pause_string();
        }
        self.calls += 1;
        stats.strings += 1;
        match self.translator.translate(text, &self.source_lang, target) {
            Ok(translated) => translated,
            Err(e) => {
                stats.failed += 1;
                let preview: String = text.chars().take(50).collect();
                tracing::warn!(
                    event = "translate_string_failed",
                    lang = target,
                    text = %preview,
                    error = %e
                );
                text.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DummyTranslator, TranslateError};
    use serde_json::json;

    struct FailOn(&'static str);

    impl Translator for FailOn {
        fn translate(
            &mut self,
            text: &str,
            _source: &str,
            target: &str,
        ) -> Result<String, TranslateError> {
            if text == self.0 {
                Err(TranslateError::Status(429))
            } else {
                Ok(format!("{target}:{text}"))
            }
        }
    }

    fn doc(v: Value) -> Document {
        match v {
            Value::Object(m) => m,
            _ => unreachable!("test documents are objects"),
        }
    }

    #[test]
    fn keeps_structure_and_order() {
        let src = doc(json!({"a": {"b": "hello", "c": ["x", "y"]}, "z": 3, "n": null}));
        let mut t = DummyTranslator;
        let mut p = Propagator::new(&mut t, "en", Throttle::none());
        let out = p.translate_document(&src, "vi");

        assert_eq!(
            Value::Object(out.document.clone()),
            json!({"a": {"b": "[vi] hello", "c": ["[vi] x", "[vi] y"]}, "z": 3, "n": null})
        );
        let keys: Vec<_> = out.document.keys().cloned().collect();
        assert_eq!(keys, ["a", "z", "n"]);
        assert_eq!(out.strings, 3);
        assert_eq!(out.failed, 0);
    }

    #[test]
    fn failed_string_keeps_original() {
        let src = doc(json!({"ok": "Save", "bad": "Cancel", "list": ["Cancel", "Open"]}));
        let mut t = FailOn("Cancel");
        let mut p = Propagator::new(&mut t, "en", Throttle::none());
        let out = p.translate_document(&src, "de");

        assert_eq!(
            Value::Object(out.document),
            json!({"ok": "de:Save", "bad": "Cancel", "list": ["Cancel", "de:Open"]})
        );
        assert_eq!(out.strings, 4);
        assert_eq!(out.failed, 2);
    }

    #[test]
    fn blank_strings_skip_the_translator() {
        let mut t = FailOn("");
        let mut p = Propagator::new(&mut t, "en", Throttle::none());
        assert_eq!(p.translate_value(&json!("   "), "fr"), json!("   "));
        assert_eq!(p.translate_value(&json!(""), "fr"), json!(""));
        assert_eq!(p.translate_value(&json!(true), "fr"), json!(true));
    }

    #[test]
    fn counts_like_the_progress_report() {
        let src = doc(json!({"a": {"b": "x", "c": ["1", "2", "3"]}, "d": "y", "e": {}}));
        assert_eq!(count_document_keys(&src), 5);
        assert_eq!(count_keys(&json!([{"deep": "ignored"}])), 1);
        assert_eq!(count_keys(&json!(7)), 1);
    }
}
