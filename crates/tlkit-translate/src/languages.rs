use tlkit_core::TlkitError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    pub code: String,
    pub name: String,
}

impl Language {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Recognized target languages, kept in translation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageTable {
    languages: Vec<Language>,
}

impl Default for LanguageTable {
    fn default() -> Self {
        Self::new(vec![
            Language::new("vi", "Vietnamese"),
            Language::new("de", "German"),
            Language::new("es", "Spanish"),
            Language::new("fr", "French"),
            Language::new("ja", "Japanese"),
            Language::new("ko", "Korean"),
            Language::new("zh_CN", "Chinese (Simplified)"),
            Language::new("zh_TW", "Chinese (Traditional)"),
        ])
    }
}

impl LanguageTable {
    /// Later duplicates of a code are dropped.
    pub fn new(languages: Vec<Language>) -> Self {
        let mut out: Vec<Language> = Vec::with_capacity(languages.len());
        for lang in languages {
            if !out.iter().any(|l| l.code == lang.code) {
                out.push(lang);
            }
        }
        Self { languages: out }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Language> {
        self.languages.iter()
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    pub fn get(&self, code: &str) -> Option<&Language> {
        self.languages.iter().find(|l| l.code == code)
    }

    pub fn codes(&self) -> Vec<String> {
        self.languages.iter().map(|l| l.code.clone()).collect()
    }

    /// Look up `code`, failing with the list of recognized codes.
    pub fn resolve(&self, code: &str) -> Result<&Language, TlkitError> {
        self.get(code).ok_or_else(|| TlkitError::UnsupportedLanguage {
            code: code.to_string(),
            supported: self.codes(),
        })
    }
}
