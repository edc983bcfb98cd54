use lru::LruCache;
use serde_json::Value;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time::Duration;

pub const GOOGLE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("translation service answered with status {0}")]
    Status(u16),
    #[error("unexpected response shape: {0}")]
    Malformed(String),
    #[error("translation service returned an empty text")]
    Empty,
}

/// A machine translation backend. Given a text and language codes, returns the translation.
pub trait Translator {
    fn translate(&mut self, text: &str, source: &str, target: &str)
        -> Result<String, TranslateError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslateProvider {
    Google,
    Dummy,
}

impl FromStr for TranslateProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" | "gtx" => Ok(Self::Google),
            "dummy" | "pseudo" => Ok(Self::Dummy),
            other => Err(format!("unknown translation provider: {other} (expected google|dummy)")),
        }
    }
}

/// Offline pseudo-translation: `[de] Hello`. Useful for previews and tests.
#[derive(Debug, Default, Clone)]
pub struct DummyTranslator;

impl Translator for DummyTranslator {
    fn translate(
        &mut self,
        text: &str,
        _source: &str,
        target: &str,
    ) -> Result<String, TranslateError> {
        Ok(format!("[{target}] {text}"))
    }
}

#[derive(Debug, Clone)]
pub struct GoogleOptions {
    pub endpoint: String,
    pub timeout_ms: u64,
    /// Extra attempts after the first failure.
    pub retries: u32,
    /// Base pause between attempts; attempt `n` waits `n * retry_delay`.
    pub retry_delay_ms: u64,
    pub cache_size: usize,
}

impl Default for GoogleOptions {
    fn default() -> Self {
        Self {
            endpoint: GOOGLE_ENDPOINT.to_string(),
            timeout_ms: 10_000,
            retries: 2,
            retry_delay_ms: 500,
            cache_size: 1024,
        }
    }
}

/// Client for the public `translate_a/single` endpoint (`client=gtx`).
pub struct GoogleTranslator {
    client: reqwest::blocking::Client,
    opts: GoogleOptions,
    cache: LruCache<(String, String), String>,
}

impl GoogleTranslator {
    pub fn new(opts: GoogleOptions) -> Result<Self, TranslateError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("tlkit/cli")
            .timeout(Duration::from_millis(opts.timeout_ms))
            .build()?;
        let cap = NonZeroUsize::new(opts.cache_size.max(1)).unwrap_or(NonZeroUsize::MIN);
        Ok(Self {
            client,
            opts,
            cache: LruCache::new(cap),
        })
    }

    fn request(&self, text: &str, source: &str, target: &str) -> Result<String, TranslateError> {
        let sl = google_code(source);
        let tl = google_code(target);
        let resp = self
            .client
            .get(&self.opts.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", sl.as_str()),
                ("tl", tl.as_str()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()?;
        if !resp.status().is_success() {
            return Err(TranslateError::Status(resp.status().as_u16()));
        }
        let body: Value = resp.json()?;
        parse_google_response(&body)
    }
}

impl Translator for GoogleTranslator {
    fn translate(
        &mut self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslateError> {
        let key = (target.to_string(), text.to_string());
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit.clone());
        }
        let mut attempt = 0u32;
        loop {
            match self.request(text, source, target) {
                Ok(translated) => {
                    self.cache.put(key, translated.clone());
                    return Ok(translated);
                }
                Err(e) if attempt < self.opts.retries => {
                    attempt += 1;
                    tracing::debug!(event = "translate_retry", attempt = attempt, error = %e);
                    std::thread::sleep(Duration::from_millis(
                        self.opts.retry_delay_ms * u64::from(attempt),
                    ));
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// `zh_CN` → `zh-CN`; the service expects dashes.
pub fn google_code(code: &str) -> String {
    code.replace('_', "-")
}

/// The answer is a nested array; `[0]` holds sentence segments whose first element is the
/// translated chunk.
pub fn parse_google_response(body: &Value) -> Result<String, TranslateError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslateError::Malformed("missing sentence list".into()))?;
    let text: String = segments
        .iter()
        .filter_map(|seg| seg.get(0).and_then(Value::as_str))
        .collect();
    if text.is_empty() {
        Err(TranslateError::Empty)
    } else {
        Ok(text)
    }
}

pub fn build_translator(
    provider: TranslateProvider,
    opts: GoogleOptions,
) -> Result<Box<dyn Translator>, TranslateError> {
    Ok(match provider {
        TranslateProvider::Google => Box::new(GoogleTranslator::new(opts)?),
        TranslateProvider::Dummy => Box::new(DummyTranslator),
    })
}
