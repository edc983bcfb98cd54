//! Translation of canonical key/value documents into target languages.

mod languages;
mod propagate;
mod provider;

pub use languages::{Language, LanguageTable};
pub use propagate::{
    count_document_keys, count_keys, Propagator, Throttle, TranslateStats, TranslatedDocument,
};
pub use provider::{
    build_translator, google_code, parse_google_response, DummyTranslator, GoogleOptions,
    GoogleTranslator, TranslateError, TranslateProvider, Translator, GOOGLE_ENDPOINT,
};
