use std::ops::Range;
use std::path::PathBuf;

use thiserror::Error;

/// Workspace-wide result alias.
pub type Result<T> = color_eyre::eyre::Result<T>;

/// Key → value document as read from the canonical translation file.
/// Values are strings, nested documents or arrays; key order follows the file.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Quote character delimiting a literal in UI source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    Single,
    Double,
}

impl QuoteStyle {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '\'' => Some(Self::Single),
            '"' => Some(Self::Double),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Single => '\'',
            Self::Double => '"',
        }
    }
}

/// What follows the literal inside the text call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallShape {
    /// `Text('Hi')`: the call closes right after the literal.
    Sole,
    /// `Text('Hi', style: s)`: a separator continues the argument list.
    Trailing,
}

/// A text-construction call whose first argument is a plain string literal.
///
/// Lives only for the duration of one rewrite pass over a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralMatch {
    /// Name of the enclosing call (`Text`, ...).
    pub call: String,
    pub quote: QuoteStyle,
    /// Literal body between the quotes, escape sequences kept verbatim.
    pub body: String,
    pub shape: CallShape,
    /// Whether the call was preceded by the compile-time constant qualifier.
    pub qualified: bool,
    /// Byte range covering the optional qualifier, the call name, the literal and the
    /// closing paren or separator.
    pub span: Range<usize>,
}

impl LiteralMatch {
    /// The literal as written in source, quotes included.
    pub fn literal(&self) -> String {
        let q = self.quote.as_char();
        format!("{q}{}{q}", self.body)
    }

    pub fn has_trailing_args(&self) -> bool {
        self.shape == CallShape::Trailing
    }
}

#[derive(Debug, Error)]
pub enum TlkitError {
    #[error("unsupported language: {code} (supported: {})", .supported.join(", "))]
    UnsupportedLanguage { code: String, supported: Vec<String> },
    #[error("canonical mapping {} must contain a JSON object at the top level", .path.display())]
    CanonicalNotObject { path: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_keeps_quote_style_and_escapes() {
        let m = LiteralMatch {
            call: "Text".into(),
            quote: QuoteStyle::Double,
            body: r#"He said \"hi\""#.into(),
            shape: CallShape::Sole,
            qualified: false,
            span: 0..0,
        };
        assert_eq!(m.literal(), r#""He said \"hi\"""#);
        assert!(!m.has_trailing_args());
    }

    #[test]
    fn unsupported_language_lists_codes() {
        let err = TlkitError::UnsupportedLanguage {
            code: "xx".into(),
            supported: vec!["vi".into(), "de".into()],
        };
        assert_eq!(err.to_string(), "unsupported language: xx (supported: vi, de)");
    }
}
