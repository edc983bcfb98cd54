use regex::Regex;
use tlkit_core::{CallShape, LiteralMatch, QuoteStyle};

/// Finds text-construction calls whose first argument is a string literal.
///
/// Implementations must return matches sorted by position and without overlaps.
pub trait LiteralLocator: Send + Sync {
    fn find_matches(&self, text: &str) -> Vec<LiteralMatch>;
}

/// Pattern based locator: no grammar, only `[qualifier] Name( 'literal' )` / `... ,` shapes.
pub struct RegexLocator {
    /// `None` when no call names are configured.
    call_open: Option<Regex>,
    /// Lookup function whose literal argument is skipped as a whole.
    lookup_fn: String,
}

impl RegexLocator {
    pub fn new(
        text_calls: &[String],
        const_keyword: &str,
        lookup_fn: &str,
    ) -> Result<Self, regex::Error> {
        let lookup_fn = lookup_fn.to_string();
        if text_calls.is_empty() {
            return Ok(Self {
                call_open: None,
                lookup_fn,
            });
        }
        let names = text_calls
            .iter()
            .map(|n| regex::escape(n))
            .collect::<Vec<_>>()
            .join("|");
        let qualifier = if const_keyword.is_empty() {
            String::new()
        } else {
            format!(r"(?:\b(?P<qual>{})\s+)?", regex::escape(const_keyword))
        };
        let pattern = format!(r"{qualifier}\b(?P<call>{names})\(\s*");
        Ok(Self {
            call_open: Some(Regex::new(&pattern)?),
            lookup_fn,
        })
    }
}

impl LiteralLocator for RegexLocator {
    fn find_matches(&self, text: &str) -> Vec<LiteralMatch> {
        let Some(re) = &self.call_open else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut pos = 0;
        while pos < text.len() {
            let Some(caps) = re.captures_at(text, pos) else {
                break;
            };
            let Some(whole) = caps.get(0) else {
                break;
            };
            let call = &caps["call"];
            match literal_at(text, whole.end()) {
                Some((quote, body_end, shape, end)) => {
                    out.push(LiteralMatch {
                        call: call.to_string(),
                        quote,
                        body: text[whole.end() + 1..body_end].to_string(),
                        shape,
                        qualified: caps.name("qual").is_some(),
                        span: whole.start()..end,
                    });
                    pos = end;
                }
                // Already wrapped: resume after the wrapped literal so call names quoted
                // inside it are never picked up.
                None => match wrapped_literal_end(text, whole.end(), &self.lookup_fn) {
                    Some(end) => pos = end,
                    // a variable or an expression
                    None => pos = whole.end(),
                },
            }
        }
        out
    }
}

/// Reads a quoted literal starting at `start` and the token that follows it.
/// Returns the quote style, the index of the closing quote, the call shape and the index just
/// past the closing paren or separator.
fn literal_at(text: &str, start: usize) -> Option<(QuoteStyle, usize, CallShape, usize)> {
    let bytes = text.as_bytes();
    let (quote, close) = quoted_at(bytes, start)?;

    let mut j = close + 1;
    while bytes.get(j).is_some_and(|b| b.is_ascii_whitespace()) {
        j += 1;
    }
    let shape = match bytes.get(j)? {
        b')' => CallShape::Sole,
        b',' => CallShape::Trailing,
        _ => return None,
    };
    Some((quote, close, shape, j + 1))
}

/// Quote style and closing-quote index of a literal opening at `start`. A backslash always
/// consumes the byte after it.
fn quoted_at(bytes: &[u8], start: usize) -> Option<(QuoteStyle, usize)> {
    let quote = QuoteStyle::from_char(*bytes.get(start)? as char)?;
    let q = quote.as_char() as u8;
    let mut i = start + 1;
    loop {
        match bytes.get(i)? {
            b'\\' => i += 2,
            b if *b == q => return Some((quote, i)),
            _ => i += 1,
        }
    }
}

/// Index just past the literal of `lookup_fn('..')` when that call starts at `start`.
fn wrapped_literal_end(text: &str, start: usize, lookup_fn: &str) -> Option<usize> {
    if lookup_fn.is_empty() {
        return None;
    }
    let rest = text.get(start..)?.strip_prefix(lookup_fn)?.strip_prefix('(')?;
    let bytes = text.as_bytes();
    let mut j = text.len() - rest.len();
    while bytes.get(j).is_some_and(|b| b.is_ascii_whitespace()) {
        j += 1;
    }
    let (_, close) = quoted_at(bytes, j)?;
    Some(close + 1)
}
