use tlkit_core::{CallShape, LiteralMatch};

/// Rebuild `text` with every match replaced by its wrapped form.
/// Overlapping matches (from a misbehaving locator) are skipped.
pub fn wrap_literals(text: &str, matches: &[LiteralMatch], lookup_fn: &str) -> (String, usize) {
    let mut out = String::with_capacity(text.len() + matches.len() * (lookup_fn.len() + 2));
    let mut last = 0;
    let mut wrapped = 0;
    for m in matches {
        if m.span.start < last || m.span.end > text.len() {
            continue;
        }
        out.push_str(&text[last..m.span.start]);
        out.push_str(&wrapped_call(m, lookup_fn));
        last = m.span.end;
        wrapped += 1;
    }
    out.push_str(&text[last..]);
    (out, wrapped)
}

/// `Text('Hi')` → `Text(tl('Hi'))`, `Text('Hi',` → `Text(tl('Hi'),`.
/// The qualifier is dropped: the call can no longer be a compile-time constant.
pub fn wrapped_call(m: &LiteralMatch, lookup_fn: &str) -> String {
    let tail = match m.shape {
        CallShape::Sole => ")",
        CallShape::Trailing => ",",
    };
    format!("{}({}({}){}", m.call, lookup_fn, m.literal(), tail)
}
