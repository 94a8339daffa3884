//! Escaping transform applied to submitted text before storage.

/// Escape the five characters that could break out of the surrounding
/// `<pre>`/template markup: `&`, `<`, `>`, `"`, `'`.
///
/// Runs as a single left-to-right pass over the original characters, so
/// ampersands introduced by the substitutions themselves are never
/// re-escaped. Stored content is therefore escaped text, not raw text.
///
/// # Arguments
/// - `input`: Arbitrary submitted text.
///
/// # Returns
/// The input with every reserved character replaced by its entity form.
pub fn sanitize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
