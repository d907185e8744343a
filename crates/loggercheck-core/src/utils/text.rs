//! Text helpers for rendering diagnostics.

/// Maximum number of characters of source text quoted in a diagnostic.
pub const MAX_QUOTED_CHARS: usize = 20;

/// Truncates `text` to [`MAX_QUOTED_CHARS`] characters, replacing the tail
/// with `...` when it is longer.
///
/// ```ignore
/// assert_eq!(ellipsize("fmt.Sprintf(\"%d\", key)"), "fmt.Sprintf(\"%d\",...");
/// ```
#[must_use]
pub fn ellipsize(text: &str) -> String {
    if text.chars().count() <= MAX_QUOTED_CHARS {
        return text.to_string();
    }
    let mut out: String = text.chars().take(MAX_QUOTED_CHARS - 3).collect();
    out.push_str("...");
    out
}

/// Decodes a string literal token, either `"interpreted"` or `` `raw` ``.
///
/// Returns `None` when the token is not a well-formed string literal.
#[must_use]
pub fn unquote(token: &str) -> Option<String> {
    if token.len() >= 2 {
        if let Some(raw) = token.strip_prefix('`').and_then(|t| t.strip_suffix('`')) {
            return Some(raw.replace('\r', ""));
        }
    }
    if token.len() < 2 {
        return None;
    }
    let inner = token.strip_prefix('"')?.strip_suffix('"')?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let decoded = match chars.next()? {
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{0b}',
            c @ ('\\' | '"') => c,
            'x' => char::from(u8::try_from(read_digits(&mut chars, 2, 16)?).ok()?),
            'u' => char::from_u32(read_digits(&mut chars, 4, 16)?)?,
            'U' => char::from_u32(read_digits(&mut chars, 8, 16)?)?,
            first @ '0'..='7' => {
                let rest = read_digits(&mut chars, 2, 8)?;
                let value = first.to_digit(8)? * 64 + rest;
                char::from(u8::try_from(value).ok()?)
            }
            _ => return None,
        };
        out.push(decoded);
    }
    Some(out)
}

fn read_digits(chars: &mut std::str::Chars<'_>, count: usize, radix: u32) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..count {
        value = value.checked_mul(radix)? + chars.next()?.to_digit(radix)?;
    }
    Some(value)
}
