//! Detection of printf-style format directives in logging messages.
//!
//! Directives are parsed the way printf format strings are vetted:
//! `%[flags][[index]][width][.[index]precision][[index]]verb`. A directive
//! that does not parse, uses an unknown verb, or combines a verb with a flag
//! it does not accept is skipped, and scanning resumes right after its `%`.

/// Flags accepted by numeric verbs.
const NUM_FLAGS: &str = " -+.0";
/// Flags accepted by numeric verbs with an alternate form.
const SHARP_NUM_FLAGS: &str = " -+.0#";
/// Every flag.
const ALL_FLAGS: &str = " -+.0#";

/// Verbs and the flags each one accepts.
const VERBS: &[(char, &str)] = &[
    ('%', ""),
    ('b', SHARP_NUM_FLAGS),
    ('c', "-"),
    ('d', NUM_FLAGS),
    ('e', SHARP_NUM_FLAGS),
    ('E', SHARP_NUM_FLAGS),
    ('f', SHARP_NUM_FLAGS),
    ('F', SHARP_NUM_FLAGS),
    ('g', SHARP_NUM_FLAGS),
    ('G', SHARP_NUM_FLAGS),
    ('o', SHARP_NUM_FLAGS),
    ('O', SHARP_NUM_FLAGS),
    ('p', "-#"),
    ('q', " -+.0#"),
    ('s', NUM_FLAGS),
    ('t', "-"),
    ('T', "-"),
    ('U', "-#"),
    ('v', ALL_FLAGS),
    ('w', ALL_FLAGS),
    ('x', SHARP_NUM_FLAGS),
    ('X', SHARP_NUM_FLAGS),
];

/// Returns the first valid format directive in `format`, e.g. `%s` or
/// `%[3]*.[2]*[1]f`. `%%` escapes are not directives.
#[must_use]
pub fn first_specifier(format: &str) -> Option<&str> {
    let mut i = 0;
    while let Some(rel) = format[i..].find('%') {
        let start = i + rel;
        let rest = &format[start..];
        match Directive::parse(rest) {
            Some(d) if d.is_valid() && d.verb == '%' => i = start + d.len,
            Some(d) if d.is_valid() => return Some(&rest[..d.len]),
            _ => i = start + 1,
        }
    }
    None
}

/// Returns true if `format` contains at least one format directive.
#[must_use]
pub fn has_specifier(format: &str) -> bool {
    first_specifier(format).is_some()
}

#[derive(Debug)]
struct Directive {
    verb: char,
    flags: String,
    len: usize,
}

impl Directive {
    /// Parses the directive starting at the `%` that begins `text`.
    fn parse(text: &str) -> Option<Self> {
        let mut p = Parser {
            text,
            pos: 1,
            flags: String::new(),
            index_pending: false,
        };
        p.parse_flags();
        p.parse_index()?;
        p.parse_num();
        p.parse_precision()?;
        if !p.index_pending {
            p.parse_index()?;
        }
        let verb = text[p.pos..].chars().next()?;
        Some(Self {
            verb,
            flags: p.flags,
            len: p.pos + verb.len_utf8(),
        })
    }

    fn is_valid(&self) -> bool {
        let Some((_, accepted)) = VERBS.iter().find(|(verb, _)| *verb == self.verb) else {
            return false;
        };
        // '0' is accepted by every verb
        self.flags
            .chars()
            .all(|flag| flag == '0' || accepted.contains(flag))
    }
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
    flags: String,
    index_pending: bool,
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn parse_flags(&mut self) {
        while let Some(c @ (b'#' | b'0' | b'+' | b'-' | b' ')) = self.peek() {
            self.flags.push(char::from(c));
            self.pos += 1;
        }
    }

    /// Parses an explicit argument index `[n]`. `None` means malformed.
    fn parse_index(&mut self) -> Option<()> {
        if self.peek() != Some(b'[') {
            return Some(());
        }
        let start = self.pos + 1;
        let mut end = start;
        while self
            .text
            .as_bytes()
            .get(end)
            .is_some_and(u8::is_ascii_digit)
        {
            end += 1;
        }
        if self.text.as_bytes().get(end) != Some(&b']') {
            return None;
        }
        let index: u32 = self.text[start..end].parse().ok()?;
        if index == 0 {
            return None;
        }
        self.pos = end + 1;
        self.index_pending = true;
        Some(())
    }

    fn parse_num(&mut self) {
        if self.peek() == Some(b'*') {
            self.pos += 1;
            self.index_pending = false;
            return;
        }
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
    }

    fn parse_precision(&mut self) -> Option<()> {
        if self.peek() == Some(b'.') {
            self.flags.push('.');
            self.pos += 1;
            self.parse_index()?;
            self.parse_num();
        }
        Some(())
    }
}
