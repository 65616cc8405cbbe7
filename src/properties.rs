//! Reader and writer for the `.properties` key/value text format.
//!
//! Files are UTF-8. Each logical line holds one `key=value` entry, where the
//! first unescaped `=` or `:` separates key from value. Lines starting with
//! `#` or `!` are comments, and a line ending in an odd number of backslashes
//! continues on the next line.
//!
//! Writing always emits keys in ascending order with one entry per line, so
//! the same table always produces the same bytes.

use std::collections::BTreeMap;
use std::str::Chars;
use thiserror::Error;

/// Errors raised while decoding a properties file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid UTF-8 at byte {offset}")]
    InvalidEncoding { offset: usize },
}

/// One language's complete key→value mapping, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringTable {
    entries: BTreeMap<String, String>,
}

impl StringTable {
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Set `key` to `value`, returning the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StringTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = StringTable::new();
        for (key, value) in iter {
            table.insert(key, value);
        }
        table
    }
}

// ==================== Parsing ====================

/// Decode a properties file.
///
/// Only invalid UTF-8 is an error. Lines without a separator or with an empty
/// key are skipped, and a key seen twice keeps its last value.
pub fn parse(bytes: &[u8]) -> Result<StringTable, ParseError> {
    let text = std::str::from_utf8(bytes).map_err(|e| ParseError::InvalidEncoding {
        offset: e.valid_up_to(),
    })?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    Ok(logical_lines(text)
        .iter()
        .filter_map(|line| parse_entry(line))
        .collect())
}

/// Join continuation lines and drop comments.
fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending: Option<String> = None;

    for raw in text.lines() {
        let piece = match pending {
            Some(_) => raw.trim_start(),
            None => {
                let trimmed = raw.trim_start();
                if trimmed.starts_with('#') || trimmed.starts_with('!') {
                    continue;
                }
                raw
            }
        };

        let mut buf = pending.take().unwrap_or_default();
        if continues(piece) {
            buf.push_str(&piece[..piece.len() - 1]);
            pending = Some(buf);
        } else {
            buf.push_str(piece);
            lines.push(buf);
        }
    }

    if let Some(buf) = pending {
        lines.push(buf);
    }
    lines
}

fn continues(line: &str) -> bool {
    line.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}

fn parse_entry(line: &str) -> Option<(String, String)> {
    let mut chars = line.trim_start().chars();
    let mut key = String::new();
    // Byte length of the key up to its last non-whitespace or escaped char.
    let mut significant = 0;
    let mut separated = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(unescaped) = unescape_next(&mut chars) {
                    key.push(unescaped);
                }
                significant = key.len();
            }
            '=' | ':' => {
                separated = true;
                break;
            }
            c => {
                key.push(c);
                if !c.is_whitespace() {
                    significant = key.len();
                }
            }
        }
    }

    key.truncate(significant);
    if !separated || key.is_empty() {
        return None;
    }

    Some((key, unescape(chars.as_str().trim_start())))
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(unescaped) = unescape_next(&mut chars) {
                out.push(unescaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Decode the escape sequence following a backslash.
fn unescape_next(chars: &mut Chars<'_>) -> Option<char> {
    let c = match chars.next()? {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        'f' => '\u{c}',
        'u' => decode_unicode(chars),
        other => other,
    };
    Some(c)
}

/// Decode `XXXX` after `\u`, joining UTF-16 surrogate pairs.
/// A malformed sequence yields a literal `u`.
fn decode_unicode(chars: &mut Chars<'_>) -> char {
    let Some(unit) = read_hex4(chars) else {
        return 'u';
    };

    if (0xD800..0xDC00).contains(&unit) {
        if let Some(rest) = chars.as_str().strip_prefix("\\u") {
            let mut lookahead = rest.chars();
            if let Some(low) = read_hex4(&mut lookahead) {
                if (0xDC00..0xE000).contains(&low) {
                    *chars = lookahead;
                    let code = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                    return char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER);
                }
            }
        }
    }

    char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER)
}

fn read_hex4(chars: &mut Chars<'_>) -> Option<u32> {
    let text = chars.as_str();
    let digits = text.get(..4)?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let unit = u32::from_str_radix(digits, 16).ok()?;
    *chars = text[4..].chars();
    Some(unit)
}

// ==================== Serialization ====================

/// Encode a table as properties text, one `key=value` line per entry in
/// ascending key order.
///
/// Non-ASCII text is written as literal UTF-8.
pub fn serialize(table: &StringTable) -> Vec<u8> {
    let mut out = String::new();
    for (key, value) in table.iter() {
        escape_key(key, &mut out);
        out.push('=');
        escape_value(value, &mut out);
        out.push('\n');
    }
    out.into_bytes()
}

fn escape_key(key: &str, out: &mut String) {
    for c in key.chars() {
        match c {
            '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            '\u{feff}' => push_unicode_escape(c, out),
            c if c.is_whitespace() => escape_whitespace(c, out),
            c => escape_char(c, out),
        }
    }
}

fn escape_value(value: &str, out: &mut String) {
    // Leading whitespace would be dropped on read unless escaped.
    let mut leading = true;
    for c in value.chars() {
        if leading && c.is_whitespace() {
            escape_whitespace(c, out);
        } else {
            leading = false;
            escape_char(c, out);
        }
    }
}

fn escape_whitespace(c: char, out: &mut String) {
    match c {
        ' ' => out.push_str("\\ "),
        '\n' | '\r' | '\t' | '\u{c}' => escape_char(c, out),
        c => push_unicode_escape(c, out),
    }
}

fn escape_char(c: char, out: &mut String) {
    match c {
        '\\' => out.push_str("\\\\"),
        '=' => out.push_str("\\="),
        ':' => out.push_str("\\:"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        '\u{c}' => out.push_str("\\f"),
        c if c.is_control() => push_unicode_escape(c, out),
        c => out.push(c),
    }
}

fn push_unicode_escape(c: char, out: &mut String) {
    let mut units = [0u16; 2];
    for unit in c.encode_utf16(&mut units) {
        out.push_str(&format!("\\u{:04X}", unit));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn table(entries: &[(&str, &str)]) -> StringTable {
        entries.iter().map(|(k, v)| (*k, *v)).collect()
    }

    // ==================== Parse Tests ====================

    #[test]
    fn test_parse_simple_entries() {
        let parsed = parse(b"greeting=Hello\nfarewell=Goodbye\n").unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.get("greeting"), Some("Hello"));
        assert_eq!(parsed.get("farewell"), Some("Goodbye"));
    }

    #[test]
    fn test_parse_trims_whitespace_around_key() {
        let parsed = parse(b"  greeting   =   Hello there  \n").unwrap();
        assert_eq!(parsed.get("greeting"), Some("Hello there  "));
    }

    #[test]
    fn test_parse_splits_on_first_separator() {
        let parsed = parse(b"url=https://example.com/?a=b\n").unwrap();
        assert_eq!(parsed.get("url"), Some("https://example.com/?a=b"));
    }

    #[test]
    fn test_parse_accepts_colon_separator() {
        let parsed = parse(b"title: Welcome\n").unwrap();
        assert_eq!(parsed.get("title"), Some("Welcome"));
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let input = b"# comment\n! also a comment\n\n   \nkey=value\n";
        let parsed = parse(input).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.get("key"), Some("value"));
    }

    #[test]
    fn test_parse_ignores_lines_without_separator() {
        let parsed = parse(b"just some text\nkey=value\n=orphan\n").unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.get("key"), Some("value"));
    }

    #[test]
    fn test_parse_whitespace_is_not_a_separator() {
        let parsed = parse(b"key value\ntwo words = both\n").unwrap();
        assert_eq!(parsed.len(), 1);
        assert!(!parsed.contains_key("key"));
        assert_eq!(parsed.get("two words"), Some("both"));
    }

    #[test]
    fn test_parse_last_duplicate_wins() {
        let parsed = parse(b"key=first\nkey=second\n").unwrap();
        assert_eq!(parsed.get("key"), Some("second"));
    }

    #[test]
    fn test_parse_utf8_values() {
        let parsed = parse("greeting=Привет, мир 👋\n".as_bytes()).unwrap();
        assert_eq!(parsed.get("greeting"), Some("Привет, мир 👋"));
    }

    #[test]
    fn test_parse_escape_sequences() {
        let parsed = parse(b"multi=line one\\nline two\\tTabbed\nsep=a\\=b\\:c\n").unwrap();
        assert_eq!(parsed.get("multi"), Some("line one\nline two\tTabbed"));
        assert_eq!(parsed.get("sep"), Some("a=b:c"));
    }

    #[test]
    fn test_parse_unicode_escapes() {
        let parsed = parse(b"e=caf\\u00e9\nemoji=\\uD83D\\uDC4B\nbad=\\u12zz\n").unwrap();
        assert_eq!(parsed.get("e"), Some("café"));
        assert_eq!(parsed.get("emoji"), Some("👋"));
        assert_eq!(parsed.get("bad"), Some("u12zz"));
    }

    #[test]
    fn test_parse_escaped_key_characters() {
        let parsed = parse(b"my\\ key\\=x=value\n").unwrap();
        assert_eq!(parsed.get("my key=x"), Some("value"));
    }

    #[test]
    fn test_parse_continuation_lines() {
        let parsed = parse(b"long=first \\\n    second\nnext=ok\n").unwrap();
        assert_eq!(parsed.get("long"), Some("first second"));
        assert_eq!(parsed.get("next"), Some("ok"));
    }

    #[test]
    fn test_parse_even_backslashes_do_not_continue() {
        let parsed = parse(b"path=C\\:\\\\\nnext=ok\n").unwrap();
        assert_eq!(parsed.get("path"), Some("C:\\"));
        assert_eq!(parsed.get("next"), Some("ok"));
    }

    #[test]
    fn test_parse_crlf_line_endings() {
        let parsed = parse(b"a=1\r\nb=2\r\n").unwrap();
        assert_eq!(parsed.get("a"), Some("1"));
        assert_eq!(parsed.get("b"), Some("2"));
    }

    #[test]
    fn test_parse_strips_byte_order_mark() {
        let parsed = parse("\u{feff}key=value\n".as_bytes()).unwrap();
        assert_eq!(parsed.get("key"), Some("value"));
    }

    #[test]
    fn test_parse_invalid_utf8_fails() {
        let result = parse(b"key=ok\nbroken=\xff\xfe\n");
        assert_eq!(result, Err(ParseError::InvalidEncoding { offset: 14 }));
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse(b"").unwrap().is_empty());
    }

    // ==================== Serialize Tests ====================

    #[test]
    fn test_serialize_sorts_keys() {
        let mut t = StringTable::new();
        t.insert("zebra", "Z");
        t.insert("apple", "A");
        t.insert("mango", "M");

        let out = String::from_utf8(serialize(&t)).unwrap();
        assert_eq!(out, "apple=A\nmango=M\nzebra=Z\n");
    }

    #[test]
    fn test_serialize_escapes_separators_and_newlines() {
        let t = table(&[("k", "a=b:c\nd\\e")]);
        let out = String::from_utf8(serialize(&t)).unwrap();
        assert_eq!(out, "k=a\\=b\\:c\\nd\\\\e\n");
    }

    #[test]
    fn test_serialize_escapes_key_whitespace_and_comment_markers() {
        let t = table(&[("#my key!", "v")]);
        let out = String::from_utf8(serialize(&t)).unwrap();
        assert_eq!(out, "\\#my\\ key\\!=v\n");
    }

    #[test]
    fn test_serialize_keeps_non_ascii_literal() {
        let t = table(&[("greeting", "こんにちは")]);
        let out = String::from_utf8(serialize(&t)).unwrap();
        assert_eq!(out, "greeting=こんにちは\n");
    }

    #[test]
    fn test_serialize_escapes_leading_value_whitespace() {
        let t = table(&[("k", "  padded")]);
        let out = String::from_utf8(serialize(&t)).unwrap();
        assert_eq!(out, "k=\\ \\ padded\n");
        assert_eq!(parse(out.as_bytes()).unwrap().get("k"), Some("  padded"));
    }

    #[test]
    fn test_serialize_empty_table() {
        assert!(serialize(&StringTable::new()).is_empty());
    }

    #[test]
    fn test_serialize_is_independent_of_insertion_order() {
        let a = table(&[("b", "2"), ("a", "1"), ("c", "3")]);
        let b = table(&[("c", "3"), ("a", "1"), ("b", "2")]);
        assert_eq!(serialize(&a), serialize(&b));
    }

    // ==================== StringTable Tests ====================

    #[test]
    fn test_table_insert_replaces_and_returns_previous() {
        let mut t = StringTable::new();
        assert_eq!(t.insert("k", "one"), None);
        assert_eq!(t.insert("k", "two"), Some("one".to_string()));
        assert_eq!(t.get("k"), Some("two"));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn test_table_remove_missing_key_is_none() {
        let mut t = table(&[("k", "v")]);
        assert_eq!(t.remove("missing"), None);
        assert_eq!(t.remove("k"), Some("v".to_string()));
        assert!(t.is_empty());
    }

    // ==================== Property Tests ====================

    fn arb_table() -> impl Strategy<Value = StringTable> {
        prop::collection::btree_map(
            any::<String>().prop_filter("keys are non-empty", |k| !k.is_empty()),
            any::<String>(),
            0..12,
        )
        .prop_map(|entries| entries.into_iter().collect::<StringTable>())
    }

    proptest! {
        #[test]
        fn prop_parse_inverts_serialize(t in arb_table()) {
            let bytes = serialize(&t);
            prop_assert_eq!(parse(&bytes).unwrap(), t);
        }

        #[test]
        fn prop_serialize_is_deterministic(t in arb_table()) {
            prop_assert_eq!(serialize(&t), serialize(&t.clone()));
        }

        #[test]
        fn prop_parse_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
            let _ = parse(&bytes);
        }
    }
}
