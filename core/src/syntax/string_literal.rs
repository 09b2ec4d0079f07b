/// String literal scanning and escaping.
///
/// This module converts between:
/// - Source string literals (e.g., `'it\'s'` with a backslash-quote sequence)
/// - Runtime strings (e.g., `it's`)
///
/// Supported escapes are `\n`, `\t`, `\r`, `\\` and the quote characters.
/// Any other escaped character stands for itself, and back-quoted strings
/// are plain literals: there is no interpolation.
use core::fmt;

/// Controls which quote style to use when escaping strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteStyle {
    /// Always use single quotes: `'...'`
    AlwaysSingle,
    /// Always use double quotes: `"..."`
    AlwaysDouble,
    /// Prefer double quotes, use single if string contains double quotes but not single
    #[default]
    PreferDouble,
}

/// Errors that can occur when scanning a string literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringScanError {
    /// The input does not start with a quote character.
    NotAString,
    /// End of input reached before the closing quote.
    Unterminated,
}

/// Returns true for the three characters that open a string literal.
pub fn is_quote(c: char) -> bool {
    matches!(c, '"' | '\'' | '`')
}

/// Scan a string literal at the start of `input`.
///
/// Returns the decoded value and the number of bytes consumed, closing
/// quote included.
///
/// # Example
///
/// ```
/// use warded_core::syntax::scan_string_literal;
///
/// let (value, len) = scan_string_literal(r#""a\tb" + 1"#).unwrap();
/// assert_eq!(value, "a\tb");
/// assert_eq!(len, 6);
/// ```
pub fn scan_string_literal(input: &str) -> Result<(String, usize), StringScanError> {
    let mut chars = input.char_indices();
    let quote = match chars.next() {
        Some((_, c)) if is_quote(c) => c,
        _ => return Err(StringScanError::NotAString),
    };

    let mut value = String::new();
    while let Some((pos, ch)) = chars.next() {
        if ch == quote {
            return Ok((value, pos + ch.len_utf8()));
        }
        if ch != '\\' {
            value.push(ch);
            continue;
        }
        match chars.next() {
            Some((_, 'n')) => value.push('\n'),
            Some((_, 't')) => value.push('\t'),
            Some((_, 'r')) => value.push('\r'),
            Some((_, other)) => value.push(other),
            None => return Err(StringScanError::Unterminated),
        }
    }
    Err(StringScanError::Unterminated)
}

/// Escape a runtime string as a source string literal.
///
/// # Example
///
/// ```
/// use warded_core::syntax::{QuoteStyle, escape_string};
///
/// let mut output = String::new();
/// escape_string(&mut output, "hello\nworld", QuoteStyle::PreferDouble).unwrap();
/// assert_eq!(output, r#""hello\nworld""#);
/// ```
pub fn escape_string(f: &mut impl fmt::Write, s: &str, style: QuoteStyle) -> fmt::Result {
    let quote_char = match style {
        QuoteStyle::AlwaysDouble => '"',
        QuoteStyle::AlwaysSingle => '\'',
        QuoteStyle::PreferDouble => {
            if s.contains('"') && !s.contains('\'') {
                '\''
            } else {
                '"'
            }
        }
    };

    f.write_char(quote_char)?;
    for ch in s.chars() {
        match ch {
            c if c == quote_char => write!(f, "\\{}", quote_char)?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c => f.write_char(c)?,
        }
    }
    f.write_char(quote_char)
}
