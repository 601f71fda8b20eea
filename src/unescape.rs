use std::str::Chars;

use crate::error::ParseErrorKind;

/// Failure to decode an escape; `column` is the 1-based character position of
/// the backslash inside the decoded span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EscapeError {
    pub(crate) column: usize,
    pub(crate) kind: ParseErrorKind,
}

impl EscapeError {
    fn new(column: usize, kind: ParseErrorKind) -> Self {
        Self { column, kind }
    }
}

/// Resolve `.properties` escape sequences in `raw`.
///
/// `\t`, `\r`, `\n` and `\f` map to their control characters, `\uXXXX` to the
/// code point it names (surrogate pairs are joined), and a backslash before
/// any other character yields that character.
///
/// A `\uXXXX` naming half of a UTF-16 surrogate pair without its partner
/// fails with [`ParseErrorKind::UnpairedSurrogate`], since a Rust string
/// cannot hold it. Java accepts such files.
pub(crate) fn unescape(raw: &str) -> Result<String, EscapeError> {
    if !raw.contains('\\') {
        return Ok(raw.to_owned());
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    let mut column = 0usize;

    while let Some(ch) = chars.next() {
        column += 1;
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        let escape_column = column;
        // A dangling backslash has nothing to escape.
        let Some(next) = chars.next() else {
            break;
        };
        column += 1;

        let decoded = match next {
            't' => '\t',
            'r' => '\r',
            'n' => '\n',
            'f' => '\x0c',
            'u' => {
                let (decoded, consumed) = decode_unicode_escape(&mut chars)
                    .map_err(|kind| EscapeError::new(escape_column, kind))?;
                column += consumed;
                decoded
            }
            other => other,
        };
        out.push(decoded);
    }

    Ok(out)
}

/// Decode the hex digits following `\u`, joining a high surrogate with an
/// immediately following `\u` low surrogate. Returns the character and the
/// number of chars consumed after the leading `\u`.
fn decode_unicode_escape(chars: &mut Chars<'_>) -> Result<(char, usize), ParseErrorKind> {
    let unit = read_code_unit(chars).ok_or(ParseErrorKind::MalformedUnicodeEscape)?;

    match unit {
        0xD800..=0xDBFF => {
            let mut lookahead = chars.clone();
            if lookahead.next() != Some('\\') || lookahead.next() != Some('u') {
                return Err(ParseErrorKind::UnpairedSurrogate);
            }
            let low = read_code_unit(&mut lookahead).ok_or(ParseErrorKind::MalformedUnicodeEscape)?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(ParseErrorKind::UnpairedSurrogate);
            }
            *chars = lookahead;
            let code_point = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
            let decoded = char::from_u32(code_point).ok_or(ParseErrorKind::UnpairedSurrogate)?;
            Ok((decoded, 10))
        }
        0xDC00..=0xDFFF => Err(ParseErrorKind::UnpairedSurrogate),
        _ => {
            let decoded = char::from_u32(unit).ok_or(ParseErrorKind::MalformedUnicodeEscape)?;
            Ok((decoded, 4))
        }
    }
}

fn read_code_unit(chars: &mut Chars<'_>) -> Option<u32> {
    let mut unit = 0u32;
    for _ in 0..4 {
        let digit = chars.next()?.to_digit(16)?;
        unit = (unit << 4) | digit;
    }
    Some(unit)
}
