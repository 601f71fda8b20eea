use crate::error::ParseError;
use crate::unescape::{EscapeError, unescape};

/// Undecoded key and value halves of one logical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawRecord<'a> {
    pub(crate) key: &'a str,
    pub(crate) value: &'a str,
    /// Byte offset of `value` within the logical line.
    pub(crate) value_offset: usize,
}

/// Split a logical line at the first unescaped `=`, `:` or whitespace.
///
/// Whitespace after the key may be followed by one `=` or `:`, which still
/// counts as the separator. Leading whitespace of the value is dropped.
pub(crate) fn split_record(line: &str) -> RawRecord<'_> {
    let mut key_end = line.len();
    let mut value_start = line.len();
    let mut has_separator = false;
    let mut preceding_backslash = false;

    for (idx, ch) in line.char_indices() {
        if !preceding_backslash {
            if is_separator(ch) {
                key_end = idx;
                value_start = idx + ch.len_utf8();
                has_separator = true;
                break;
            }
            if is_whitespace(ch) {
                key_end = idx;
                value_start = idx + ch.len_utf8();
                break;
            }
        }
        preceding_backslash = ch == '\\' && !preceding_backslash;
    }

    let rest = &line[value_start..];
    let mut skipped = rest.len();
    for (idx, ch) in rest.char_indices() {
        if is_whitespace(ch) {
            continue;
        }
        if !has_separator && is_separator(ch) {
            has_separator = true;
            continue;
        }
        skipped = idx;
        break;
    }

    RawRecord {
        key: &line[..key_end],
        value: &rest[skipped..],
        value_offset: value_start + skipped,
    }
}

/// Split and decode one logical line into its key and value.
///
/// `line_number` is only used to position errors.
pub(crate) fn parse_record(line: &str, line_number: u32) -> Result<(String, String), ParseError> {
    let raw = split_record(line);
    let key = unescape(raw.key).map_err(|err| to_parse_error(err, line_number, 0))?;
    let value_column = line[..raw.value_offset].chars().count();
    let value =
        unescape(raw.value).map_err(|err| to_parse_error(err, line_number, value_column))?;
    Ok((key, value))
}

fn to_parse_error(err: EscapeError, line_number: u32, base_column: usize) -> ParseError {
    let column = u32::try_from(base_column + err.column).unwrap_or(u32::MAX);
    ParseError::new(line_number, column, err.kind)
}

fn is_separator(ch: char) -> bool {
    ch == '=' || ch == ':'
}

fn is_whitespace(ch: char) -> bool {
    ch == ' ' || ch == '\t' || ch == '\x0c'
}
