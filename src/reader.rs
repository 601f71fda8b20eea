use std::io::{self, Read};

use crate::error::Error;
use crate::model::Encoding;

const RAW_BUFFER_SIZE: usize = 1024;

/// One property declaration with comments, blank lines and continuations
/// resolved, but escapes still in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LogicalLine {
    pub(crate) text: String,
    /// Physical line on which the declaration starts (1-based).
    pub(crate) line: u32,
}

/// Flags tracked while assembling a single logical line.
#[derive(Debug)]
struct LineState {
    skip_lf: bool,
    skip_whitespace: bool,
    appended_line_begin: bool,
    is_new_line: bool,
    is_comment_line: bool,
    preceding_backslash: bool,
    start_line: Option<u32>,
}

impl LineState {
    fn new() -> Self {
        Self {
            skip_lf: false,
            skip_whitespace: true,
            appended_line_begin: false,
            is_new_line: true,
            is_comment_line: false,
            preceding_backslash: false,
            start_line: None,
        }
    }

    fn reset_physical_line(&mut self) {
        self.is_comment_line = false;
        self.is_new_line = true;
        self.skip_whitespace = true;
        self.start_line = None;
    }

    fn begin_continuation(&mut self, terminator: u8) {
        self.skip_whitespace = true;
        self.appended_line_begin = true;
        self.preceding_backslash = false;
        if terminator == b'\r' {
            self.skip_lf = true;
        }
    }
}

/// Splits a byte stream into logical lines.
///
/// The reader pulls fixed-size chunks from `source` and keeps a growable
/// buffer for the line being assembled. Once the source is exhausted (or a
/// read fails) every further call returns `Ok(None)`.
pub(crate) struct LineReader<R> {
    source: R,
    encoding: Encoding,
    raw: Box<[u8]>,
    offset: usize,
    limit: usize,
    line: Vec<u8>,
    exhausted: bool,
    physical_line: u32,
    last_was_cr: bool,
}

impl<R: Read> LineReader<R> {
    pub(crate) fn new(source: R, encoding: Encoding) -> Self {
        Self::with_capacity(source, encoding, RAW_BUFFER_SIZE)
    }

    pub(crate) fn with_capacity(source: R, encoding: Encoding, capacity: usize) -> Self {
        Self {
            source,
            encoding,
            raw: vec![0u8; capacity.max(1)].into_boxed_slice(),
            offset: 0,
            limit: 0,
            line: Vec::with_capacity(RAW_BUFFER_SIZE),
            exhausted: false,
            physical_line: 1,
            last_was_cr: false,
        }
    }

    /// Read the next logical line, or `None` once the input is exhausted.
    pub(crate) fn read_line(&mut self) -> Result<Option<LogicalLine>, Error> {
        if self.exhausted {
            return Ok(None);
        }

        self.line.clear();
        let mut state = LineState::new();

        loop {
            if self.offset >= self.limit && !self.fill()? {
                self.exhausted = true;
                if self.line.is_empty() || state.is_comment_line {
                    return Ok(None);
                }
                if state.preceding_backslash {
                    self.line.pop();
                }
                return self.finish(&state).map(Some);
            }

            let byte = self.raw[self.offset];
            self.offset += 1;
            let byte_line = self.count_line(byte);

            if state.skip_lf {
                state.skip_lf = false;
                if byte == b'\n' {
                    continue;
                }
            }

            if state.skip_whitespace {
                if is_whitespace(byte) {
                    continue;
                }
                if !state.appended_line_begin && is_eol(byte) {
                    continue;
                }
                state.skip_whitespace = false;
                state.appended_line_begin = false;
            }

            if state.is_new_line {
                state.is_new_line = false;
                if byte == b'#' || byte == b'!' {
                    state.is_comment_line = true;
                    continue;
                }
            }

            if !is_eol(byte) {
                if state.is_comment_line {
                    continue;
                }
                if state.start_line.is_none() {
                    state.start_line = Some(byte_line);
                }
                self.line.push(byte);
                state.preceding_backslash = byte == b'\\' && !state.preceding_backslash;
                continue;
            }

            if state.is_comment_line || self.line.is_empty() {
                state.reset_physical_line();
                continue;
            }

            if state.preceding_backslash {
                self.line.pop();
                state.begin_continuation(byte);
                continue;
            }

            return self.finish(&state).map(Some);
        }
    }

    /// Refill the raw buffer. Returns `false` at end of input.
    fn fill(&mut self) -> Result<bool, Error> {
        self.offset = 0;
        self.limit = 0;
        loop {
            match self.source.read(&mut self.raw) {
                Ok(0) => return Ok(false),
                Ok(read) => {
                    self.limit = read;
                    return Ok(true);
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    self.exhausted = true;
                    return Err(Error::Io(err));
                }
            }
        }
    }

    /// Returns the physical line `byte` belongs to and advances the counter
    /// past line terminators. `\r\n` counts once.
    fn count_line(&mut self, byte: u8) -> u32 {
        let current = self.physical_line;
        match byte {
            b'\n' if self.last_was_cr => {}
            b'\n' | b'\r' => self.physical_line = self.physical_line.saturating_add(1),
            _ => {}
        }
        self.last_was_cr = byte == b'\r';
        current
    }

    fn finish(&self, state: &LineState) -> Result<LogicalLine, Error> {
        let line = state.start_line.unwrap_or(self.physical_line);
        let text = match self.encoding {
            Encoding::Latin1 => self.line.iter().copied().map(char::from).collect(),
            Encoding::Utf8 => std::str::from_utf8(&self.line)
                .map_err(|source| Error::InvalidEncoding { line, source })?
                .to_owned(),
        };
        Ok(LogicalLine { text, line })
    }
}

fn is_whitespace(byte: u8) -> bool {
    byte == b' ' || byte == b'\t' || byte == b'\x0c'
}

fn is_eol(byte: u8) -> bool {
    byte == b'\n' || byte == b'\r'
}
