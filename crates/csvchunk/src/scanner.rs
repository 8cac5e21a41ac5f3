//! The quoting state machine and row assembly.
//!
//! `RowScanner` drives a [`ByteCursor`] one byte at a time and yields whole
//! rows. Quoting follows permissive RFC-4180: a quote opens a quoted field
//! only at field start (a quote mid-field is literal content), a doubled
//! quote inside a quoted field is an escaped literal quote, and delimiter or
//! newline bytes inside quotes are ordinary content. `\r`, `\n`, and `\r\n`
//! each terminate a row; the CRLF pair collapses to a single boundary before
//! the row is resolved, so recorded row-start offsets always point past the
//! whole terminator.
//!
//! The scanner also maintains the resumption mark: the byte offset at which
//! the row currently being assembled began. The mark moves only when a row
//! boundary fully resolves, never mid-field, which is what lets a caller
//! rewind to it and re-parse an interrupted row later.

use std::io::{Read, Seek};
use std::mem;

use bstr::BString;

use crate::{cursor::ByteCursor, error::EngineError};

/// Quote-tracking state, per field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    Unquoted,
    Quoted,
    /// Saw a quote inside a quoted field; the next byte decides whether it
    /// was an escape (another quote) or the close of the field.
    QuotedMaybeClosing,
}

/// Outcome of one [`RowScanner::next_row`] call.
#[derive(Debug)]
pub(crate) enum ScanEvent {
    /// A row terminated by a newline. The terminator has been fully
    /// consumed and the row-start mark already points at the next row.
    Row(Vec<BString>),
    /// A row cut off by end of input: the last field was finished
    /// accumulating, but no terminator was seen. The row-start mark still
    /// points at the beginning of this row.
    Partial(Vec<BString>),
    /// End of input at a row boundary; nothing was pending.
    End,
}

/// In-progress field accumulator.
///
/// Growth goes through `try_reserve` so exhaustion surfaces as
/// [`EngineError::ResourceExhausted`] instead of aborting the process, and
/// the backing allocation is kept across fields.
#[derive(Debug, Default)]
struct FieldBuf {
    data: Vec<u8>,
}

const FIELD_BUF_SEED: usize = 256;

impl FieldBuf {
    fn push(&mut self, byte: u8) -> Result<(), EngineError> {
        if self.data.len() == self.data.capacity() {
            let additional = if self.data.capacity() == 0 {
                FIELD_BUF_SEED
            } else {
                self.data.capacity()
            };
            self.data
                .try_reserve(additional)
                .map_err(|_| EngineError::ResourceExhausted)?;
        }
        self.data.push(byte);
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Duplicates the accumulated bytes as an owned field and resets the
    /// accumulator without releasing its capacity.
    fn take_owned(&mut self) -> Result<BString, EngineError> {
        let mut copy = Vec::new();
        copy.try_reserve_exact(self.data.len())
            .map_err(|_| EngineError::ResourceExhausted)?;
        copy.extend_from_slice(&self.data);
        self.data.clear();
        Ok(BString::from(copy))
    }
}

#[derive(Debug)]
pub(crate) struct RowScanner<S> {
    cursor: ByteCursor<S>,
    field: FieldBuf,
    row: Vec<BString>,
    row_start: u64,
}

impl<S: Read + Seek> RowScanner<S> {
    /// Creates a scanner positioned at `start_offset`. The seek is performed
    /// eagerly so a failure surfaces before any parsing happens.
    pub(crate) fn new(source: S, start_offset: u64) -> Result<Self, EngineError> {
        let mut cursor = ByteCursor::new(source);
        cursor.seek_to(start_offset)?;
        Ok(Self {
            cursor,
            field: FieldBuf::default(),
            row: Vec::new(),
            row_start: start_offset,
        })
    }

    /// Offset at which the row currently being assembled began, or, right
    /// after a [`ScanEvent::Row`], the offset of the row about to start.
    pub(crate) fn row_start(&self) -> u64 {
        self.row_start
    }

    /// Current read position (the offset of the next unconsumed byte).
    pub(crate) fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// One-byte lookahead: whether any byte remains past the parsed region.
    pub(crate) fn more_bytes_remain(&mut self) -> Result<bool, EngineError> {
        Ok(self.cursor.peek()?.is_some())
    }

    /// Scans until the next row boundary or end of input.
    pub(crate) fn next_row(&mut self) -> Result<ScanEvent, EngineError> {
        let mut state = QuoteState::Unquoted;
        loop {
            let Some(byte) = self.cursor.next()? else {
                // Mid-row means bytes were consumed since the mark, not that
                // the accumulator is non-empty: a trailing `"` or `""` has
                // eaten input without contributing field content yet.
                if self.cursor.position() == self.row_start {
                    return Ok(ScanEvent::End);
                }
                self.finish_field()?;
                return Ok(ScanEvent::Partial(mem::take(&mut self.row)));
            };
            match state {
                QuoteState::Unquoted => match byte {
                    b'"' if self.field.is_empty() => state = QuoteState::Quoted,
                    b',' => self.finish_field()?,
                    b'\r' | b'\n' => {
                        if byte == b'\r' && self.cursor.peek()? == Some(b'\n') {
                            self.cursor.next()?;
                        }
                        self.finish_field()?;
                        self.row_start = self.cursor.position();
                        return Ok(ScanEvent::Row(mem::take(&mut self.row)));
                    }
                    other => self.field.push(other)?,
                },
                QuoteState::Quoted => match byte {
                    b'"' => state = QuoteState::QuotedMaybeClosing,
                    other => self.field.push(other)?,
                },
                QuoteState::QuotedMaybeClosing => {
                    if byte == b'"' {
                        self.field.push(b'"')?;
                        state = QuoteState::Quoted;
                    } else {
                        state = QuoteState::Unquoted;
                        self.cursor.unread();
                    }
                }
            }
        }
    }

    fn finish_field(&mut self) -> Result<(), EngineError> {
        let field = self.field.take_owned()?;
        self.row.push(field);
        Ok(())
    }
}

/// Whether a row should be suppressed: no fields, or only empty fields.
pub(crate) fn is_blank_row(row: &[BString]) -> bool {
    row.iter().all(|field| field.is_empty())
}
