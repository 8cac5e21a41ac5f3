//! Long-lived streaming sessions emitting NDJSON batches.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use bstr::BString;

use crate::{
    encoder::{write_result_meta, write_row_array},
    error::EngineError,
    options::BatchOptions,
    scanner::{RowScanner, ScanEvent, is_blank_row},
};

/// Sentinel prefix of the single metadata line that closes every batch.
pub const META_PREFIX: &str = "__META__ ";

/// A resumable parse session over one open source.
///
/// The session owns the source and the byte offset at which the next batch
/// resumes. Each [`next_batch`](Self::next_batch) call re-seeks to that
/// offset, so resumption stays byte-accurate even after a batch discarded a
/// partial final row and rewound past bytes it had already read.
///
/// A session is exclusively owned by the caller that opened it; it performs
/// no internal synchronization. The source is released when the session is
/// dropped, or earlier via [`close`](Self::close), after which further batch
/// calls return [`EngineError::ClosedSession`].
///
/// # Examples
///
/// ```rust,no_run
/// use csvchunk::{BatchOptions, Session};
///
/// let mut session = Session::open("data.csv", 0)?;
/// let options = BatchOptions {
///     row_limit: 200,
///     allow_partial_final_row: false,
/// };
/// let batch = session.next_batch(&options)?;
/// # Ok::<(), csvchunk::EngineError>(())
/// ```
#[derive(Debug)]
pub struct Session<S> {
    source: Option<S>,
    offset: u64,
}

impl Session<File> {
    /// Opens `path` and starts a session at `start_offset`.
    ///
    /// # Errors
    ///
    /// [`EngineError::Io`] if the file cannot be opened or the seek fails.
    pub fn open(path: impl AsRef<Path>, start_offset: u64) -> Result<Self, EngineError> {
        Self::new(File::open(path)?, start_offset)
    }
}

impl<S: Read + Seek> Session<S> {
    /// Starts a session over an already-open source at `start_offset`.
    ///
    /// # Errors
    ///
    /// [`EngineError::Io`] if the initial seek fails.
    pub fn new(mut source: S, start_offset: u64) -> Result<Self, EngineError> {
        source.seek(SeekFrom::Start(start_offset))?;
        Ok(Self {
            source: Some(source),
            offset: start_offset,
        })
    }

    /// The byte offset at which the next batch will resume.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Parses the next batch of rows and returns it as NDJSON text: one JSON
    /// array per row, then exactly one `__META__ {...}` line carrying
    /// `next_offset` and `has_more`.
    ///
    /// `has_more` is decided by a one-byte lookahead past the parsed region:
    /// if any byte remains it is `true`, even when that byte turns out to
    /// begin only a blank trailing line. A batch that discarded a partial
    /// final row always reports `true`.
    ///
    /// After an error the persisted offset is unchanged and the session
    /// should be closed.
    ///
    /// # Errors
    ///
    /// [`EngineError::ClosedSession`] after [`close`](Self::close),
    /// [`EngineError::Io`] on seek/read failure,
    /// [`EngineError::ResourceExhausted`] if a field buffer cannot grow.
    pub fn next_batch(&mut self, options: &BatchOptions) -> Result<BString, EngineError> {
        let source = self.source.as_mut().ok_or(EngineError::ClosedSession)?;
        let mut scanner = RowScanner::new(source, self.offset)?;

        let mut out: Vec<u8> = Vec::new();
        let mut emitted: u64 = 0;

        let (next_offset, has_more) = loop {
            match scanner.next_row()? {
                ScanEvent::Row(row) => {
                    if is_blank_row(&row) {
                        continue;
                    }
                    write_row_array(&mut out, &row, row.len());
                    out.push(b'\n');
                    emitted += 1;
                    if options.row_limit > 0 && emitted >= options.row_limit {
                        break (scanner.row_start(), scanner.more_bytes_remain()?);
                    }
                }
                ScanEvent::Partial(row) => {
                    if !options.allow_partial_final_row {
                        break (scanner.row_start(), true);
                    }
                    if !is_blank_row(&row) {
                        write_row_array(&mut out, &row, row.len());
                        out.push(b'\n');
                    }
                    break (scanner.position(), false);
                }
                ScanEvent::End => break (scanner.position(), false),
            }
        };

        out.extend_from_slice(META_PREFIX.as_bytes());
        out.push(b'{');
        write_result_meta(&mut out, next_offset, has_more);
        out.extend_from_slice(b"}\n");

        self.offset = next_offset;
        Ok(BString::from(out))
    }

    /// Releases the underlying source. Idempotent; later batch calls return
    /// [`EngineError::ClosedSession`].
    pub fn close(&mut self) {
        self.source = None;
    }
}
