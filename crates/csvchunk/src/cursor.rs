//! Byte-at-a-time adapter over a seekable source.
//!
//! The scanner consumes input one byte at a time with two small affordances
//! the quoting state machine needs: a one-byte peek (for CRLF collapsing and
//! end-of-batch lookahead) and a one-byte pushback (re-examining the byte
//! that follows a closing quote). `ByteCursor` provides both on top of an
//! internal block buffer, and tracks the logical stream position so row
//! offsets stay byte-accurate regardless of read-ahead.

use std::io::{self, Read, Seek, SeekFrom};

const BLOCK: usize = 8 * 1024;

#[derive(Debug)]
pub(crate) struct ByteCursor<S> {
    source: S,
    buf: Vec<u8>,
    /// Index of the next unread byte in `buf`.
    head: usize,
    /// Stream offset of `buf[0]`.
    base: u64,
}

impl<S: Read + Seek> ByteCursor<S> {
    pub(crate) fn new(source: S) -> Self {
        Self {
            source,
            buf: Vec::with_capacity(BLOCK),
            head: 0,
            base: 0,
        }
    }

    /// Repositions the cursor at an absolute byte offset, discarding any
    /// buffered read-ahead.
    pub(crate) fn seek_to(&mut self, offset: u64) -> io::Result<()> {
        self.source.seek(SeekFrom::Start(offset))?;
        self.buf.clear();
        self.head = 0;
        self.base = offset;
        Ok(())
    }

    /// The offset of the next byte [`next`](Self::next) would return.
    pub(crate) fn position(&self) -> u64 {
        self.base + self.head as u64
    }

    /// Consumes and returns the next byte, or `None` at end of input.
    pub(crate) fn next(&mut self) -> io::Result<Option<u8>> {
        if self.head == self.buf.len() && !self.refill()? {
            return Ok(None);
        }
        let byte = self.buf[self.head];
        self.head += 1;
        Ok(Some(byte))
    }

    /// Returns the next byte without consuming it.
    pub(crate) fn peek(&mut self) -> io::Result<Option<u8>> {
        if self.head == self.buf.len() && !self.refill()? {
            return Ok(None);
        }
        Ok(Some(self.buf[self.head]))
    }

    /// Puts the most recently consumed byte back.
    ///
    /// Valid only directly after a successful [`next`](Self::next) with no
    /// intervening call; the byte is still resident in the block buffer.
    pub(crate) fn unread(&mut self) {
        debug_assert!(self.head > 0, "unread without a preceding next");
        self.head -= 1;
    }

    fn refill(&mut self) -> io::Result<bool> {
        self.base += self.buf.len() as u64;
        self.head = 0;
        self.buf.resize(BLOCK, 0);
        loop {
            match self.source.read(&mut self.buf) {
                Ok(n) => {
                    self.buf.truncate(n);
                    return Ok(n > 0);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.buf.clear();
                    return Err(e);
                }
            }
        }
    }
}
