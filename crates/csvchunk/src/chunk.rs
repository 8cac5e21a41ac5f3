//! Buffered chunk mode: one call, one self-contained JSON document.
//!
//! A from-scratch read (`start_offset == 0`) captures the first non-blank
//! row as headers and emits `{"headers":[...],"rows":[...],...}`; a resumed
//! read seeks to the offset, skips header capture, and emits a `rows`-only
//! document. Both shapes end with the `next_offset`/`has_more` pair that a
//! caller chases to page through the source.
//!
//! Serialized row width differs between the two: from-scratch rows are
//! padded or truncated to the header count, while a resumed call takes its
//! width from the first row it parses. Rows across pagination boundaries can
//! therefore come out ragged when the underlying data is ragged; that
//! asymmetry is part of the contract, not something this module smooths
//! over.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use bstr::BString;

use crate::{
    encoder::{write_escaped, write_result_meta, write_row_array},
    error::EngineError,
    headers::resolve_names,
    options::ChunkOptions,
    scanner::{RowScanner, ScanEvent, is_blank_row},
};

const EMPTY_SOURCE_DOC: &[u8] = b"{\"headers\":[],\"rows\":[],\"next_offset\":0,\"has_more\":false}";

/// Reads one bounded chunk of CSV from `source` and returns it as a JSON
/// document.
///
/// See [`ChunkOptions`] for the offset, row-limit, and partial-final-row
/// controls. The returned buffer is always a complete, well-formed document;
/// on error nothing is returned.
///
/// # Errors
///
/// [`EngineError::Io`] if the seek or a read fails,
/// [`EngineError::ResourceExhausted`] if a field buffer cannot grow.
pub fn read_chunk<S: Read + Seek>(
    source: S,
    options: &ChunkOptions,
) -> Result<BString, EngineError> {
    let resumed = options.start_offset > 0;
    let mut scanner = RowScanner::new(source, options.start_offset)?;

    let mut out: Vec<u8> = Vec::new();
    let mut opened = false;
    let mut width: Option<usize> = None;
    let mut emitted: u64 = 0;
    let mut first_data_row = true;

    if resumed {
        out.extend_from_slice(b"{\"rows\":[");
        opened = true;
    }

    let (next_offset, has_more) = loop {
        match scanner.next_row()? {
            ScanEvent::Row(row) => {
                if is_blank_row(&row) {
                    continue;
                }
                if !resumed && width.is_none() {
                    open_with_headers(&mut out, &row);
                    width = Some(row.len());
                    opened = true;
                    continue;
                }
                emit_row(&mut out, &row, &mut width, &mut first_data_row);
                emitted += 1;
                if options.row_limit > 0 && emitted >= options.row_limit {
                    break (scanner.row_start(), scanner.more_bytes_remain()?);
                }
            }
            ScanEvent::Partial(row) => {
                if !options.allow_partial_final_row {
                    // Discard the interrupted row and hand the caller its
                    // start offset so a later call re-parses it whole.
                    break (scanner.row_start(), true);
                }
                if !is_blank_row(&row) {
                    if !resumed && width.is_none() {
                        open_with_headers(&mut out, &row);
                        width = Some(row.len());
                        opened = true;
                    } else {
                        emit_row(&mut out, &row, &mut width, &mut first_data_row);
                    }
                }
                break (scanner.position(), false);
            }
            ScanEvent::End => break (scanner.position(), false),
        }
    };

    if opened {
        out.extend_from_slice(b"],");
        write_result_meta(&mut out, next_offset, has_more);
        out.push(b'}');
    } else if has_more {
        // From-scratch call that discarded its only (partial) row: no
        // headers to report yet, but the offset pair must still let the
        // caller resume.
        out.extend_from_slice(b"{\"headers\":[],\"rows\":[],");
        write_result_meta(&mut out, next_offset, true);
        out.push(b'}');
    } else {
        out.extend_from_slice(EMPTY_SOURCE_DOC);
    }
    Ok(BString::from(out))
}

/// Convenience wrapper over [`read_chunk`] that opens `path` for the
/// duration of the call.
///
/// # Errors
///
/// [`EngineError::Io`] if the file cannot be opened, plus everything
/// [`read_chunk`] reports.
pub fn read_chunk_from_path(
    path: impl AsRef<Path>,
    options: &ChunkOptions,
) -> Result<BString, EngineError> {
    let file = File::open(path)?;
    read_chunk(file, options)
}

fn open_with_headers(out: &mut Vec<u8>, row: &[BString]) {
    out.extend_from_slice(b"{\"headers\":[");
    for (index, name) in resolve_names(row).iter().enumerate() {
        if index > 0 {
            out.push(b',');
        }
        write_escaped(out, name);
    }
    out.extend_from_slice(b"],\"rows\":[");
}

fn emit_row(
    out: &mut Vec<u8>,
    row: &[BString],
    width: &mut Option<usize>,
    first_data_row: &mut bool,
) {
    // Resumed calls have no header context: the first row of the call fixes
    // the serialized width for the rest of it.
    let width = *width.get_or_insert(row.len());
    if !*first_data_row {
        out.push(b',');
    }
    *first_data_row = false;
    write_row_array(out, row, width);
}
