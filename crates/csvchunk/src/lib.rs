//! A resumable, streaming CSV-to-JSON chunk reader.
//!
//! `csvchunk` pages through arbitrarily large delimited input in
//! bounded-size chunks. A byte-level tokenizer handles RFC-4180-style
//! quoting (embedded delimiters and newlines, doubled-quote escapes,
//! CRLF/LF normalization) while an offset-tracking cursor records where each
//! row begins, so a caller can stop after any batch and resume later at an
//! exact byte offset — including re-parsing a final row that had not been
//! fully written yet when the previous call saw it.
//!
//! Two emission modes:
//!
//! - **Buffered chunk mode** ([`read_chunk`]): one call returns one JSON
//!   document. From offset 0 the first row becomes the header row and the
//!   document is `{"headers":[...],"rows":[...],"next_offset":N,"has_more":B}`;
//!   from any later offset the document carries `rows` only.
//! - **Streaming NDJSON mode** ([`Session`]): a long-lived session emits one
//!   JSON array per row per line, closing each batch with a single
//!   `__META__ {"next_offset":N,"has_more":B}` line.
//!
//! Fields are byte strings ([`bstr::BString`]); no type coercion is
//! performed and every field is emitted as a JSON string. Rows consisting
//! only of empty fields are suppressed in both modes.
//!
//! # Examples
//!
//! ```rust
//! use std::io::Cursor;
//!
//! use csvchunk::{ChunkOptions, read_chunk};
//!
//! let csv = Cursor::new(&b"name,age\nada,36\n"[..]);
//! let doc = read_chunk(csv, &ChunkOptions::default())?;
//! assert_eq!(
//!     doc,
//!     r#"{"headers":["name","age"],"rows":[["ada","36"]],"next_offset":16,"has_more":false}"#,
//! );
//! # Ok::<(), csvchunk::EngineError>(())
//! ```

mod chunk;
mod cursor;
mod encoder;
mod error;
mod headers;
mod options;
mod scanner;
mod session;

pub use chunk::{read_chunk, read_chunk_from_path};
pub use error::EngineError;
pub use options::{BatchOptions, ChunkOptions};
pub use session::{META_PREFIX, Session};
