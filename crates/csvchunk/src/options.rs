/// Configuration for a single buffered chunk read.
///
/// # Examples
///
/// ```rust
/// use csvchunk::ChunkOptions;
///
/// let options = ChunkOptions {
///     row_limit: 200,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ChunkOptions {
    /// Byte offset at which parsing starts.
    ///
    /// `0` means "from scratch": the first non-blank row is captured as the
    /// header row and the result document carries a `headers` array. Any
    /// other value seeks directly there, skips header capture, and emits a
    /// `rows`-only document whose serialized width is taken from the first
    /// row parsed in this call.
    ///
    /// # Default
    ///
    /// `0`
    pub start_offset: u64,

    /// Maximum number of data rows emitted by this call.
    ///
    /// The row that reaches the limit is still fully parsed and emitted
    /// before the call stops. `0` means unbounded.
    ///
    /// # Default
    ///
    /// `0`
    pub row_limit: u64,

    /// How to treat a final row cut off by the end of available bytes.
    ///
    /// When `true`, a trailing row with no terminating newline is finalized
    /// and emitted like any other row. When `false`, that row is discarded
    /// and the result reports `has_more = true` with `next_offset` pointing
    /// at the start of the discarded row, so a later call re-parses it once
    /// the source has (possibly) grown past it.
    ///
    /// # Default
    ///
    /// `true`
    pub allow_partial_final_row: bool,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            start_offset: 0,
            row_limit: 0,
            allow_partial_final_row: true,
        }
    }
}

/// Configuration for one NDJSON batch produced by a [`Session`].
///
/// [`Session`]: crate::Session
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    /// Maximum number of rows emitted by this batch. `0` means unbounded.
    ///
    /// # Default
    ///
    /// `0`
    pub row_limit: u64,

    /// How to treat a final row cut off by the end of available bytes.
    ///
    /// Same policy as [`ChunkOptions::allow_partial_final_row`]. Set this to
    /// `false` when polling a file that is still being appended to, so the
    /// batch never emits a row that might be truncated.
    ///
    /// # Default
    ///
    /// `true`
    pub allow_partial_final_row: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            row_limit: 0,
            allow_partial_final_row: true,
        }
    }
}
