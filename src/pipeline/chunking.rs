//! Fixed-width chunking.
//!
//! Text is cut every `chunk_size` characters with no regard for word or sentence boundaries.
//! Chunks borrow from the source, and concatenating them in position order reproduces it
//! exactly. A boundary-aware splitter would only need to replace [`split_text`].

use super::types::{Chunk, DigestError};
use std::iter;

/// Partition `text` into consecutive chunks of `chunk_size` characters; the last chunk holds
/// the remainder.
///
/// Empty text yields no chunks. A zero `chunk_size` is rejected.
pub fn split_text(text: &str, chunk_size: usize) -> Result<Vec<Chunk<'_>>, DigestError> {
    if chunk_size == 0 {
        return Err(DigestError::InvalidArgument(
            "chunk size must be greater than zero".into(),
        ));
    }

    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(offset, _)| offset)
        .step_by(chunk_size)
        .chain(iter::once(text.len()))
        .collect();

    Ok(boundaries
        .windows(2)
        .enumerate()
        .map(|(position, window)| Chunk {
            position,
            content: &text[window[0]..window[1]],
        })
        .collect())
}
