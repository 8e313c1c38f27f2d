//! Helpers for simulating fragmented streams.
//!
//! Network and pipe readers rarely hand over a whole document in one `read`
//! call. [`ChunkedReader`] replays a payload in caller-chosen pieces, one
//! piece per call, which is how the tests, benches and fuzz target exercise
//! decoding across arbitrary read boundaries.

use std::{
    collections::VecDeque,
    io::{self, Read},
};

/// Split `payload` into approximately equal-sized chunks.
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_chunks(payload: &[u8], parts: usize) -> Vec<&[u8]> {
    assert!(parts > 0);
    let chunk_size = payload.len().div_ceil(parts).max(1);
    payload.chunks(chunk_size).collect()
}

/// Split `payload` at the given offsets. Offsets are taken modulo the
/// remaining length, so any sequence of numbers yields a valid split.
#[must_use]
pub fn split_at_offsets<'a>(payload: &'a [u8], offsets: &[usize]) -> Vec<&'a [u8]> {
    let mut chunks = Vec::new();
    let mut rest = payload;
    for &offset in offsets {
        if rest.is_empty() {
            break;
        }
        let (chunk, tail) = rest.split_at(1 + offset % rest.len());
        chunks.push(chunk);
        rest = tail;
    }
    if !rest.is_empty() {
        chunks.push(rest);
    }
    chunks
}

/// A reader that returns at most one chunk per `read` call.
#[derive(Debug, Clone)]
pub struct ChunkedReader<'a> {
    chunks: VecDeque<&'a [u8]>,
}

impl<'a> ChunkedReader<'a> {
    /// Serves `chunks` in order, never merging two of them into one read.
    pub fn new(chunks: impl IntoIterator<Item = &'a [u8]>) -> Self {
        Self {
            chunks: chunks.into_iter().filter(|c| !c.is_empty()).collect(),
        }
    }

    /// Serves `payload` one byte per read, the worst case for a decoder.
    #[must_use]
    pub fn one_byte(payload: &'a [u8]) -> Self {
        Self::new(payload.chunks(1))
    }

    /// Bytes not yet handed out.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.chunks.iter().map(|c| c.len()).sum()
    }
}

impl Read for ChunkedReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Some(chunk) = self.chunks.front_mut() else {
            return Ok(0);
        };
        let len = chunk.len().min(buf.len());
        buf[..len].copy_from_slice(&chunk[..len]);
        *chunk = &chunk[len..];
        if chunk.is_empty() {
            self.chunks.pop_front();
        }
        Ok(len)
    }
}
