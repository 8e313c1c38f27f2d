use std::{
    fmt,
    io::{self, BufReader, Cursor, ErrorKind, Read},
};

use crate::ByteSource;

/// A stack of byte sources read as one contiguous stream.
///
/// The most recently inserted source is read first. A source is popped as
/// soon as it reports end of data, or earlier when it is known to be drained,
/// so end of data is only surfaced once every layer is exhausted.
///
/// Inserting in front of the current position is how surplus bytes read
/// ahead by a value parser are handed back: they become the next bytes of
/// the stream. In practice the stack stays at depth two at most, the
/// original reader plus one small surplus buffer.
pub struct LayeredSource<'a> {
    // top of the stack is the last entry
    layers: Vec<Box<dyn ByteSource + 'a>>,
}

impl<'a> LayeredSource<'a> {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Creates a source reading from `reader` through a [`BufReader`] of the
    /// given capacity.
    pub fn from_reader<R: Read + 'a>(capacity: usize, reader: R) -> Self {
        let mut source = Self::new();
        source.insert(BufReader::with_capacity(capacity, reader));
        source
    }

    /// Pushes `source` on top of the stack so it is drained before any layer
    /// already present. Sources known to be drained are dropped right away.
    pub fn insert<S: ByteSource + 'a>(&mut self, source: S) {
        if source.is_drained() {
            return;
        }
        self.layers.push(Box::new(source));
    }

    /// Pushes an in-memory buffer on top of the stack.
    pub fn insert_bytes(&mut self, bytes: Vec<u8>) {
        self.insert(Cursor::new(bytes));
    }

    /// Pushes a reader without native single-byte reads, wrapping it in a
    /// [`BufReader`].
    pub fn insert_reader<R: Read + 'a>(&mut self, reader: R) {
        self.insert(BufReader::new(reader));
    }

    /// Number of layers currently on the stack.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` once every layer has been popped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Default for LayeredSource<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LayeredSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayeredSource")
            .field("depth", &self.layers.len())
            .finish()
    }
}

impl Read for LayeredSource<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        while let Some(top) = self.layers.last_mut() {
            let read = match top.read(buf) {
                Ok(read) => read,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };
            // Pop one round before the layer would report end of data, which
            // keeps the stack shallow.
            if read == 0 || top.is_drained() {
                self.layers.pop();
            }
            if read > 0 {
                return Ok(read);
            }
        }
        Ok(0)
    }
}

impl ByteSource for LayeredSource<'_> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        while let Some(top) = self.layers.last_mut() {
            match top.read_byte() {
                Ok(Some(byte)) => {
                    if top.is_drained() {
                        self.layers.pop();
                    }
                    return Ok(Some(byte));
                }
                Ok(None) => {
                    self.layers.pop();
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
        Ok(None)
    }

    fn is_drained(&self) -> bool {
        self.layers.is_empty()
    }
}
