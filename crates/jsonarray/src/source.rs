use std::io::{self, BufRead, BufReader, Cursor, Read};

/// A byte stream that supports both bulk and single-byte reads.
///
/// This is the capability every layer of a [`LayeredSource`] must offer:
/// bulk reads feed the value parser, single-byte reads drive the scan for
/// structural tokens between elements.
///
/// [`LayeredSource`]: crate::LayeredSource
pub trait ByteSource: Read {
    /// Reads the next byte, or `None` at end of data.
    ///
    /// # Errors
    ///
    /// Returns any error reported by the underlying reader.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// Returns `true` if the source is known to hold no more bytes.
    ///
    /// `false` only means "unknown": sources backed by real I/O cannot tell
    /// without reading, and report end of data the usual way instead.
    fn is_drained(&self) -> bool {
        false
    }
}

impl<R: Read> ByteSource for BufReader<R> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let Some(&byte) = self.fill_buf()?.first() else {
            return Ok(None);
        };
        self.consume(1);
        Ok(Some(byte))
    }
}

impl<T: AsRef<[u8]>> ByteSource for Cursor<T> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let position = cursor_position(self);
        let Some(&byte) = self.get_ref().as_ref().get(position) else {
            return Ok(None);
        };
        self.set_position(self.position() + 1);
        Ok(Some(byte))
    }

    fn is_drained(&self) -> bool {
        cursor_position(self) >= self.get_ref().as_ref().len()
    }
}

impl ByteSource for &[u8] {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let Some((&byte, rest)) = self.split_first() else {
            return Ok(None);
        };
        *self = rest;
        Ok(Some(byte))
    }

    fn is_drained(&self) -> bool {
        self.is_empty()
    }
}

fn cursor_position<T>(cursor: &Cursor<T>) -> usize {
    usize::try_from(cursor.position()).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_reports_drained_after_last_byte() {
        let mut cursor = Cursor::new(b"ab".to_vec());
        assert!(!cursor.is_drained());
        assert_eq!(cursor.read_byte().unwrap(), Some(b'a'));
        assert_eq!(cursor.read_byte().unwrap(), Some(b'b'));
        assert!(cursor.is_drained());
        assert_eq!(cursor.read_byte().unwrap(), None);
    }

    #[test]
    fn slice_mixes_byte_and_bulk_reads() {
        let mut slice: &[u8] = b"xyz";
        assert_eq!(slice.read_byte().unwrap(), Some(b'x'));
        let mut rest = [0; 4];
        assert_eq!(slice.read(&mut rest).unwrap(), 2);
        assert_eq!(&rest[..2], b"yz");
        assert!(slice.is_drained());
    }

    #[test]
    fn buf_reader_never_claims_drained() {
        let mut reader = BufReader::new(&b"q"[..]);
        assert!(!reader.is_drained());
        assert_eq!(reader.read_byte().unwrap(), Some(b'q'));
        assert!(!reader.is_drained());
        assert_eq!(reader.read_byte().unwrap(), None);
    }
}
