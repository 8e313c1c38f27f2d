use std::io::{self, Cursor, ErrorKind, Read};

use serde::de::DeserializeOwned;

use crate::{ByteSource, DecoderOptions, ParseError};

/// One decoded element and the bytes the parser read past its end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed<T> {
    /// The decoded value.
    pub value: T,
    /// Bytes read from the source beyond the value's closing token. These
    /// belong to whatever follows the value and must be read again.
    pub surplus: Vec<u8>,
}

/// A parser that decodes exactly one JSON value from a byte source.
///
/// Implementations may buffer ahead of the value's end, as long as they
/// return every such byte in [`Parsed::surplus`]. Leading whitespace is the
/// parser's to skip.
pub trait ValueParser {
    /// Error reported for bytes that do not form an acceptable value.
    type Error: core::error::Error + 'static;

    /// Decodes one value of type `T` from `source`.
    ///
    /// # Errors
    ///
    /// [`ParseError::EndOfInput`] if the source ends before the value is
    /// complete, [`ParseError::Io`] for read failures and
    /// [`ParseError::Invalid`] for syntax or type errors.
    fn parse<T, S>(&mut self, source: &mut S) -> Result<Parsed<T>, ParseError<Self::Error>>
    where
        T: DeserializeOwned,
        S: ByteSource + ?Sized;
}

/// The default [`ValueParser`], built on [`serde_json`].
///
/// Objects, arrays and strings are streamed through a
/// [`serde_json::StreamDeserializer`] in one pass and end on their closing
/// token. Literals end on their last letter. A number only ends at the first
/// byte that cannot continue it, so that byte is the one byte of look-ahead
/// this parser ever hands back.
#[derive(Debug, Clone, Default)]
pub struct SerdeJsonParser {
    max_len: Option<usize>,
    buffer: Vec<u8>,
}

impl SerdeJsonParser {
    /// Creates a parser using the element limit of `options`.
    #[must_use]
    pub fn new(options: &DecoderOptions) -> Self {
        Self {
            max_len: options.max_element_len,
            buffer: Vec::new(),
        }
    }
}

impl ValueParser for SerdeJsonParser {
    type Error = serde_json::Error;

    fn parse<T, S>(&mut self, source: &mut S) -> Result<Parsed<T>, ParseError<Self::Error>>
    where
        T: DeserializeOwned,
        S: ByteSource + ?Sized,
    {
        self.buffer.clear();
        let mut element = ElementReader {
            source,
            bytes: &mut self.buffer,
            taken: 0,
            limit: self.max_len,
            exceeded: false,
        };
        let first = loop {
            match element.next_byte() {
                Ok(Some(b' ' | b'\t' | b'\n' | b'\r')) => {}
                Ok(Some(byte)) => break byte,
                Ok(None) => return Err(ParseError::EndOfInput),
                Err(err) => return Err(element.failed(err)),
            }
        };
        element.bytes.push(first);
        match first {
            b'[' | b'{' | b'"' => element.delimited(first),
            b't' => element.literal(b"rue"),
            b'f' => element.literal(b"alse"),
            b'n' => element.literal(b"ull"),
            b'-' | b'0'..=b'9' => element.number(),
            // not the start of any value; let serde_json say so
            _ => element.finish(Vec::new(), false),
        }
    }
}

/// Reads one element from the source, keeping the bytes it reads and
/// enforcing the element size limit.
struct ElementReader<'p, S: ?Sized> {
    source: &'p mut S,
    bytes: &'p mut Vec<u8>,
    // leading whitespace included
    taken: usize,
    limit: Option<usize>,
    exceeded: bool,
}

impl<S: ByteSource + ?Sized> ElementReader<'_, S> {
    fn room(&mut self) -> io::Result<usize> {
        let Some(limit) = self.limit else {
            return Ok(usize::MAX);
        };
        let room = limit.saturating_sub(self.taken);
        if room == 0 {
            self.exceeded = true;
            return Err(io::Error::other("element size limit reached"));
        }
        Ok(room)
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        self.room()?;
        loop {
            match self.source.read_byte() {
                Ok(byte) => {
                    self.taken += usize::from(byte.is_some());
                    return Ok(byte);
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
    }

    fn failed(&self, err: io::Error) -> ParseError<serde_json::Error> {
        match self.limit {
            Some(limit) if self.exceeded => ParseError::TooLarge { limit },
            _ => ParseError::Io(err),
        }
    }

    fn delimited<T: DeserializeOwned>(
        &mut self,
        first: u8,
    ) -> Result<Parsed<T>, ParseError<serde_json::Error>> {
        let (next, end) = {
            let reader = Cursor::new([first]).chain(&mut *self);
            let mut stream = serde_json::Deserializer::from_reader(reader).into_iter::<T>();
            (stream.next(), stream.byte_offset())
        };
        match next {
            Some(Ok(value)) => Ok(Parsed {
                value,
                surplus: self.bytes.get(end..).map(<[u8]>::to_vec).unwrap_or_default(),
            }),
            Some(Err(err)) if err.is_io() => Err(self.failed(err.into())),
            Some(Err(err)) if err.is_eof() => Err(ParseError::EndOfInput),
            Some(Err(err)) => Err(ParseError::Invalid(err)),
            // `first` is not whitespace, so a value was attempted
            None => Err(ParseError::EndOfInput),
        }
    }

    fn literal<T: DeserializeOwned>(
        &mut self,
        rest: &[u8],
    ) -> Result<Parsed<T>, ParseError<serde_json::Error>> {
        for &expected in rest {
            match self.next_byte() {
                Ok(Some(byte)) => {
                    self.bytes.push(byte);
                    if byte != expected {
                        break;
                    }
                }
                Ok(None) => return self.finish(Vec::new(), true),
                Err(err) => return Err(self.failed(err)),
            }
        }
        self.finish(Vec::new(), false)
    }

    fn number<T: DeserializeOwned>(&mut self) -> Result<Parsed<T>, ParseError<serde_json::Error>> {
        loop {
            match self.next_byte() {
                Ok(Some(byte @ (b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E'))) => {
                    self.bytes.push(byte);
                }
                Ok(Some(byte)) => return self.finish(vec![byte], false),
                Ok(None) => return self.finish(Vec::new(), true),
                Err(err) => return Err(self.failed(err)),
            }
        }
    }

    // Decodes the bytes collected for a number or literal.
    fn finish<T: DeserializeOwned>(
        &self,
        surplus: Vec<u8>,
        at_eof: bool,
    ) -> Result<Parsed<T>, ParseError<serde_json::Error>> {
        match serde_json::from_slice(self.bytes.as_slice()) {
            Ok(value) => Ok(Parsed { value, surplus }),
            Err(err) if at_eof && err.is_eof() => Err(ParseError::EndOfInput),
            Err(err) => Err(ParseError::Invalid(err)),
        }
    }
}

impl<S: ByteSource + ?Sized> Read for ElementReader<'_, S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let len = buf.len().min(self.room()?);
        let read = self.source.read(&mut buf[..len])?;
        self.bytes.extend_from_slice(&buf[..read]);
        self.taken += read;
        Ok(read)
    }
}
