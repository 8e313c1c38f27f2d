use std::{
    io::{Cursor, Read},
    iter::FusedIterator,
    marker::PhantomData,
};

use log::{debug, trace};
use serde::de::DeserializeOwned;

use crate::{
    ByteSource, DecoderOptions, Error, LayeredSource, Parsed, SerdeJsonParser, ValueParser,
};

#[derive(Debug)]
enum State<E> {
    AwaitingOpenBracket,
    AfterElement,
    // `]` was seen; terminal, but not a failure
    EndOfArray,
    Broken(Error<E>),
}

/// Reads the elements of a JSON array from a byte stream, one at a time.
///
/// Each call to [`decode`](Self::decode) reads just enough of the stream to
/// produce the next element. After the closing `]` every call returns
/// `Ok(None)`; after a failure every call returns a clone of that failure.
/// Neither performs any further I/O.
///
/// Bytes following the closing `]` are never read by the decoder; use
/// [`into_source`](Self::into_source) to get at them.
#[derive(Debug)]
pub struct ArrayDecoder<'a, P: ValueParser = SerdeJsonParser> {
    source: LayeredSource<'a>,
    parser: P,
    state: State<P::Error>,
}

impl<'a> ArrayDecoder<'a> {
    /// Creates a decoder reading from `reader` with default options.
    pub fn new<R: Read + 'a>(reader: R) -> Self {
        Self::with_options(reader, DecoderOptions::default())
    }

    /// Creates a decoder reading from `reader`.
    pub fn with_options<R: Read + 'a>(reader: R, options: DecoderOptions) -> Self {
        Self::with_parser(reader, options, SerdeJsonParser::new(&options))
    }
}

impl<'a, P: ValueParser> ArrayDecoder<'a, P> {
    /// Creates a decoder that hands each element to `parser`.
    pub fn with_parser<R: Read + 'a>(reader: R, options: DecoderOptions, parser: P) -> Self {
        Self {
            source: LayeredSource::from_reader(options.buffer_capacity, reader),
            parser,
            state: State::AwaitingOpenBracket,
        }
    }

    /// Decodes the next element of the array.
    ///
    /// Returns `Ok(None)` once the array has been closed.
    ///
    /// # Errors
    ///
    /// Any [`Error`]. All errors are terminal: the decoder returns the same
    /// error from then on.
    pub fn decode<T: DeserializeOwned>(&mut self) -> Result<Option<T>, Error<P::Error>> {
        match self.state {
            State::Broken(ref err) => return Err(err.clone()),
            State::EndOfArray => return Ok(None),
            State::AwaitingOpenBracket => {
                match self.framing_byte()? {
                    Some(b'[') => {}
                    Some(byte) => return Err(self.breaks(Error::NotArray { byte })),
                    None => return Err(self.breaks(Error::UnexpectedEndOfInput)),
                }
                self.state = State::AfterElement;
                match self.framing_byte()? {
                    Some(b']') => return Ok(self.finish()),
                    // first byte of the first element
                    Some(byte) => self.source.insert(Cursor::new([byte])),
                    None => return Err(self.breaks(Error::UnexpectedEndOfInput)),
                }
            }
            State::AfterElement => match self.framing_byte()? {
                Some(b',') => {}
                Some(b']') => return Ok(self.finish()),
                Some(byte) => return Err(self.breaks(Error::NotCommaSeparated { byte })),
                None => return Err(self.breaks(Error::UnexpectedEndOfInput)),
            },
        }

        match self.parser.parse::<T, _>(&mut self.source) {
            Ok(Parsed { value, surplus }) => {
                trace!(
                    "decoded element, reinjecting {} surplus bytes above {} layers",
                    surplus.len(),
                    self.source.depth()
                );
                self.source.insert_bytes(surplus);
                Ok(Some(value))
            }
            Err(err) => Err(self.breaks(err.into())),
        }
    }

    /// Decodes the next element into `destination`.
    ///
    /// Returns `false`, leaving `destination` untouched, once the array has
    /// been closed.
    ///
    /// # Errors
    ///
    /// As for [`decode`](Self::decode); `destination` is untouched.
    pub fn decode_into<T: DeserializeOwned>(
        &mut self,
        destination: &mut T,
    ) -> Result<bool, Error<P::Error>> {
        let Some(value) = self.decode()? else {
            return Ok(false);
        };
        *destination = value;
        Ok(true)
    }

    /// Iterates over the remaining elements.
    ///
    /// The iterator ends after the closing `]`, or after yielding the first
    /// error.
    pub fn elements<T: DeserializeOwned>(&mut self) -> Elements<'_, 'a, T, P> {
        Elements {
            decoder: self,
            done: false,
            _marker: PhantomData,
        }
    }

    /// Returns `true` once the array has been closed or decoding has failed.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        matches!(self.state, State::EndOfArray | State::Broken(_))
    }

    /// Consumes the decoder and returns the stream it was reading, positioned
    /// right after the last byte the decoder consumed.
    ///
    /// After the array has been closed, this is the data following `]`.
    pub fn into_source(self) -> LayeredSource<'a> {
        self.source
    }

    // Next byte that is not insignificant whitespace. Read errors break the
    // decoder.
    fn framing_byte(&mut self) -> Result<Option<u8>, Error<P::Error>> {
        loop {
            match self.source.read_byte() {
                Ok(Some(b' ' | b'\t' | b'\n' | b'\r')) => {}
                Ok(byte) => return Ok(byte),
                Err(err) => return Err(self.breaks(err.into())),
            }
        }
    }

    fn finish<T>(&mut self) -> Option<T> {
        debug!("end of array");
        self.state = State::EndOfArray;
        None
    }

    fn breaks(&mut self, err: Error<P::Error>) -> Error<P::Error> {
        debug!("array decoding failed: {err}");
        self.state = State::Broken(err.clone());
        err
    }
}

/// Iterator over the elements of an array, created by
/// [`ArrayDecoder::elements`].
#[derive(Debug)]
pub struct Elements<'d, 'a, T, P: ValueParser = SerdeJsonParser> {
    decoder: &'d mut ArrayDecoder<'a, P>,
    done: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned, P: ValueParser> Iterator for Elements<'_, '_, T, P> {
    type Item = Result<T, Error<P::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.decoder.decode() {
            Ok(Some(value)) => Some(Ok(value)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<T: DeserializeOwned, P: ValueParser> FusedIterator for Elements<'_, '_, T, P> {}
