use std::{io, sync::Arc};

use bstr::BStr;
use thiserror::Error;

/// Terminal failure of an [`ArrayDecoder`](crate::ArrayDecoder).
///
/// Once returned, the same error is returned by every later call. The
/// normal end of the array is not an error; it is reported as `Ok(None)`.
#[derive(Error, Debug)]
pub enum Error<E = serde_json::Error> {
    /// The first non-whitespace byte of the stream was not `[`.
    #[error("not an array: starts with {:?}", BStr::new(core::slice::from_ref(.byte)))]
    NotArray {
        /// The offending byte.
        byte: u8,
    },
    /// An element was followed by something other than `,` or `]`.
    #[error("not comma-separated: found {:?}", BStr::new(core::slice::from_ref(.byte)))]
    NotCommaSeparated {
        /// The offending byte.
        byte: u8,
    },
    /// The stream ended before the array was closed.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    /// An element did not complete within the configured byte limit.
    #[error("element exceeds {limit} bytes")]
    ElementTooLarge {
        /// The configured `max_element_len`.
        limit: usize,
    },
    /// Reading the underlying stream failed.
    #[error("read error: {0}")]
    Io(#[source] Arc<io::Error>),
    /// The value parser rejected an element.
    #[error("invalid element: {0}")]
    Value(#[source] Arc<E>),
}

impl<E> Clone for Error<E> {
    fn clone(&self) -> Self {
        match self {
            Self::NotArray { byte } => Self::NotArray { byte: *byte },
            Self::NotCommaSeparated { byte } => Self::NotCommaSeparated { byte: *byte },
            Self::UnexpectedEndOfInput => Self::UnexpectedEndOfInput,
            Self::ElementTooLarge { limit } => Self::ElementTooLarge { limit: *limit },
            Self::Io(err) => Self::Io(Arc::clone(err)),
            Self::Value(err) => Self::Value(Arc::clone(err)),
        }
    }
}

impl<E> From<io::Error> for Error<E> {
    fn from(err: io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}

impl<E> From<ParseError<E>> for Error<E> {
    fn from(err: ParseError<E>) -> Self {
        match err {
            // an array whose stream ends mid-element is malformed
            ParseError::EndOfInput => Self::UnexpectedEndOfInput,
            ParseError::TooLarge { limit } => Self::ElementTooLarge { limit },
            ParseError::Io(err) => err.into(),
            ParseError::Invalid(err) => Self::Value(Arc::new(err)),
        }
    }
}

/// Failure of a single [`ValueParser::parse`](crate::ValueParser::parse) call.
#[derive(Error, Debug)]
pub enum ParseError<E> {
    /// The source ran out before a complete value was read.
    #[error("end of input before a complete value")]
    EndOfInput,
    /// The value did not complete within `limit` buffered bytes.
    #[error("value exceeds {limit} bytes")]
    TooLarge {
        /// The configured limit.
        limit: usize,
    },
    /// Reading the source failed.
    #[error("read error: {0}")]
    Io(#[from] io::Error),
    /// The bytes read do not form an acceptable value.
    #[error("invalid value: {0}")]
    Invalid(#[source] E),
}
