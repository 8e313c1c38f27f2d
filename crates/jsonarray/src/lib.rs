//! Incrementally decode the elements of a JSON array arriving over a byte
//! stream.
//!
//! [`ArrayDecoder`] walks the `[`, `,` and `]` framing of a top-level JSON
//! array and hands each element to a single-value parser, so only one element
//! is held in memory at a time and each one is available as soon as its
//! closing token has arrived.
//!
//! ```rust
//! use jsonarray::ArrayDecoder;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Message {
//!     greeting: String,
//! }
//!
//! let stream = br#"[{"greeting": "hell"}, {"greeting": "o, w"}, {"greeting": "orld"}]"#;
//! let mut decoder = ArrayDecoder::new(&stream[..]);
//!
//! let mut text = String::new();
//! while let Some(message) = decoder.decode::<Message>()? {
//!     text.push_str(&message.greeting);
//! }
//! assert_eq!(text, "hello, world");
//! # Ok::<(), jsonarray::Error>(())
//! ```
//!
//! Parsers are allowed to read past the end of the value they decode. The
//! surplus they report is pushed back on top of the [`LayeredSource`] the
//! decoder reads from, so no byte of the stream is lost between elements.

pub mod chunk_utils;
mod decoder;
mod error;
mod layered;
mod options;
mod source;
mod value_parser;

#[cfg(test)]
mod tests;

pub use decoder::{ArrayDecoder, Elements};
pub use error::{Error, ParseError};
pub use layered::LayeredSource;
pub use options::DecoderOptions;
pub use source::ByteSource;
pub use value_parser::{Parsed, SerdeJsonParser, ValueParser};
