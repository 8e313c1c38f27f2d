/// Configuration for an [`ArrayDecoder`](crate::ArrayDecoder).
///
/// # Examples
///
/// ```rust
/// use jsonarray::{ArrayDecoder, DecoderOptions};
///
/// let options = DecoderOptions {
///     max_element_len: Some(64 * 1024),
///     ..Default::default()
/// };
/// let mut decoder = ArrayDecoder::with_options(&b"[1, 2]"[..], options);
/// assert_eq!(decoder.decode::<u32>()?, Some(1));
/// # Ok::<(), jsonarray::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Capacity of the [`BufReader`](std::io::BufReader) wrapped around the
    /// input stream.
    ///
    /// # Default
    ///
    /// `4096`
    pub buffer_capacity: usize,

    /// Upper bound on the bytes buffered while parsing one element,
    /// including leading whitespace and the byte that ends a number.
    ///
    /// When an element does not complete within the limit the decoder breaks
    /// with [`Error::ElementTooLarge`](crate::Error::ElementTooLarge).
    ///
    /// # Default
    ///
    /// `None`
    pub max_element_len: Option<usize>,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            buffer_capacity: 4096,
            max_element_len: None,
        }
    }
}
