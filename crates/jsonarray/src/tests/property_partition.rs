use std::mem::{Discriminant, discriminant};

use quickcheck::{Arbitrary, Gen, QuickCheck};
use serde_json::{Map, Value};

use crate::{
    ArrayDecoder, Error,
    chunk_utils::{ChunkedReader, split_at_offsets},
};

/// An arbitrary JSON value of bounded depth whose numbers survive a text
/// round trip exactly.
#[derive(Clone, Debug)]
struct Element(Value);

impl Arbitrary for Element {
    fn arbitrary(g: &mut Gen) -> Self {
        Element(arbitrary_value(g, 3))
    }
}

fn arbitrary_value(g: &mut Gen, depth: usize) -> Value {
    let kinds: &[u8] = if depth == 0 {
        &[0, 1, 2, 3, 4]
    } else {
        &[0, 1, 2, 3, 4, 5, 6]
    };
    match g.choose(kinds).copied().unwrap_or(0) {
        0 => Value::Null,
        1 => Value::Bool(bool::arbitrary(g)),
        2 => Value::from(i64::arbitrary(g)),
        // dyadic fractions print and parse back exactly
        3 => Value::from(f64::from(i16::arbitrary(g)) / 8.0),
        4 => Value::String(String::arbitrary(g)),
        5 => {
            let len = usize::arbitrary(g) % 4;
            Value::Array((0..len).map(|_| arbitrary_value(g, depth - 1)).collect())
        }
        _ => {
            let len = usize::arbitrary(g) % 4;
            let mut map = Map::new();
            for _ in 0..len {
                map.insert(String::arbitrary(g), arbitrary_value(g, depth - 1));
            }
            Value::Object(map)
        }
    }
}

/// Renders `elements` as a JSON array, padding every gap between tokens with
/// whitespace drawn from `gaps`.
fn render(elements: &[Value], gaps: &[u8]) -> Vec<u8> {
    const WHITESPACE: [&[u8]; 6] = [b"", b" ", b"\t", b"\n", b"\r\n", b"  \n "];
    let mut gaps = gaps.iter().cycle();
    let mut gap = move || WHITESPACE[usize::from(*gaps.next().unwrap_or(&0)) % WHITESPACE.len()];

    let mut out = Vec::new();
    out.extend_from_slice(gap());
    out.push(b'[');
    for (i, element) in elements.iter().enumerate() {
        if i > 0 {
            out.extend_from_slice(gap());
            out.push(b',');
        }
        out.extend_from_slice(gap());
        out.extend_from_slice(&serde_json::to_vec(element).unwrap());
    }
    out.extend_from_slice(gap());
    out.push(b']');
    out.extend_from_slice(gap());
    out
}

fn test_count() -> u64 {
    #[cfg(not(miri))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(miri)]
    let tests = 10;
    tests
}

/// Property: however the array is padded with whitespace and however the
/// stream is fragmented, the decoder yields exactly the original elements in
/// order, then end of array.
#[test]
fn partition_roundtrip_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(elements: Vec<Element>, gaps: Vec<u8>, splits: Vec<usize>) -> bool {
        let elements: Vec<Value> = elements.into_iter().map(|e| e.0).collect();
        let input = render(&elements, &gaps);
        let reader = ChunkedReader::new(split_at_offsets(&input, &splits));
        let mut decoder = ArrayDecoder::new(reader);
        let mut decoded = Vec::new();
        loop {
            match decoder.decode::<Value>() {
                Ok(Some(value)) => decoded.push(value),
                Ok(None) => break,
                Err(_) => return false,
            }
        }
        decoded == elements && matches!(decoder.decode::<Value>(), Ok(None))
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Vec<Element>, Vec<u8>, Vec<usize>) -> bool);
}

/// Property: feeding the stream one byte per read gives the same result,
/// error included, as handing it over in one block.
#[test]
fn one_byte_reads_match_contiguous_quickcheck() {
    type Outcome = Result<Value, Discriminant<Error>>;

    fn outcomes(mut decoder: ArrayDecoder<'_>) -> Vec<Outcome> {
        let mut seen = Vec::new();
        loop {
            match decoder.decode::<Value>() {
                Ok(Some(value)) => seen.push(Ok(value)),
                Ok(None) => return seen,
                Err(err) => {
                    seen.push(Err(discriminant(&err)));
                    return seen;
                }
            }
        }
    }

    #[allow(clippy::needless_pass_by_value)]
    fn prop(elements: Vec<Element>, gaps: Vec<u8>, damage: Option<(usize, u8)>) -> bool {
        let elements: Vec<Value> = elements.into_iter().map(|e| e.0).collect();
        let mut input = render(&elements, &gaps);
        if let Some((at, byte)) = damage {
            let at = at % input.len();
            input[at] = byte;
        }

        let contiguous = outcomes(ArrayDecoder::new(&input[..]));
        let fragmented = outcomes(ArrayDecoder::new(ChunkedReader::one_byte(&input)));
        contiguous == fragmented
    }

    QuickCheck::new()
        .tests(test_count() / 10)
        .quickcheck(prop as fn(Vec<Element>, Vec<u8>, Option<(usize, u8)>) -> bool);
}

/// Property: whatever kind of element precedes it, a byte that is neither
/// `,` nor `]` is reported as a bad separator once the element is out.
#[test]
fn bad_separator_after_any_element_quickcheck() {
    const SEPARATORS: [u8; 5] = [b';', b'|', b':', b'}', b'#'];

    #[allow(clippy::needless_pass_by_value)]
    fn prop(element: Element, pick: u8, one_byte: bool) -> bool {
        let separator = SEPARATORS[usize::from(pick) % SEPARATORS.len()];
        let mut input = b"[".to_vec();
        input.extend_from_slice(&serde_json::to_vec(&element.0).unwrap());
        input.push(separator);
        input.extend_from_slice(b"0]");

        let mut decoder = if one_byte {
            ArrayDecoder::new(ChunkedReader::one_byte(&input))
        } else {
            ArrayDecoder::new(&input[..])
        };
        decoder.decode::<Value>().ok() == Some(Some(element.0))
            && matches!(
                decoder.decode::<Value>(),
                Err(Error::NotCommaSeparated { byte }) if byte == separator
            )
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Element, u8, bool) -> bool);
}
