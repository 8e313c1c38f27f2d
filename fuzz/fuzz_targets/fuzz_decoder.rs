#![no_main]
use std::mem::{Discriminant, discriminant};

use jsonarray::{ArrayDecoder, Error, chunk_utils::ChunkedReader};
use libfuzzer_sys::fuzz_target;
use serde_json::Value;

const HEADER: usize = 4; // split seed

type Outcome = Result<Value, Discriminant<Error>>;

/// Decode until the array ends or fails, recording every outcome.
fn outcomes(mut decoder: ArrayDecoder<'_>) -> Vec<Outcome> {
    let mut seen = Vec::new();
    loop {
        match decoder.decode::<Value>() {
            Ok(Some(value)) => seen.push(Ok(value)),
            Ok(None) => break,
            Err(err) => {
                seen.push(Err(discriminant(&err)));
                break;
            }
        }
    }
    // terminal results repeat
    match (seen.last(), decoder.decode::<Value>()) {
        (Some(Err(want)), Err(got)) => assert_eq!(*want, discriminant(&got)),
        (Some(Err(_)), Ok(_)) => panic!("error did not repeat"),
        (_, Ok(None)) => {}
        (_, other) => panic!("end of array did not repeat: {other:?}"),
    }
    seen
}

/// Split `data` into chunks whose sizes are derived from `split_seed`. Each
/// chunk is at least one byte.
fn split_into_chunks(data: &[u8], split_seed: u64) -> Vec<&[u8]> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut seed = split_seed;
    while start < data.len() {
        let remaining = data.len() - start;
        let size = (seed as usize % remaining) + 1;
        chunks.push(&data[start..start + size]);
        start += size;
        seed = seed.rotate_left(7) ^ 0x9E37_79B9;
    }
    chunks
}

fn decoder(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let split_seed = u64::from(u32::from_le_bytes(data[..HEADER].try_into().unwrap()));
    let data = &data[HEADER..];

    let contiguous = outcomes(ArrayDecoder::new(data));
    let fragmented = outcomes(ArrayDecoder::new(ChunkedReader::new(split_into_chunks(
        data, split_seed,
    ))));
    assert_eq!(contiguous, fragmented);
}

fuzz_target!(|data: &[u8]| decoder(data));
