//! Processes a feed of records **while it is still arriving**.
//!
//! A paginated API response is usually one large JSON array:
//!
//! ```text
//! [
//!   {"id": 1, "author": "...", "text": "..."},
//!   {"id": 2, "author": "...", "text": "..."},
//!   ...
//! ]
//! ```
//!
//! Waiting for the closing `]` before looking at the first record wastes both
//! memory and latency. Here the response is replayed one byte per `read`, the
//! worst fragmentation a socket can produce, and each record is printed the
//! moment its closing `}` arrives.
//!
//! Run with
//!
//! ```bash
//! RUST_LOG=jsonarray=trace cargo run -p jsonarray --example paginated_feed
//! ```

use jsonarray::{ArrayDecoder, chunk_utils::ChunkedReader};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Post {
    id: u64,
    author: String,
    text: String,
}

fn main() -> Result<(), jsonarray::Error> {
    env_logger::init();

    // In real life this would be a network response body.
    let body = r#"[
        {"id": 1, "author": "ada", "text": "first!"},
        {"id": 2, "author": "grace", "text": "arrays, streamed"},
        {"id": 3, "author": "linus", "text": "ça marche"}
    ]"#.as_bytes();

    let mut decoder = ArrayDecoder::new(ChunkedReader::one_byte(body));
    while let Some(post) = decoder.decode::<Post>()? {
        println!("#{} <{}> {}", post.id, post.author, post.text);
    }
    println!("end of feed");
    Ok(())
}
