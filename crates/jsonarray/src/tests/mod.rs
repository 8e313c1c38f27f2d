use serde::Deserialize;

mod property_partition;

#[derive(Debug, Deserialize, PartialEq, Eq)]
struct T {
    #[serde(rename = "X")]
    x: i64,
}

const fn t(x: i64) -> T {
    T { x }
}
