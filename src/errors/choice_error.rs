use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ChoiceVectorError {
    #[error("empty choice vector spec")]
    EmptySpec,
    #[error("malformed choice vector pair: {0:?}")]
    MalformedPair(String),
    #[error("attribute {attr} out of range for {attr_count} attributes")]
    AttrOutOfRange { attr: u8, attr_count: u32 },
    #[error("hash bit {0} out of range")]
    BitOutOfRange(u8),
}
