use crate::errors::choice_error::ChoiceVectorError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("choice vector error: {0}")]
    ChoiceVector(#[from] ChoiceVectorError),
    #[error("relation exists: {0}")]
    RelationExists(String),
    #[error("relation not found: {0}")]
    RelationNotFound(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("corrupt header: {0}")]
    CorruptHeader(String),
    #[error("malformed tuple: {0}")]
    MalformedTuple(String),
    #[error("tuple too large: {0} bytes")]
    TupleTooLarge(usize),
}
