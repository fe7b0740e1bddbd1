use crate::errors::storage_error::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("query has {got} fields, relation has {want} attributes")]
    WrongFieldCount { got: usize, want: usize },
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
