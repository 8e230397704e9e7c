use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Encode(String),
}

impl From<StoreError> for common::Error {
    fn from(err: StoreError) -> Self {
        common::Error::Storage(err.to_string())
    }
}
