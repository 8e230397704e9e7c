use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Chart payload error: {0}")]
    Decode(String),

    #[error("Storage error: {0}")]
    Storage(String),
}
