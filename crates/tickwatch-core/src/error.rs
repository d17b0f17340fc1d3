use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// The ticker input is empty or contains characters the exchange symbol
    /// alphabet does not allow.
    #[error("Invalid ticker: {0}")]
    InvalidTicker(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
