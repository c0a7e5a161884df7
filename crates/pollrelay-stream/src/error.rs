use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RelayError {
    /// The outbound request could not be established
    #[error("Connection error: {0}")]
    Connection(String),

    /// The outbound stream failed after it started delivering data
    #[error("Stream transport error: {0}")]
    Transport(String),

    /// A brace-balanced value that is not valid JSON
    #[error("Malformed value: {0}")]
    MalformedValue(String),
}

pub type Result<T> = std::result::Result<T, RelayError>;
