use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValueParseError {
    #[error("Value error: value is empty")]
    Empty,
    #[error("Value error: unrecognized number format {0:?}")]
    InvalidNumber(String),
    #[error("Value error: unrecognized date format {0:?}")]
    InvalidDate(String),
}
