use thiserror::Error;

#[derive(Debug, Error)]
pub enum BitmapError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("out of range: {0}")]
    OutOfRange(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("font load error: {0}")]
    FontLoad(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BitmapError>;
