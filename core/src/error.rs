use alloc::string::String;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalkError {
    #[error("Coordinates outside of the grid")]
    InvalidCoords,
    #[error("Option `{key}` is not a number")]
    InvalidNumber { key: String },
    #[error("Unknown render format")]
    InvalidFormat,
}

pub type Result<T> = core::result::Result<T, WalkError>;
