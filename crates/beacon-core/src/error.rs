//! Error types for Beacon.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Empty message")]
    EmptyMessage,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, Error>;
