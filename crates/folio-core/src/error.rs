//! Error types for Folio

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid job descriptor: {0}")]
    InvalidJob(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
