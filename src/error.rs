use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("mod not found in cache: {0}")]
    ModNotFound(String),
    #[error("gameinfo parse error: {0}")]
    ConfigParse(String),
    #[error("bad command: {0}")]
    Command(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
