use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Root directory error: {0}")]
    RootDir(String),

    #[error("Invalid search pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("Bad identifier: {0}")]
    BadIdentifier(String),

    #[error("Editor error: {0}")]
    Editor(String),

    #[error("Add cancelled: {0}")]
    AddRejected(String),
}

pub type Result<T> = std::result::Result<T, Error>;
