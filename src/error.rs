use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong during a sync run.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing/unreadable config file, malformed JSON or a domain that does
    /// not match the expected pattern.
    #[error("configuration error: {0}")]
    Config(String),

    /// The HTTP request itself could not be completed.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider listing had no entry for the requested name.
    #[error("not found: {0}")]
    NotFound(String),

    /// The provider accepted the request but reported a failure in its
    /// response payload.
    #[error("Cloudflare API error: {0}")]
    Api(String),
}

impl Error {
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Config(_) => 2,
            Error::Transport(_) | Error::NotFound(_) | Error::Api(_) => 1,
        }
    }
}
