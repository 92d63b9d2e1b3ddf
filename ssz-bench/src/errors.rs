#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Other(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error(transparent)]
    Storage(#[from] storage::Error),
    #[error(transparent)]
    Harness(#[from] harness::Error),
}

impl From<config::ConfigError> for Error {
    fn from(error: config::ConfigError) -> Self {
        Self::Config(error.to_string())
    }
}

impl From<generator::Error> for Error {
    fn from(error: generator::Error) -> Self {
        Self::Config(error.to_string())
    }
}

impl From<presets::Error> for Error {
    fn from(error: presets::Error) -> Self {
        Self::Config(error.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Other(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
