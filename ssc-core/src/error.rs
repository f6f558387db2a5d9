use std::{error, fmt, io};

#[derive(Debug)]
pub enum Error {
    MissingElement,
    Unclassifiable,
    MissingIdentity,
    InvalidStorageKey(String),
    JsonError(Box<dyn error::Error + Send + Sync>),
    IoError(io::Error),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingElement => write!(f, "No element to classify"),
            Self::Unclassifiable => write!(f, "Element matches no known resource marker"),
            Self::MissingIdentity => write!(f, "Resource has no identity link"),
            Self::InvalidStorageKey(key) => write!(f, "Invalid storage key: {key}", key = key),
            Self::JsonError(err) => err.fmt(f),
            Self::IoError(err) => err.fmt(f),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::JsonError(Box::new(err))
    }
}
