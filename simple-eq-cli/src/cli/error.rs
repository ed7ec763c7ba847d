//! Error type for CLI commands.

use std::fmt::{Display, Formatter};

use simple_eq_lib::EqError;

#[derive(Debug)]
pub enum CliError {
    Eq(EqError),
    Wav(hound::Error),
    Io(std::io::Error),
    Json(serde_json::Error),
    Unsupported(String),
}

pub type Result<T> = std::result::Result<T, CliError>;

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Eq(err) => write!(f, "{}", err),
            Self::Wav(err) => write!(f, "wav error: {}", err),
            Self::Io(err) => write!(f, "io error: {}", err),
            Self::Json(err) => write!(f, "json error: {}", err),
            Self::Unsupported(message) => write!(f, "unsupported: {}", message),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Eq(err) => Some(err),
            Self::Wav(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Unsupported(_) => None,
        }
    }
}

impl From<EqError> for CliError {
    fn from(err: EqError) -> Self {
        Self::Eq(err)
    }
}

impl From<hound::Error> for CliError {
    fn from(err: hound::Error) -> Self {
        Self::Wav(err)
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}
