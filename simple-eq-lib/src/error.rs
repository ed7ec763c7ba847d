use std::fmt::{Display, Formatter};

/// Error type for filter design, parameter access and settings IO.
#[derive(Debug)]
pub enum EqError {
    InvalidSampleRate(f64),
    NotPrepared,
    ChannelMismatch { expected: usize, actual: usize },
    UnknownParameter(String),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl Display for EqError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSampleRate(rate) => write!(f, "invalid sample rate: {}", rate),
            Self::NotPrepared => write!(f, "processor used before prepare"),
            Self::ChannelMismatch { expected, actual } => write!(
                f,
                "channel length mismatch: expected {} samples, got {}",
                expected, actual
            ),
            Self::UnknownParameter(id) => write!(f, "unknown parameter: {}", id),
            Self::Io(err) => write!(f, "io error: {}", err),
            Self::Json(err) => write!(f, "settings json error: {}", err),
        }
    }
}

impl std::error::Error for EqError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EqError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for EqError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
