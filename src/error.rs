use std::fmt;

#[derive(Debug)]
pub enum Error {
    InvalidMode(String),
    InvalidPreset(String),
    InvalidTemperature(f64),
    Unsupported(&'static str),
    Config(String),
    Device(String),
    Json(serde_json::Error),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidMode(mode) => write!(f, "invalid hvac mode: {mode}"),
            Error::InvalidPreset(preset) => write!(f, "invalid preset: {preset}"),
            Error::InvalidTemperature(t) => write!(f, "invalid temperature: {t}"),
            Error::Unsupported(what) => write!(f, "unsupported operation: {what}"),
            Error::Config(msg) => write!(f, "configuration error: {msg}"),
            Error::Device(msg) => write!(f, "device error: {msg}"),
            Error::Json(e) => write!(f, "JSON error: {e}"),
            Error::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Json(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
