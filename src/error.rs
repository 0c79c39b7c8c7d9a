//! Error codes shared by every fallible layer of the crate.
//!
//! DESIGN
//! ======
//! Each concern owns a `thiserror` enum (`GeometryError`, `ProviderError`,
//! `ConfigError`). They all implement [`ErrorCode`] so the host can show a
//! grepable code next to the translated message. [`MapError`] only exists for
//! the binary, which needs a single error type to bubble out of `main`.

use crate::config::ConfigError;
use crate::geometry::GeometryError;
use crate::provider::ProviderError;

/// Grepable error code and retryable flag.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// Top-level error for the headless driver.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid command: {0}")]
    Command(String),
}

impl ErrorCode for MapError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Provider(e) => e.error_code(),
            Self::Geometry(e) => e.error_code(),
            Self::Io(_) => "E_IO",
            Self::Command(_) => "E_COMMAND",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Provider(e) => e.retryable(),
            _ => false,
        }
    }
}
