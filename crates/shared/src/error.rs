use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Transport,
    Server,
    Decode,
    LocalFile,
}

/// Failure of a single mutation attempt. Every variant is terminal for that
/// attempt and local to its slot; the user re-submits to try again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error("backend unreachable: {message}")]
    Transport { message: String },
    #[error("backend returned status {status}: {message}")]
    Server { status: u16, message: String },
    #[error("malformed response body: {message}")]
    Decode { message: String },
    #[error("could not read '{path}': {message}")]
    LocalFile { path: String, message: String },
}

impl MutationError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn local_file(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::LocalFile {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Transport { .. } => ErrorCategory::Transport,
            Self::Server { .. } => ErrorCategory::Server,
            Self::Decode { .. } => ErrorCategory::Decode,
            Self::LocalFile { .. } => ErrorCategory::LocalFile,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}
