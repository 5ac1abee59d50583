//! UI/backend events and error modeling for desktop GUI controller.

use client_core::MutationOutcome;
use shared::{
    domain::MutationKind,
    error::{ErrorCategory, MutationError},
};

pub enum UiEvent {
    Info(String),
    BackendReady { api_url: String },
    Settled(MutationOutcome),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Startup,
    Transport,
    Server,
    Decode,
    LocalFile,
}

impl From<ErrorCategory> for UiErrorCategory {
    fn from(value: ErrorCategory) -> Self {
        match value {
            ErrorCategory::Transport => Self::Transport,
            ErrorCategory::Server => Self::Server,
            ErrorCategory::Decode => Self::Decode,
            ErrorCategory::LocalFile => Self::LocalFile,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Mutation(MutationKind),
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Startup => "Startup",
        UiErrorCategory::Transport => "Network",
        UiErrorCategory::Server => "Server",
        UiErrorCategory::Decode => "Response",
        UiErrorCategory::LocalFile => "File",
    }
}

/// Short hint shown under a failed operation; the detail line carries the rest.
pub fn failure_hint(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Startup => {
            "Backend worker failed to start; check the configuration and relaunch."
        }
        UiErrorCategory::Transport => {
            "Backend unreachable; check the API URL and that the server is running."
        }
        UiErrorCategory::Server => "The backend rejected the request.",
        UiErrorCategory::Decode => {
            "The backend sent a response this client does not understand."
        }
        UiErrorCategory::LocalFile => "The selected file could not be read.",
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn startup(message: impl Into<String>) -> Self {
        Self {
            category: UiErrorCategory::Startup,
            context: UiErrorContext::BackendStartup,
            message: message.into(),
        }
    }

    pub fn from_mutation(kind: MutationKind, err: &MutationError) -> Self {
        Self {
            category: err.category().into(),
            context: UiErrorContext::Mutation(kind),
            message: err.to_string(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// One line for the panel or status bar, e.g. `Upload failed (Network): ...`.
    pub fn summary(&self) -> String {
        let label = err_label(self.category);
        match self.context {
            UiErrorContext::BackendStartup => format!("{label} error: {}", self.message),
            UiErrorContext::Mutation(kind) => {
                format!("{} failed ({label}): {}", kind.title(), self.message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutation_errors_keep_their_category() {
        let err = UiError::from_mutation(
            MutationKind::AddRepo,
            &MutationError::server(500, "clone failed"),
        );
        assert_eq!(err.category(), UiErrorCategory::Server);
        assert_eq!(
            err.summary(),
            "Add repository failed (Server): backend returned status 500: clone failed"
        );
    }

    #[test]
    fn startup_errors_are_labelled() {
        let err = UiError::startup("failed to build runtime");
        assert_eq!(err.category(), UiErrorCategory::Startup);
        assert_eq!(err.summary(), "Startup error: failed to build runtime");
    }

    #[test]
    fn transport_hint_mentions_api_url() {
        assert!(failure_hint(UiErrorCategory::Transport).contains("API URL"));
    }
}
