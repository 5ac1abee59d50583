//! Action coordinator: owns the three mutation slots and the pending input
//! buffers, turns user intent into requests, and applies settled outcomes.
//!
//! The coordinator never performs I/O. Callers dispatch the returned
//! [`MutationRequest`] (see [`crate::execute`]) and hand the resulting
//! [`MutationOutcome`] back through [`ActionCoordinator::apply`].

use std::path::{Path, PathBuf};

use shared::{domain::MutationKind, error::MutationError};
use tracing::{debug, info, warn};

use crate::slot::{MutationSlot, SlotStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRequest {
    Upload { file: PathBuf },
    AddRepo { url: String },
    Generate { prompt: String },
}

impl MutationRequest {
    pub fn kind(&self) -> MutationKind {
        match self {
            Self::Upload { .. } => MutationKind::Upload,
            Self::AddRepo { .. } => MutationKind::AddRepo,
            Self::Generate { .. } => MutationKind::GenerateCode,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Uploaded(Result<(), MutationError>),
    RepoAdded(Result<(), MutationError>),
    Generated(Result<String, MutationError>),
}

impl MutationOutcome {
    pub fn kind(&self) -> MutationKind {
        match self {
            Self::Uploaded(_) => MutationKind::Upload,
            Self::RepoAdded(_) => MutationKind::AddRepo,
            Self::Generated(_) => MutationKind::GenerateCode,
        }
    }

    pub fn error(&self) -> Option<&MutationError> {
        match self {
            Self::Uploaded(result) | Self::RepoAdded(result) => result.as_ref().err(),
            Self::Generated(result) => result.as_ref().err(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error().is_none()
    }
}

#[derive(Debug, Default)]
pub struct ActionCoordinator {
    upload: MutationSlot<()>,
    add_repo: MutationSlot<()>,
    generate: MutationSlot<String>,

    selected_file: Option<PathBuf>,
    repo_url: String,
    prompt: String,
}

impl ActionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upload_slot(&self) -> &MutationSlot<()> {
        &self.upload
    }

    pub fn add_repo_slot(&self) -> &MutationSlot<()> {
        &self.add_repo
    }

    pub fn generate_slot(&self) -> &MutationSlot<String> {
        &self.generate
    }

    pub fn status(&self, kind: MutationKind) -> SlotStatus {
        match kind {
            MutationKind::Upload => self.upload.status(),
            MutationKind::AddRepo => self.add_repo.status(),
            MutationKind::GenerateCode => self.generate.status(),
        }
    }

    pub fn last_error(&self, kind: MutationKind) -> Option<&MutationError> {
        match kind {
            MutationKind::Upload => self.upload.last_error(),
            MutationKind::AddRepo => self.add_repo.last_error(),
            MutationKind::GenerateCode => self.generate.last_error(),
        }
    }

    /// Generated code of the last attempt, shown only while that slot is in `Success`.
    pub fn generated_code(&self) -> Option<&str> {
        self.generate.success_value().map(String::as_str)
    }

    pub fn selected_file(&self) -> Option<&Path> {
        self.selected_file.as_deref()
    }

    /// Replaces the selection wholesale; `None` clears it.
    pub fn select_file(&mut self, file: Option<PathBuf>) {
        self.selected_file = file;
    }

    pub fn repo_url(&self) -> &str {
        &self.repo_url
    }

    pub fn set_repo_url(&mut self, url: impl Into<String>) {
        self.repo_url = url.into();
    }

    /// Direct access for text widgets bound to the field.
    pub fn repo_url_mut(&mut self) -> &mut String {
        &mut self.repo_url
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn prompt_mut(&mut self) -> &mut String {
        &mut self.prompt
    }

    fn has_input(&self, kind: MutationKind) -> bool {
        match kind {
            MutationKind::Upload => self.selected_file.is_some(),
            MutationKind::AddRepo => !self.repo_url.is_empty(),
            MutationKind::GenerateCode => !self.prompt.is_empty(),
        }
    }

    /// Whether the triggering control should be enabled.
    pub fn can_submit(&self, kind: MutationKind) -> bool {
        self.has_input(kind) && self.status(kind) != SlotStatus::Pending
    }

    pub fn submit_upload(&mut self) -> Option<MutationRequest> {
        let file = self.selected_file.clone()?;
        if !self.upload.begin() {
            debug!(kind = "upload", "submission ignored: request already in flight");
            return None;
        }
        info!(kind = "upload", file = %file.display(), "submitting upload");
        Some(MutationRequest::Upload { file })
    }

    pub fn submit_repo(&mut self) -> Option<MutationRequest> {
        if self.repo_url.is_empty() {
            return None;
        }
        if !self.add_repo.begin() {
            debug!(kind = "add_repo", "submission ignored: request already in flight");
            return None;
        }
        info!(kind = "add_repo", url = %self.repo_url, "submitting repository");
        Some(MutationRequest::AddRepo {
            url: self.repo_url.clone(),
        })
    }

    pub fn submit_prompt(&mut self) -> Option<MutationRequest> {
        if self.prompt.is_empty() {
            return None;
        }
        if !self.generate.begin() {
            debug!(kind = "generate_code", "submission ignored: request already in flight");
            return None;
        }
        info!(
            kind = "generate_code",
            prompt_len = self.prompt.len(),
            "submitting prompt"
        );
        Some(MutationRequest::Generate {
            prompt: self.prompt.clone(),
        })
    }

    pub fn submit(&mut self, kind: MutationKind) -> Option<MutationRequest> {
        match kind {
            MutationKind::Upload => self.submit_upload(),
            MutationKind::AddRepo => self.submit_repo(),
            MutationKind::GenerateCode => self.submit_prompt(),
        }
    }

    /// Settles the slot matching `outcome`. Returns `false` when that slot had
    /// nothing in flight and the outcome was dropped.
    pub fn apply(&mut self, outcome: MutationOutcome) -> bool {
        let kind = outcome.kind();
        if let Some(err) = outcome.error() {
            warn!(kind = kind.label(), error = %err, "mutation failed");
        }

        let applied = match outcome {
            MutationOutcome::Uploaded(result) => self.upload.settle(result),
            MutationOutcome::RepoAdded(result) => {
                let succeeded = result.is_ok();
                let applied = self.add_repo.settle(result);
                if applied && succeeded {
                    self.repo_url.clear();
                }
                applied
            }
            MutationOutcome::Generated(result) => self.generate.settle(result),
        };

        if applied {
            info!(kind = kind.label(), status = ?self.status(kind), "mutation settled");
        } else {
            debug!(kind = kind.label(), "dropping outcome for slot with nothing in flight");
        }
        applied
    }
}

#[cfg(test)]
#[path = "tests/coordinator_tests.rs"]
mod tests;
