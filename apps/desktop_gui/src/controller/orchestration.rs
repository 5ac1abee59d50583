//! Command orchestration helpers from UI actions to backend command queue.

use client_core::{ActionCoordinator, MutationOutcome, MutationRequest};
use crossbeam_channel::{Sender, TrySendError};
use shared::{domain::MutationKind, error::MutationError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), String> {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => Err("UI command queue is full; please retry".to_string()),
        Err(TrySendError::Disconnected(_)) => Err(
            "Backend command processor disconnected (possible startup/runtime failure)"
                .to_string(),
        ),
    }
}

/// Submits one mutation. Returns `false` when the submission was skipped
/// (missing input or a request already in flight). A request that cannot be
/// queued settles its slot as a transport failure so the control re-enables.
pub fn submit_mutation(
    coordinator: &mut ActionCoordinator,
    cmd_tx: &Sender<BackendCommand>,
    kind: MutationKind,
    status: &mut String,
) -> bool {
    let Some(request) = coordinator.submit(kind) else {
        return false;
    };

    let description = describe_request(&request);
    match dispatch_backend_command(cmd_tx, BackendCommand::Mutate(request)) {
        Ok(()) => *status = format!("Sent {description}"),
        Err(reason) => {
            tracing::error!(kind = kind.label(), "failed to queue mutation: {reason}");
            coordinator.apply(failed_outcome(kind, MutationError::transport(reason.clone())));
            *status = reason;
        }
    }
    true
}

fn failed_outcome(kind: MutationKind, err: MutationError) -> MutationOutcome {
    match kind {
        MutationKind::Upload => MutationOutcome::Uploaded(Err(err)),
        MutationKind::AddRepo => MutationOutcome::RepoAdded(Err(err)),
        MutationKind::GenerateCode => MutationOutcome::Generated(Err(err)),
    }
}

pub fn describe_request(request: &MutationRequest) -> String {
    match request {
        MutationRequest::Upload { file } => format!("upload of {}", file.display()),
        MutationRequest::AddRepo { url } => format!("repository {url}"),
        MutationRequest::Generate { prompt } => {
            format!("prompt ({} chars)", prompt.chars().count())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use client_core::SlotStatus;
    use crossbeam_channel::bounded;

    use super::*;

    #[test]
    fn queues_one_command_per_submission() {
        let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(8);
        let mut coordinator = ActionCoordinator::new();
        let mut status = String::new();
        coordinator.set_prompt("hello");

        assert!(submit_mutation(
            &mut coordinator,
            &cmd_tx,
            MutationKind::GenerateCode,
            &mut status
        ));
        assert!(!submit_mutation(
            &mut coordinator,
            &cmd_tx,
            MutationKind::GenerateCode,
            &mut status
        ));

        assert_eq!(cmd_rx.len(), 1);
        assert_eq!(status, "Sent prompt (5 chars)");
        match cmd_rx.try_recv().expect("command") {
            BackendCommand::Mutate(request) => assert_eq!(
                request,
                MutationRequest::Generate {
                    prompt: "hello".to_string()
                }
            ),
            BackendCommand::Shutdown => panic!("unexpected shutdown"),
        }
    }

    #[test]
    fn missing_input_queues_nothing() {
        let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(8);
        let mut coordinator = ActionCoordinator::new();
        let mut status = String::new();

        for kind in MutationKind::ALL {
            assert!(!submit_mutation(&mut coordinator, &cmd_tx, kind, &mut status));
        }
        assert!(cmd_rx.is_empty());
    }

    #[test]
    fn disconnected_backend_settles_slot_as_error() {
        let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(8);
        drop(cmd_rx);
        let mut coordinator = ActionCoordinator::new();
        let mut status = String::new();
        coordinator.select_file(Some(PathBuf::from("a.pdf")));

        assert!(submit_mutation(
            &mut coordinator,
            &cmd_tx,
            MutationKind::Upload,
            &mut status
        ));

        assert_eq!(coordinator.status(MutationKind::Upload), SlotStatus::Error);
        assert!(status.contains("disconnected"));
    }

    #[test]
    fn describes_requests_without_prompt_text() {
        let described = describe_request(&MutationRequest::Generate {
            prompt: "secret plans".to_string(),
        });
        assert_eq!(described, "prompt (12 chars)");
    }
}
