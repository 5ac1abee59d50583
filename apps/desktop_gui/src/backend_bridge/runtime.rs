//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{execute, HttpRagClient, Settings};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiEvent};

/// Starts the backend worker thread. Each mutation runs as its own task so
/// requests for different slots overlap; outcomes flow back over `ui_tx`.
pub fn launch(settings: Settings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || run_worker(settings, cmd_rx, ui_tx));
}

fn run_worker(settings: Settings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            let _ = ui_tx.try_send(UiEvent::Error(UiError::startup(format!(
                "backend worker startup failure: failed to build runtime: {err}"
            ))));
            tracing::error!("failed to build backend runtime: {err}");
            return;
        }
    };

    let client = match HttpRagClient::new(&settings) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            let _ = ui_tx.try_send(UiEvent::Error(UiError::startup(format!(
                "backend worker startup failure: failed to build http client: {err}"
            ))));
            tracing::error!("failed to build http client: {err}");
            return;
        }
    };

    tracing::info!(api_url = %client.api_url(), "backend worker ready");
    let _ = ui_tx.try_send(UiEvent::BackendReady {
        api_url: client.api_url().to_string(),
    });

    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            BackendCommand::Mutate(request) => {
                let kind = request.kind();
                tracing::info!(kind = kind.label(), "backend: mutation received");
                let client = Arc::clone(&client);
                let ui_tx = ui_tx.clone();
                runtime.spawn(async move {
                    let outcome = execute(client.as_ref(), request).await;
                    let sent =
                        tokio::task::block_in_place(|| ui_tx.send(UiEvent::Settled(outcome)));
                    if sent.is_err() {
                        tracing::debug!(kind = kind.label(), "ui closed; discarding outcome");
                    }
                });
            }
            BackendCommand::Shutdown => {
                tracing::info!("backend: shutdown requested");
                break;
            }
        }
    }

    // In-flight requests are not awaited; their outcomes have nowhere to go.
    runtime.shutdown_background();
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use client_core::{MutationOutcome, MutationRequest};
    use crossbeam_channel::bounded;
    use shared::error::ErrorCategory;

    use super::*;

    fn unreachable_settings() -> Settings {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);
        Settings::default()
            .with_overrides(Some(format!("http://{addr}")), Some(5))
            .validated()
            .expect("settings")
    }

    #[test]
    fn outcomes_survive_a_full_ui_queue() {
        let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(8);
        let (ui_tx, ui_rx) = bounded::<UiEvent>(1);
        launch(unreachable_settings(), cmd_rx, ui_tx);

        for prompt in ["one", "two", "three"] {
            cmd_tx
                .send(BackendCommand::Mutate(MutationRequest::Generate {
                    prompt: prompt.to_string(),
                }))
                .expect("send");
        }
        // Give every task time to finish while nobody drains the queue.
        std::thread::sleep(Duration::from_millis(300));

        let deadline = Instant::now() + Duration::from_secs(10);
        let mut settled = Vec::new();
        while settled.len() < 3 && Instant::now() < deadline {
            if let Ok(UiEvent::Settled(outcome)) = ui_rx.recv_timeout(Duration::from_millis(200)) {
                settled.push(outcome);
            }
        }
        cmd_tx.send(BackendCommand::Shutdown).expect("shutdown");

        assert_eq!(settled.len(), 3);
        for outcome in settled {
            match outcome {
                MutationOutcome::Generated(Err(err)) => {
                    assert_eq!(err.category(), ErrorCategory::Transport)
                }
                other => panic!("expected a failed generation, got {other:?}"),
            }
        }
    }
}
