use std::{path::PathBuf, time::Duration};

use arboard::Clipboard;
use client_core::{ActionCoordinator, SlotStatus};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::MutationKind;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{failure_hint, UiError, UiEvent};
use crate::controller::orchestration::{dispatch_backend_command, submit_mutation};
use crate::ui::widgets::{
    button_label, panel_heading, selected_file_label, settled_label, success_message,
};

const SUCCESS_COLOR: egui::Color32 = egui::Color32::from_rgb(22, 163, 74);
const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 38, 38);
const PANEL_MAX_WIDTH: f32 = 520.0;

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub api_url: String,
}

pub struct DesktopGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    coordinator: ActionCoordinator,
    /// Name and size of the selected file, read once per selection.
    file_label: String,

    api_url: String,
    backend_ready: bool,
    startup_error: Option<UiError>,
    status: String,
}

impl DesktopGuiApp {
    pub fn bootstrap(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            coordinator: ActionCoordinator::new(),
            file_label: selected_file_label(None),
            api_url: startup.api_url,
            backend_ready: false,
            startup_error: None,
            status: "Waiting for backend worker".to_string(),
        }
    }

    fn submit(&mut self, kind: MutationKind) {
        submit_mutation(&mut self.coordinator, &self.cmd_tx, kind, &mut self.status);
    }

    fn choose_file(&mut self, path: PathBuf) {
        tracing::debug!(file = %path.display(), "file selected");
        self.file_label = selected_file_label(Some(&path));
        self.coordinator.select_file(Some(path));
    }

    fn any_pending(&self) -> bool {
        MutationKind::ALL
            .into_iter()
            .any(|kind| self.is_pending(kind))
    }

    fn is_pending(&self, kind: MutationKind) -> bool {
        self.coordinator.status(kind) == SlotStatus::Pending
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::BackendReady { api_url } => {
                    self.backend_ready = true;
                    self.status = format!("Backend worker ready ({api_url})");
                    self.api_url = api_url;
                }
                UiEvent::Settled(outcome) => {
                    let kind = outcome.kind();
                    let failure = outcome.error().map(|err| UiError::from_mutation(kind, err));
                    if self.coordinator.apply(outcome) {
                        self.status = match failure {
                            Some(err) => err.summary(),
                            None => format!("{} finished", kind.title()),
                        };
                    }
                }
                UiEvent::Error(err) => {
                    tracing::error!(category = ?err.category(), "{}", err.message());
                    self.status = err.summary();
                    self.startup_error = Some(err);
                }
            }
        }
    }

    fn show_slot_feedback(&self, ui: &mut egui::Ui, kind: MutationKind) {
        let status = self.coordinator.status(kind);
        if status == SlotStatus::Pending {
            ui.horizontal(|ui| {
                ui.add(egui::Spinner::new());
                ui.weak("Waiting for the backend...");
            });
            return;
        }

        if let Some(err) = self.coordinator.last_error(kind) {
            let err = UiError::from_mutation(kind, err);
            ui.colored_label(ERROR_COLOR, err.summary());
            ui.small(failure_hint(err.category()));
            return;
        }

        if status == SlotStatus::Success {
            if let Some(message) = success_message(kind) {
                ui.colored_label(SUCCESS_COLOR, message);
            }
        }
    }

    fn show_settled_time(&self, ui: &mut egui::Ui, kind: MutationKind) {
        let settled_at = match kind {
            MutationKind::Upload => self.coordinator.upload_slot().settled_at(),
            MutationKind::AddRepo => self.coordinator.add_repo_slot().settled_at(),
            MutationKind::GenerateCode => self.coordinator.generate_slot().settled_at(),
        };
        if self.is_pending(kind) {
            return;
        }
        if let Some(label) = settled_label(settled_at) {
            ui.weak(label);
        }
    }

    fn action_button(&mut self, ui: &mut egui::Ui, kind: MutationKind) {
        let label = button_label(kind, self.coordinator.status(kind));
        let enabled = self.coordinator.can_submit(kind);
        let button = egui::Button::new(label).min_size(egui::vec2(ui.available_width(), 32.0));
        if ui.add_enabled(enabled, button).clicked() {
            self.submit(kind);
        }
    }

    fn show_upload_panel(&mut self, ui: &mut egui::Ui) {
        let kind = MutationKind::Upload;
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.heading(panel_heading(kind));
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if ui.button("Choose file...").clicked() {
                    if let Some(path) = rfd::FileDialog::new().pick_file() {
                        self.choose_file(path);
                    }
                }
                ui.label(self.file_label.as_str());
            });
            ui.add_space(6.0);
            self.action_button(ui, kind);
            self.show_slot_feedback(ui, kind);
            self.show_settled_time(ui, kind);
        });
    }

    fn show_repo_panel(&mut self, ui: &mut egui::Ui) {
        let kind = MutationKind::AddRepo;
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.heading(panel_heading(kind));
            ui.add_space(6.0);
            let response = ui.add(
                egui::TextEdit::singleline(self.coordinator.repo_url_mut())
                    .hint_text("Enter Git repository URL")
                    .desired_width(f32::INFINITY),
            );
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                self.submit(kind);
            }
            ui.add_space(6.0);
            self.action_button(ui, kind);
            self.show_slot_feedback(ui, kind);
            self.show_settled_time(ui, kind);
        });
    }

    fn show_generate_panel(&mut self, ui: &mut egui::Ui) {
        let kind = MutationKind::GenerateCode;
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.heading(panel_heading(kind));
            ui.add_space(6.0);
            ui.add(
                egui::TextEdit::multiline(self.coordinator.prompt_mut())
                    .hint_text("Enter your prompt here...")
                    .desired_rows(6)
                    .desired_width(f32::INFINITY),
            );
            ui.add_space(6.0);
            self.action_button(ui, kind);
            self.show_slot_feedback(ui, kind);

            let code = self.coordinator.generated_code().map(str::to_owned);
            if let Some(code) = code {
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    ui.strong("Generated Code:");
                    if ui.small_button("Copy").clicked() {
                        self.copy_to_clipboard(&code);
                    }
                });
                egui::Frame::canvas(ui.style()).show(ui, |ui| {
                    egui::ScrollArea::horizontal()
                        .id_salt("generated_code")
                        .show(ui, |ui| {
                            ui.label(egui::RichText::new(code.as_str()).monospace());
                        });
                });
            }
            self.show_settled_time(ui, kind);
        });
    }

    fn copy_to_clipboard(&mut self, text: &str) {
        let result = Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text.to_owned()));
        self.status = match result {
            Ok(()) => "Copied generated code to clipboard".to_string(),
            Err(err) => {
                tracing::warn!("clipboard unavailable: {err}");
                format!("Could not copy to clipboard: {err}")
            }
        };
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let (color, marker) = if self.startup_error.is_some() {
                    (ERROR_COLOR, "offline")
                } else if self.backend_ready {
                    (SUCCESS_COLOR, "ready")
                } else {
                    (ui.visuals().weak_text_color(), "starting")
                };
                ui.colored_label(color, marker);
                ui.separator();
                ui.label(self.api_url.as_str());
                ui.separator();
                ui.label(self.status.as_str());
            });
        });
    }
}

impl eframe::App for DesktopGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.show_status_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.set_max_width(PANEL_MAX_WIDTH);
                    ui.add_space(12.0);
                    ui.heading("Ollama RAG App");
                    ui.add_space(12.0);
                    self.show_upload_panel(ui);
                    ui.add_space(12.0);
                    self.show_repo_panel(ui);
                    ui.add_space(12.0);
                    self.show_generate_panel(ui);
                });
            });
        });

        if self.any_pending() {
            ctx.request_repaint_after(Duration::from_millis(50));
        } else {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}

impl Drop for DesktopGuiApp {
    fn drop(&mut self) {
        if let Err(reason) = dispatch_backend_command(&self.cmd_tx, BackendCommand::Shutdown) {
            tracing::debug!("backend already gone at shutdown: {reason}");
        }
    }
}

#[cfg(test)]
mod tests {
    use client_core::{MutationOutcome, MutationRequest};
    use crossbeam_channel::bounded;
    use shared::error::MutationError;

    use super::*;

    fn test_app() -> (DesktopGuiApp, Receiver<BackendCommand>, Sender<UiEvent>) {
        let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
        let (ui_tx, ui_rx) = bounded::<UiEvent>(16);
        let app = DesktopGuiApp::bootstrap(
            cmd_tx,
            ui_rx,
            StartupConfig {
                api_url: "http://localhost:8000".to_string(),
            },
        );
        (app, cmd_rx, ui_tx)
    }

    fn next_request(cmd_rx: &Receiver<BackendCommand>) -> MutationRequest {
        match cmd_rx.try_recv().expect("queued command") {
            BackendCommand::Mutate(request) => request,
            BackendCommand::Shutdown => panic!("unexpected shutdown"),
        }
    }

    #[test]
    fn successful_add_repo_resets_url_field() {
        let (mut app, cmd_rx, ui_tx) = test_app();
        app.coordinator.set_repo_url("https://github.com/org/repo");

        app.submit(MutationKind::AddRepo);
        app.submit(MutationKind::AddRepo);
        assert_eq!(
            next_request(&cmd_rx),
            MutationRequest::AddRepo {
                url: "https://github.com/org/repo".to_string()
            }
        );
        assert!(cmd_rx.is_empty());

        ui_tx
            .send(UiEvent::Settled(MutationOutcome::RepoAdded(Ok(()))))
            .expect("send");
        app.process_ui_events();

        assert_eq!(app.coordinator.repo_url(), "");
        assert_eq!(app.status, "Add repository finished");
    }

    #[test]
    fn generated_code_is_shown_verbatim() {
        let (mut app, cmd_rx, ui_tx) = test_app();
        app.coordinator.set_prompt("say hi");
        app.submit(MutationKind::GenerateCode);
        next_request(&cmd_rx);

        ui_tx
            .send(UiEvent::Settled(MutationOutcome::Generated(Ok(
                "print('hi')".to_string()
            ))))
            .expect("send");
        app.process_ui_events();

        assert_eq!(app.coordinator.generated_code(), Some("print('hi')"));
        assert_eq!(app.coordinator.prompt(), "say hi");
    }

    #[test]
    fn failed_upload_reports_error_in_status() {
        let (mut app, cmd_rx, ui_tx) = test_app();
        app.coordinator.select_file(Some(PathBuf::from("notes.pdf")));
        app.submit(MutationKind::Upload);
        next_request(&cmd_rx);
        assert!(app.any_pending());

        ui_tx
            .send(UiEvent::Settled(MutationOutcome::Uploaded(Err(
                MutationError::transport("connection refused"),
            ))))
            .expect("send");
        app.process_ui_events();

        assert_eq!(app.coordinator.status(MutationKind::Upload), SlotStatus::Error);
        assert!(!app.coordinator.upload_slot().is_success());
        assert!(app.status.starts_with("Upload failed (Network)"));
        assert!(!app.any_pending());
    }

    #[test]
    fn backend_events_update_connection_state() {
        let (mut app, _cmd_rx, ui_tx) = test_app();
        ui_tx
            .send(UiEvent::BackendReady {
                api_url: "http://rag.internal:9000".to_string(),
            })
            .expect("send");
        app.process_ui_events();
        assert!(app.backend_ready);
        assert_eq!(app.api_url, "http://rag.internal:9000");

        ui_tx
            .send(UiEvent::Error(UiError::startup("failed to build runtime")))
            .expect("send");
        app.process_ui_events();
        assert!(app.startup_error.is_some());
        assert_eq!(app.status, "Startup error: failed to build runtime");
    }

    #[test]
    fn file_label_is_read_once_per_selection() {
        let (mut app, _cmd_rx, _ui_tx) = test_app();
        assert_eq!(app.file_label, "No file selected");

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").expect("write");
        app.choose_file(path.clone());
        assert_eq!(app.file_label, "notes.txt (5 B)");
        assert_eq!(app.coordinator.selected_file(), Some(path.as_path()));

        std::fs::write(&path, vec![0u8; 2048]).expect("rewrite");
        assert_eq!(app.file_label, "notes.txt (5 B)");
    }

    #[test]
    fn dropping_app_asks_backend_to_stop() {
        let (app, cmd_rx, _ui_tx) = test_app();
        drop(app);
        assert!(matches!(cmd_rx.try_recv(), Ok(BackendCommand::Shutdown)));
    }
}
