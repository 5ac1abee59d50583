//! Text and formatting helpers for the three action panels.

use std::path::Path;

use chrono::{DateTime, Local, Utc};
use client_core::SlotStatus;
use shared::domain::MutationKind;

pub fn panel_heading(kind: MutationKind) -> &'static str {
    match kind {
        MutationKind::Upload => "Upload Document",
        MutationKind::AddRepo => "Add Git Repository",
        MutationKind::GenerateCode => "Generate Code",
    }
}

pub fn button_label(kind: MutationKind, status: SlotStatus) -> &'static str {
    let pending = status == SlotStatus::Pending;
    match (kind, pending) {
        (MutationKind::Upload, true) => "Uploading...",
        (MutationKind::Upload, false) => "Upload",
        (MutationKind::AddRepo, true) => "Adding...",
        (MutationKind::AddRepo, false) => "Add Repository",
        (MutationKind::GenerateCode, true) => "Generating...",
        (MutationKind::GenerateCode, false) => "Generate Code",
    }
}

/// Confirmation line for a `Success` slot. Code generation shows its output instead.
pub fn success_message(kind: MutationKind) -> Option<&'static str> {
    match kind {
        MutationKind::Upload => Some("File uploaded successfully!"),
        MutationKind::AddRepo => Some("Repository added successfully!"),
        MutationKind::GenerateCode => None,
    }
}

pub fn settled_label(settled_at: Option<DateTime<Utc>>) -> Option<String> {
    settled_at.map(|at| {
        at.with_timezone(&Local)
            .format("finished at %H:%M:%S")
            .to_string()
    })
}

/// Touches the filesystem; call once per selection, not per frame.
pub fn selected_file_label(path: Option<&Path>) -> String {
    let Some(path) = path else {
        return "No file selected".to_string();
    };
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    match std::fs::metadata(path) {
        Ok(meta) => format!("{name} ({})", human_readable_bytes(meta.len())),
        Err(_) => name,
    }
}

pub fn human_readable_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes < KB {
        return format!("{bytes} B");
    }
    if bytes < MB {
        return format_scaled_unit(bytes, KB, "KB");
    }
    if bytes < GB {
        return format_scaled_unit(bytes, MB, "MB");
    }
    format_scaled_unit(bytes, GB, "GB")
}

fn format_scaled_unit(bytes: u64, unit_size: u64, unit_label: &str) -> String {
    let value = bytes as f64 / unit_size as f64;
    let value_text = format!("{value:.1}");
    let compact_value = value_text.strip_suffix(".0").unwrap_or(&value_text);
    format!("{compact_value} {unit_label}")
}
