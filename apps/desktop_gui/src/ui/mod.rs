//! UI layer for desktop GUI: app shell and small display helpers.

pub mod app;
pub mod widgets;

pub use app::{DesktopGuiApp, StartupConfig};
