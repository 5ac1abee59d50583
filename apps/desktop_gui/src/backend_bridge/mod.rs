//! Bridge between the UI thread and the backend worker running the tokio runtime.

pub mod commands;
pub mod runtime;
