//! Backend commands queued from UI to backend worker.

use client_core::MutationRequest;

pub enum BackendCommand {
    Mutate(MutationRequest),
    Shutdown,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Mutate(request) => request.kind().label(),
            BackendCommand::Shutdown => "shutdown",
        }
    }
}
