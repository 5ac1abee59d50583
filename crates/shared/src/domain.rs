use serde::{Deserialize, Serialize};

/// The three user-triggered mutations the backend accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    Upload,
    AddRepo,
    GenerateCode,
}

impl MutationKind {
    pub const ALL: [MutationKind; 3] = [Self::Upload, Self::AddRepo, Self::GenerateCode];

    /// Path of the backend endpoint, relative to the API base URL.
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Upload => "/upload",
            Self::AddRepo => "/add_repo",
            Self::GenerateCode => "/generate",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::AddRepo => "add_repo",
            Self::GenerateCode => "generate_code",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Upload => "Upload",
            Self::AddRepo => "Add repository",
            Self::GenerateCode => "Code generation",
        }
    }
}
