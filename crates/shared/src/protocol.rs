use serde::{Deserialize, Serialize};

/// Name of the multipart form part carrying the uploaded document.
pub const UPLOAD_FIELD_NAME: &str = "file";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddRepoRequest {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

/// Only `generated_code` is consumed; any other fields the backend adds are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub generated_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_repo_request_uses_url_key() {
        let body = serde_json::to_value(AddRepoRequest {
            url: "https://example.com/org/repo.git".to_string(),
        })
        .expect("json");
        assert_eq!(
            body,
            serde_json::json!({ "url": "https://example.com/org/repo.git" })
        );
    }

    #[test]
    fn generate_response_ignores_unknown_fields() {
        let parsed: GenerateResponse = serde_json::from_str(
            r#"{ "generated_code": "print('hi')", "sources": ["a.py"] }"#,
        )
        .expect("parse");
        assert_eq!(parsed.generated_code, "print('hi')");
    }

    #[test]
    fn generate_response_requires_generated_code() {
        assert!(serde_json::from_str::<GenerateResponse>(r#"{ "message": "ok" }"#).is_err());
    }
}
