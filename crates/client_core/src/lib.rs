use std::path::Path;

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use shared::{
    domain::MutationKind,
    error::MutationError,
    protocol::{AddRepoRequest, GenerateRequest, GenerateResponse, UPLOAD_FIELD_NAME},
};
use tracing::{error, info};

pub mod config;
pub mod coordinator;
pub mod slot;

pub use config::{load_settings, load_settings_from, Settings, SettingsError};
pub use coordinator::{ActionCoordinator, MutationOutcome, MutationRequest};
pub use slot::{MutationSlot, SlotStatus};

/// Longest server error body carried into a `MutationError`.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// The three backend operations. Implemented over HTTP by [`HttpRagClient`];
/// tests substitute in-memory stubs.
#[async_trait]
pub trait RagApi: Send + Sync {
    async fn upload(&self, file: &Path) -> Result<(), MutationError>;
    async fn add_repo(&self, url: &str) -> Result<(), MutationError>;
    async fn generate(&self, prompt: &str) -> Result<String, MutationError>;
}

pub struct HttpRagClient {
    http: Client,
    api_url: String,
}

impl HttpRagClient {
    pub fn new(settings: &Settings) -> reqwest::Result<Self> {
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self {
            http,
            api_url: settings.api_url.clone(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn endpoint(&self, kind: MutationKind) -> String {
        format!("{}{}", self.api_url, kind.endpoint())
    }
}

#[async_trait]
impl RagApi for HttpRagClient {
    async fn upload(&self, file: &Path) -> Result<(), MutationError> {
        let path_text = file.display().to_string();
        let bytes = tokio::fs::read(file)
            .await
            .map_err(|err| MutationError::local_file(&path_text, err.to_string()))?;
        let filename = file
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload.bin")
            .to_string();
        let mime_type = mime_guess::from_path(file).first_or_octet_stream();

        let part = Part::bytes(bytes)
            .file_name(filename)
            .mime_str(mime_type.essence_str())
            .map_err(|err| MutationError::local_file(&path_text, err.to_string()))?;
        let form = Form::new().part(UPLOAD_FIELD_NAME, part);

        let response = self
            .http
            .post(self.endpoint(MutationKind::Upload))
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn add_repo(&self, url: &str) -> Result<(), MutationError> {
        let response = self
            .http
            .post(self.endpoint(MutationKind::AddRepo))
            .json(&AddRepoRequest {
                url: url.to_string(),
            })
            .send()
            .await
            .map_err(transport_error)?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn generate(&self, prompt: &str) -> Result<String, MutationError> {
        let response = self
            .http
            .post(self.endpoint(MutationKind::GenerateCode))
            .json(&GenerateRequest {
                prompt: prompt.to_string(),
            })
            .send()
            .await
            .map_err(transport_error)?;
        let body = ensure_success(response)
            .await?
            .bytes()
            .await
            .map_err(transport_error)?;
        let parsed: GenerateResponse = serde_json::from_slice(&body)
            .map_err(|err| MutationError::decode(format!("invalid generate response: {err}")))?;
        Ok(parsed.generated_code)
    }
}

fn transport_error(err: reqwest::Error) -> MutationError {
    if err.is_timeout() {
        MutationError::transport(format!("request timed out: {err}"))
    } else {
        MutationError::transport(err.to_string())
    }
}

async fn ensure_success(response: Response) -> Result<Response, MutationError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let body = body.trim();
    let message = if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.chars().take(MAX_ERROR_BODY_CHARS).collect()
    };
    Err(MutationError::server(status.as_u16(), message))
}

/// Runs one request against the backend and packages the result for
/// [`ActionCoordinator::apply`]. Never retries.
pub async fn execute(api: &dyn RagApi, request: MutationRequest) -> MutationOutcome {
    let kind = request.kind();
    info!(kind = kind.label(), "sending request");
    let outcome = match request {
        MutationRequest::Upload { file } => MutationOutcome::Uploaded(api.upload(&file).await),
        MutationRequest::AddRepo { url } => MutationOutcome::RepoAdded(api.add_repo(&url).await),
        MutationRequest::Generate { prompt } => {
            MutationOutcome::Generated(api.generate(&prompt).await)
        }
    };
    if let Some(err) = outcome.error() {
        error!(kind = kind.label(), category = ?err.category(), "request failed: {err}");
    } else {
        info!(kind = kind.label(), "request succeeded");
    }
    outcome
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
