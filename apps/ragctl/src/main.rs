use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{execute, ActionCoordinator, HttpRagClient, RagApi};
use shared::domain::MutationKind;
use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset. Logs go to stderr; stdout holds command output.
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Parser, Debug)]
#[command(about = "Send documents, repositories and prompts to the RAG backend")]
struct Cli {
    /// Base URL of the RAG backend (overrides ragdesk.toml and RAG_API_URL).
    #[arg(long)]
    api_url: Option<String>,
    /// Per-request timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a document into the knowledge base.
    Upload { file: PathBuf },
    /// Register a git repository for ingestion.
    AddRepo { url: String },
    /// Generate code from a prompt.
    Generate { prompt: String },
}

impl Command {
    /// Binds the argument to the matching input buffer and returns the slot to submit.
    fn load_into(self, coordinator: &mut ActionCoordinator) -> MutationKind {
        match self {
            Command::Upload { file } => {
                coordinator.select_file(Some(file));
                MutationKind::Upload
            }
            Command::AddRepo { url } => {
                coordinator.set_repo_url(url);
                MutationKind::AddRepo
            }
            Command::Generate { prompt } => {
                coordinator.set_prompt(prompt);
                MutationKind::GenerateCode
            }
        }
    }
}

async fn run_command(api: &dyn RagApi, command: Command) -> Result<String> {
    let mut coordinator = ActionCoordinator::new();
    let kind = command.load_into(&mut coordinator);

    let Some(request) = coordinator.submit(kind) else {
        bail!("nothing to submit: {} needs a non-empty input", kind.label());
    };
    let outcome = execute(api, request).await;
    coordinator.apply(outcome);

    if let Some(err) = coordinator.last_error(kind) {
        bail!("{} failed: {err}", kind.title());
    }

    let output = match kind {
        MutationKind::Upload => "File uploaded successfully!".to_string(),
        MutationKind::AddRepo => "Repository added successfully!".to_string(),
        MutationKind::GenerateCode => coordinator
            .generated_code()
            .unwrap_or_default()
            .to_string(),
    };
    Ok(output)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let settings = client_core::load_settings()
        .context("failed to load settings")?
        .with_overrides(cli.api_url, cli.timeout_secs)
        .validated()
        .context("invalid command-line settings")?;
    tracing::debug!(
        api_url = %settings.api_url,
        timeout_secs = settings.request_timeout_secs,
        "resolved settings"
    );
    let client = HttpRagClient::new(&settings).context("failed to build http client")?;

    let output = run_command(&client, cli.command).await?;
    println!("{output}");
    Ok(())
}
