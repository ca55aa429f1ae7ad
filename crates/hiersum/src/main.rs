use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use hiersum_common::{logger, AppConfig};
use hiersum_llm::{OllamaClient, Summarizer};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root
fn load_dotenv_from_project_root() {
    if let Some(root) = find_project_root() {
        let env_path = root.join(".env");
        if env_path.exists() {
            dotenv::from_path(&env_path).ok();
        }
    } else {
        dotenv::dotenv().ok();
    }
}

#[derive(Parser)]
#[command(name = "hiersum")]
#[command(about = "hiersum - hierarchical text summarization over Ollama", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Overrides shared by every command
#[derive(Args, Default)]
struct BackendArgs {
    /// Ollama base URL
    #[arg(long)]
    ollama_url: Option<String>,

    /// Model name
    #[arg(long)]
    model: Option<String>,

    /// Maximum characters per chunk
    #[arg(long)]
    max_chunk_chars: Option<usize>,

    /// Per-call backend timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

impl BackendArgs {
    fn apply(self, config: &mut AppConfig) {
        if let Some(url) = self.ollama_url {
            config.ollama_base_url = url;
        }
        if let Some(model) = self.model {
            config.llm_model = model;
        }
        if let Some(max) = self.max_chunk_chars {
            config.max_chunk_chars = max;
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = timeout;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,

        #[command(flatten)]
        backend: BackendArgs,
    },

    /// Summarize a file (or stdin) and print the result as JSON
    Summarize {
        /// Input file; reads stdin when omitted
        file: Option<PathBuf>,

        #[command(flatten)]
        backend: BackendArgs,
    },
}

/// Load configuration, apply CLI overrides, validate again
fn load_config(backend: BackendArgs) -> Result<AppConfig> {
    let mut config = AppConfig::from_env()?;
    backend.apply(&mut config);
    config.validate()?;
    Ok(config)
}

async fn serve(config: AppConfig) -> Result<()> {
    logger::setup_logging(&config.log_dir, &config.log_level)?;

    tracing::info!("hiersum starting...");
    tracing::info!("Configuration loaded:");
    tracing::info!("  Backend: {}", config.ollama_base_url);
    tracing::info!("  Model: {}", config.llm_model);
    tracing::info!("  Timeout: {}s", config.request_timeout_secs);
    tracing::info!("  Max chunk: {} chars", config.max_chunk_chars);

    println!("Server listening on http://{}", config.server_bind_address());

    hiersum_server::start_server(config).await?;
    Ok(())
}

async fn summarize(config: AppConfig, file: Option<PathBuf>) -> Result<()> {
    logger::setup_console_logging(&config.log_level)?;

    let text = match &file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    if text.trim().is_empty() {
        anyhow::bail!("no text provided");
    }

    let client = OllamaClient::new(config.ollama_base_url.clone(), config.request_timeout())?;
    let summarizer = Summarizer::from_config(Arc::new(client), &config);
    let outcome = summarizer.summarize(&text).await?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    load_dotenv_from_project_root();

    match cli.command {
        Some(Commands::Serve { host, port, backend }) => {
            let mut config = load_config(backend)?;
            if let Some(host) = host {
                config.server_host = host;
            }
            if let Some(port) = port {
                config.server_port = port;
            }
            config.validate()?;
            serve(config).await
        }
        Some(Commands::Summarize { file, backend }) => {
            let config = load_config(backend)?;
            summarize(config, file).await
        }
        None => {
            // Default: start server with environment configuration
            let config = load_config(BackendArgs::default())?;
            serve(config).await
        }
    }
}
