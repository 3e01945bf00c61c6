use anyhow::Context;
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use scriptorium::cli::{
    init::{self, InitConfig, InitResult},
    output::Output,
    Cli, Commands,
};
use scriptorium::db::{FeedbackStore, InMemoryVectorStore};
use scriptorium::llm::AzureChatClient;
use scriptorium::rag::{AzureEmbedder, DocumentIndex};
use scriptorium::utils::toml_config::{ScriptoriumConfig, ScriptoriumConfigManager};
use scriptorium::AppState;
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

/// Maximum accepted upload size (64 MiB).
const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present; environment variables carry the API keys
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match cli.command {
        Some(Commands::Init {
            path,
            force,
            host,
            port,
        }) => {
            let result = init::run(
                InitConfig {
                    path,
                    force,
                    host,
                    port,
                },
                &output,
            );
            match result {
                InitResult::Success => Ok(()),
                InitResult::AlreadyExists => std::process::exit(1),
                InitResult::Error(msg) => {
                    output.error(&msg);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Config { full, validate }) => {
            show_config(&cli.config, full, validate, &output)
        }
        None => serve(&cli.config, cli.verbose).await,
    }
}

/// Handle the `config` subcommand.
fn show_config(path: &Path, full: bool, validate: bool, output: &Output) -> anyhow::Result<()> {
    let config = match ScriptoriumConfig::load(path) {
        Ok(config) => config,
        Err(e) => {
            output.error(&format!("Configuration error: {}", e));
            std::process::exit(1);
        }
    };

    if validate {
        output.success(&format!("{} is valid", path.display()));
        return Ok(());
    }

    output.header("Configuration");
    output.kv("file", &path.display().to_string());
    output.kv(
        "server",
        &format!("{}:{}", config.server.host, config.server.port),
    );
    output.kv("chat deployment", &config.chat.azure_deployment);
    output.kv("embedding deployment", &config.embedding.azure_deployment);

    if full {
        output.kv("log level", &config.server.log_level);
        output.kv("chat endpoint", &config.chat.azure_endpoint);
        output.kv("embedding endpoint", &config.embedding.azure_endpoint);
        output.kv("feedback db", &config.database.feedback_path);
        output.kv("chunk size", &config.rag.chunk_size.to_string());
        output.kv("chunk overlap", &config.rag.chunk_overlap.to_string());
        output.kv("default top_k", &config.rag.default_top_k.to_string());
        output.kv("max top_k", &config.rag.max_top_k.to_string());
        output.kv(
            "metadata synthesis",
            &config.rag.synthesize_metadata.to_string(),
        );
        let snapshot = if config.rag.snapshot_path.is_empty() {
            "(in-memory only)".to_string()
        } else {
            config.rag.snapshot_path.clone()
        };
        output.kv("index snapshot", &snapshot);
    }

    output.newline();
    Ok(())
}

/// Tracing directives for the configured level; `--verbose` forces debug.
fn log_directives(config_level: &str, verbose: bool) -> String {
    let level = if verbose { "debug" } else { config_level };
    format!("{level},scriptorium={level}")
}

/// Start the HTTP server.
async fn serve(config_path: &Path, verbose: bool) -> anyhow::Result<()> {
    let mut config_manager = ScriptoriumConfigManager::new(config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;
    let config = config_manager.config();

    // Initialize tracing; RUST_LOG overrides the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_directives(&config.server.log_level, verbose)));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path.display(),
        "Starting Scriptorium"
    );

    config_manager
        .start_watching()
        .context("Failed to start configuration watcher")?;

    // Vector store, optionally persisted between restarts
    let store = if config.rag.snapshot_path.is_empty() {
        InMemoryVectorStore::new()
    } else {
        InMemoryVectorStore::with_snapshot(&config.rag.snapshot_path)
            .context("Failed to restore the index snapshot")?
    };

    let embedder = AzureEmbedder::from_config(&config.embedding)
        .context("Failed to build the embedding client")?;
    let chat = AzureChatClient::from_config(&config.chat).context("Failed to build the chat client")?;

    let index = Arc::new(DocumentIndex::new(
        Arc::new(store),
        Arc::new(embedder),
        Arc::new(chat),
    ));

    let feedback = Arc::new(
        FeedbackStore::new(&config.database.feedback_path)
            .await
            .context("Failed to open the feedback database")?,
    );

    let state = AppState {
        config_manager: Arc::new(config_manager),
        index,
        feedback,
    };

    let app = Router::new()
        .route("/health", get(scriptorium::api::handlers::health::health))
        .nest("/api", scriptorium::api::create_router())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(addr = %addr, "Listening");

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::log_directives;

    #[test]
    fn test_log_directives_follow_config_level() {
        assert_eq!(log_directives("warn", false), "warn,scriptorium=warn");
    }

    #[test]
    fn test_verbose_flag_forces_debug() {
        assert_eq!(log_directives("warn", true), "debug,scriptorium=debug");
    }
}
