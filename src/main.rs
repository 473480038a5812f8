//! Pathwise reference server and tooling.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──▶ http::request ──▶ app::App
//!                     (axum, layers)   (RequestFacts)     │
//!                                                         ▼
//!                                              routing::Dispatcher
//!                                              (first match wins)
//!                                                         │
//!     Client Response                                     ▼
//!     ◀────────────── handler(&Context) / fallback / 404 "404 Error"
//! ```

use std::path::PathBuf;

use axum::http::Method;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use pathwise::config::{load_config, AppConfig};
use pathwise::observability::{logging, metrics};
use pathwise::{site, HttpServer, RequestFacts, Shutdown};

#[derive(Parser)]
#[command(name = "pathwise")]
#[command(about = "Regex-routed front controller and reference site", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the reference site (default)
    Serve,
    /// Validate the configuration and print it
    Check,
    /// Show which route a request path dispatches to
    Resolve {
        /// Request path, optionally with a query string
        path: String,

        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Query string to append to PATH (without the leading `?`)
        #[arg(short, long)]
        query: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Check => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Commands::Resolve {
            path,
            method,
            query,
        } => {
            let method: Method = method.to_uppercase().parse()?;
            let app = site::build(config)?;
            let uri = request_uri(path, query.as_deref());
            let facts = RequestFacts::new(method, &uri, Vec::<(String, String)>::new());
            let resolution = app.resolve(facts);
            println!("{}", serde_json::to_string_pretty(&resolution)?);
            Ok(())
        }
    }
}

/// Join a path and an optional query string into a path-and-query.
fn request_uri(path: String, query: Option<&str>) -> String {
    match query.map(|q| q.trim_start_matches('?')) {
        Some(query) if !query.is_empty() => format!("{}?{}", path, query),
        _ => path,
    }
}

async fn serve(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging(&config.observability);

    tracing::info!(
        app = %config.app.name,
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        cache_dir = %config.cache.dir,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(site::build(config)?);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_query_option() {
        let cli = Cli::try_parse_from(["pathwise", "resolve", "/user/bob/", "--query", "tab=posts"])
            .unwrap();
        let Some(Commands::Resolve { path, query, .. }) = cli.command else {
            panic!("expected resolve subcommand");
        };

        assert_eq!(request_uri(path, query.as_deref()), "/user/bob/?tab=posts");
        assert_eq!(request_uri("/a".into(), Some("?x=1")), "/a?x=1");
        assert_eq!(request_uri("/a?x=1".into(), None), "/a?x=1");
        assert_eq!(request_uri("/a".into(), Some("")), "/a");
    }
}
