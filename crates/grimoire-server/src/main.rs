//! Grimoire — entry point.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use serde::Serialize;
use serde_json::Value;

use grimoire::{Attempt, ReferenceFetcher};
use grimoire_server::{resolve_addr, resolve_fetcher_config, AppState};

#[derive(Parser)]
#[command(
    name = "grimoire",
    about = "Grimoire — D&D 5e reference proxy that always answers",
    version,
    after_help = "Run 'grimoire <command> --help' for details on each command.\nRun 'grimoire' with no command to start the HTTP server."
)]
struct Cli {
    /// Upstream base URL, tried in the order given. Can be repeated.
    /// Overrides GRIMOIRE_UPSTREAMS.
    #[arg(long = "upstream", global = true)]
    upstreams: Vec<String>,

    /// Per-upstream timeout in milliseconds. Overrides GRIMOIRE_TIMEOUT_MS.
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default).
    Serve {
        /// Listen address (host:port). Falls back to GRIMOIRE_ADDR, then 127.0.0.1:3000.
        #[arg(long)]
        addr: Option<String>,
    },
    /// Resolve one endpoint and print the JSON payload.
    Fetch {
        /// Endpoint name (e.g. "classes", "spells/fireball").
        endpoint: String,

        /// Print `{source, attempts, payload}` instead of the bare payload.
        #[arg(long)]
        report: bool,
    },
    /// Print the effective upstream list and timeout.
    Upstreams,
    /// Generate shell completion scripts.
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

/// Machine-readable result of `grimoire fetch --report`.
#[derive(Serialize)]
struct FetchReport<'a> {
    source: &'a str,
    attempts: &'a [Attempt],
    payload: &'a Value,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let config = resolve_fetcher_config(cli.upstreams, cli.timeout_ms);

    match cli.command.unwrap_or(Commands::Serve { addr: None }) {
        Commands::Serve { addr } => {
            let fetcher = ReferenceFetcher::new(&config).context("invalid upstream configuration")?;
            let addr = resolve_addr(addr.as_deref());
            tracing::info!("Grimoire v{}", env!("CARGO_PKG_VERSION"));
            for (i, upstream) in fetcher.upstreams().iter().enumerate() {
                tracing::info!("upstream {}: {upstream}", i + 1);
            }
            grimoire_server::serve(&addr, AppState::new(fetcher)).await?;
        }

        Commands::Fetch { endpoint, report } => {
            let fetcher = ReferenceFetcher::new(&config).context("invalid upstream configuration")?;
            let outcome = fetcher
                .fetch(Some(endpoint.as_str()))
                .await
                .with_context(|| format!("cannot fetch '{endpoint}'"))?;

            for attempt in outcome.attempts() {
                eprintln!(
                    "  {} -> {} ({} ms)",
                    attempt.url, attempt.result, attempt.elapsed_ms
                );
            }
            eprintln!("  source: {}", outcome.source());

            let output = if report {
                serde_json::to_string_pretty(&FetchReport {
                    source: outcome.source(),
                    attempts: outcome.attempts(),
                    payload: outcome.payload(),
                })?
            } else {
                serde_json::to_string_pretty(outcome.payload())?
            };
            println!("{output}");
        }

        Commands::Upstreams => {
            let upstreams = config.validate().context("invalid upstream configuration")?;
            let info = serde_json::json!({
                "upstreams": upstreams,
                "timeout_ms": config.timeout_ms,
                "user_agent": config.user_agent,
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "grimoire", &mut std::io::stdout());
        }
    }

    Ok(())
}
