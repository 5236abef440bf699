use anyhow::{Context, Result};
use clap::Parser;
use config_manager::SystemConfig;
use entrypoints::Dispatcher;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "🏀 Query NBA statistics entrypoints from the command line",
    long_about = None
)]
#[command(after_help = "EXAMPLES:
    courtside --list
    courtside scoreboard '{\"date\": \"20240115\"}'
    courtside team-profile '{\"team\": \"Lakers\"}'
    courtside league-leaders '{\"stat\": \"assists\", \"limit\": 5}'

To serve the entrypoints over HTTP run: cargo run -p api_server")]
struct Args {
    /// Entrypoint to invoke, e.g. team-profile
    entrypoint: Option<String>,

    /// JSON input for the entrypoint [default: {}]
    input: Option<String>,

    /// Print the discovery document instead of invoking anything
    #[arg(short, long)]
    list: bool,

    /// Configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config =
        SystemConfig::load_from_path(&args.config).context("Failed to load configuration")?;
    let dispatcher = Dispatcher::from_config(&config).context("Failed to build dispatcher")?;

    if args.list {
        println!("{}", serde_json::to_string_pretty(&dispatcher.discovery())?);
        return Ok(());
    }

    let Some(name) = args.entrypoint else {
        anyhow::bail!(
            "no entrypoint given; choose one of: {}",
            dispatcher.names().join(", ")
        );
    };

    let input: Value = match args.input {
        Some(raw) => serde_json::from_str(&raw).context("Input is not valid JSON")?,
        None => Value::Null,
    };

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling upstream calls");
            on_interrupt.cancel();
        }
    });

    info!("Invoking {}", name);
    match dispatcher.dispatch(&name, input, &cancel).await {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(e) => {
            let body = serde_json::json!({
                "error": e.to_string(),
                "kind": e.kind(),
                "retryable": e.retryable(),
            });
            eprintln!("{}", serde_json::to_string_pretty(&body)?);
            std::process::exit(1);
        }
    }
}
