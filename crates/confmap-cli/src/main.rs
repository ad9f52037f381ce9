mod commands;
mod config;

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use confmap::{CancellationToken, Provider, ProviderRegistry, scheme_of};
use confmap_http::{CA_FILE_ENV, HTTP_SCHEME, HTTPS_SCHEME, HttpProvider, HttpsProvider};
use confmap_s3::{S3_SCHEME, S3Provider};
use tracing_subscriber::EnvFilter;

use crate::commands::format::Format;
use crate::config::{AppConfig, Overrides};

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "CONFMAP_LOG";

#[derive(Parser)]
#[command(name = "confmap-fetch")]
#[command(about = "Retrieve configuration documents from http, https and s3 URIs")]
struct Cli {
    /// Provider settings file (defaults to ~/.config/confmap/providers.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Extra CA certificate (PEM) trusted for https URIs
    #[arg(long, global = true, env = CA_FILE_ENV)]
    ca_file: Option<PathBuf>,

    /// Trust only platform roots when no CA file is configured
    #[arg(long, global = true)]
    allow_missing_ca: bool,

    /// Total timeout for each http/https request
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug); CONFMAP_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Retrieve and print one or more configuration URIs
    Retrieve {
        /// URIs to retrieve, e.g. https://host/config.yaml
        #[arg(required = true)]
        uris: Vec<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
    },
    /// List supported URI schemes
    Schemes,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut app_config = match &cli.config {
        Some(path) => config::load_from(path)?,
        None => config::load_default(),
    };
    app_config.apply(Overrides {
        ca_file: cli.ca_file.clone(),
        allow_missing_ca: cli.allow_missing_ca,
        timeout_secs: cli.timeout_secs,
    });
    Ok(app_config)
}

/// The distinct schemes named by `uris`, rejecting any this binary lacks.
fn requested_schemes(uris: &[String]) -> Result<BTreeSet<&str>> {
    uris.iter()
        .map(|uri| {
            let scheme = scheme_of(uri).with_context(|| format!("{uri:?} has no scheme"))?;
            if !commands::schemes::is_supported(scheme) {
                anyhow::bail!("no provider for scheme {scheme:?} in {uri:?} (see `confmap-fetch schemes`)");
            }
            Ok(scheme)
        })
        .collect()
}

/// Build providers only for the schemes in use, so a missing CA file does
/// not block plain http or s3 retrievals.
async fn build_registry(app_config: &AppConfig, schemes: &BTreeSet<&str>) -> Result<ProviderRegistry> {
    let mut registry = ProviderRegistry::new();

    for scheme in schemes {
        let provider: Arc<dyn Provider> = match *scheme {
            HTTP_SCHEME => Arc::new(
                HttpProvider::new(app_config.http_config()).context("failed to build http provider")?,
            ),
            HTTPS_SCHEME => Arc::new(
                HttpsProvider::new(app_config.https_config())
                    .context("failed to build https provider")?,
            ),
            S3_SCHEME => Arc::new(S3Provider::from_config(app_config.s3_config()).await),
            other => anyhow::bail!("no provider for scheme {other:?}"),
        };
        registry.register(provider)?;
    }

    Ok(registry)
}

/// Cancel `token` on Ctrl-C so in-flight retrievals unwind cleanly.
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupted, cancelling retrievals");
            token.cancel();
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Command::Schemes => {
            commands::schemes::run();
            Ok(())
        }
        Command::Retrieve { uris, format } => {
            let app_config = load_config(&cli)?;
            let schemes = requested_schemes(uris)?;
            let registry = build_registry(&app_config, &schemes).await?;

            let cancel = CancellationToken::new();
            cancel_on_ctrl_c(cancel.clone());

            let result = commands::retrieve::run(&registry, uris, *format, &cancel).await;
            registry.shutdown().await?;
            result
        }
    }
}
