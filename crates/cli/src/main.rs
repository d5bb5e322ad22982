//! sw-assets command line entry point.
//!
//! Loads the layered configuration, registers every configured asset route
//! and runs one subcommand. Logs go to stderr as JSON; command output is
//! written to stdout.

use anyhow::Result;
use clap::{Parser, Subcommand};
use sw_assets_core::{AppConfig, AssetCachingModule, Router, StrategyBuilder, SwModule};
use tracing_subscriber::EnvFilter;

mod commands;

/// Inspect and warm the service worker asset cache.
#[derive(Debug, Parser)]
#[command(name = "sw-assets", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List registered routes in match order.
    Routes,

    /// Show which route handles a URL and whether a response would be cached.
    Check {
        url: String,

        /// Content type of the hypothetical response.
        #[arg(long, default_value = "application/octet-stream")]
        content_type: String,
    },

    /// Fetch URLs and store the admitted responses.
    Warm {
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// List URLs stored in the cache namespace.
    Entries,

    /// Remove every entry from the cache namespace.
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    let mut router = Router::new();
    let module = AssetCachingModule::new(StrategyBuilder::new(config.cache_name.clone()));
    module.init(config.routing_rules()?, &mut router)?;

    tracing::debug!(routes = router.len(), cache_name = %config.cache_name, "asset routes registered");

    match cli.command {
        Command::Routes => commands::routes(&router),
        Command::Check { url, content_type } => commands::check(&router, &url, &content_type).await,
        Command::Warm { urls } => commands::warm(&config, &router, &urls).await,
        Command::Entries => commands::entries(&config).await,
        Command::Clear => commands::clear(&config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check_default_content_type() {
        let cli = Cli::parse_from(["sw-assets", "check", "https://example.com/a.png"]);
        match cli.command {
            Command::Check { url, content_type } => {
                assert_eq!(url, "https://example.com/a.png");
                assert_eq!(content_type, "application/octet-stream");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_warm_requires_urls() {
        assert!(Cli::try_parse_from(["sw-assets", "warm"]).is_err());
    }
}
