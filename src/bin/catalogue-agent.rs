use clap::Parser;
use catalogue_agent::cache::MemoryTokenCache;
use catalogue_agent::catalogue::CatalogueClient;
use catalogue_agent::server;
use catalogue_agent::utils::config_loader;
use catalogue_agent::utils::logging;
use anyhow::Result;
use catalogue_agent::utils::logging::LogLevel;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "catalogue-agent.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL" , value_enum)]
    log_level: Option<LogLevel>,
    /// Sign in once at startup so the first proxied call hits a warm cache
    #[arg(long, env = "WARM_UP")]
    warm_up: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load YAML config, init logging
    // -------------------------------

    let args = Args::parse();
    let service_config = config_loader::run(&args.config).await?;
    logging::run(&service_config, args.log_level)?;

    // -------------------------------
    // 2. Token cache, constructed once and injected
    // -------------------------------

    let cache = MemoryTokenCache::shared();

    // -------------------------------
    // 3. Catalogue client
    // -------------------------------

    let client = CatalogueClient::from_config(&service_config, cache)?;
    info!(
        "catalogue client ready, base url {}, caching {}",
        service_config.base_url,
        if service_config.cache.enabled { "on" } else { "off" }
    );

    if args.warm_up {
        client.ensure_valid_token().await?;
    }

    // -------------------------------
    // 4. Start http server
    // -------------------------------

    info!("Service starting...");
    server::server::start(&service_config, client).await
}
