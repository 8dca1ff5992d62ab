mod commands;
mod debounce;
mod metrics;
mod render;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use moviedeck_core::{
    load_config, validate_config, CacheStore, CatalogClient, Config, Controller, FavoritesStore,
    HttpTransport, KeyValueStore, MovieCatalog, Renderer, ReqwestTransport, SanitizedConfig,
    SqliteKeyValueStore,
};

use commands::{Command, HELP};
use debounce::Debouncer;
use render::TerminalRenderer;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Logs go to stderr so they never interleave with rendered output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = std::env::var("MOVIEDECK_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("moviedeck.toml"));

    info!("moviedeck {} loading configuration from {:?}", VERSION, config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    validate_config(&config).context("Configuration validation failed")?;

    info!("Storage path: {:?}", config.storage.path);
    let store: Arc<dyn KeyValueStore> = Arc::new(
        SqliteKeyValueStore::new(&config.storage.path)
            .context("Failed to open storage")?
            .with_quota(config.storage.quota_bytes),
    );

    let transport: Arc<dyn HttpTransport> = Arc::new(
        ReqwestTransport::new(config.catalog.timeout()).context("Failed to create HTTP client")?,
    );
    let cache = CacheStore::new(Arc::clone(&store));
    let catalog: Arc<dyn MovieCatalog> = Arc::new(
        CatalogClient::new(
            config.catalog.clone(),
            config.cache.clone(),
            transport,
            cache.clone(),
        )
        .context("Failed to create catalog client")?,
    );
    info!("Catalog client initialized for {}", config.catalog.base_url);

    let renderer: Arc<dyn Renderer> =
        Arc::new(TerminalRenderer::new(config.catalog.image_base_url.clone()));
    let controller = Arc::new(Controller::new(
        catalog,
        FavoritesStore::new(store),
        renderer,
    ));

    // Startup failures were already rendered
    controller.start().await.context("Startup failed")?;

    println!("Type 'help' for commands.");
    prompt_loop(controller, cache, &config).await
}

async fn prompt_loop(
    controller: Arc<Controller>,
    cache: CacheStore,
    config: &Config,
) -> Result<()> {
    let debouncer = Debouncer::new(Duration::from_millis(config.ui.search_debounce_ms));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let command = match commands::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{:#}", e);
                continue;
            }
        };

        match command {
            Command::Search(query) => {
                let controller = Arc::clone(&controller);
                debouncer.schedule(async move { controller.search(&query).await });
            }
            Command::Filter(filters) => {
                debouncer.cancel();
                controller.apply_filters(filters).await;
            }
            Command::Clear => {
                debouncer.cancel();
                controller.clear_all().await;
            }
            Command::ToggleFavorite(id) => controller.toggle_favorite(id).await,
            Command::Favorites => {
                debouncer.cancel();
                controller.show_favorites().await;
            }
            Command::Show(id) => controller.show_movie(id).await,
            Command::Genres => {
                for genre in controller.genres().await {
                    println!("{:>6}  {}", genre.id, genre.name);
                }
            }
            Command::ClearCache => match cache.clear() {
                Ok(removed) => println!("Removed {} cached responses", removed),
                Err(e) => eprintln!("Failed to clear cache: {}", e),
            },
            Command::Config => {
                let sanitized = SanitizedConfig::from(config);
                println!(
                    "{}",
                    serde_json::to_string_pretty(&sanitized)
                        .context("Failed to serialize config")?
                );
            }
            Command::Stats => print!("{}", metrics::encode_metrics()),
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
        }
    }

    info!("Exiting");
    Ok(())
}
