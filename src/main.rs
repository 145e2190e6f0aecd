use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use marketsearch::catalog::CatalogProvider;
use marketsearch::catalog::json::JsonCatalog;
use marketsearch::catalog::postgres::PostgresCatalog;
use marketsearch::config::Config;
use marketsearch::logging;
use marketsearch::search::{MatchStrategy, SearchRequest, SearchService};
use marketsearch::server;

#[derive(Parser)]
#[command(name = "marketsearch", version, about = "Marketplace catalog service with fuzzy listing search")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Skip automatic database migration on startup
    #[arg(long, global = true)]
    skip_migrate: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (default when no subcommand is given)
    Serve {
        /// Serve listings from a JSON file instead of PostgreSQL
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Listen address, overrides bind_addr from config
        #[arg(long)]
        bind: Option<String>,
    },
    /// Run database migrations and exit
    Migrate,
    /// Run one search against a JSON catalog and print the page as JSON
    Search {
        /// Path to a JSON array of listings
        #[arg(long)]
        catalog: PathBuf,
        /// Only listings in this category
        #[arg(long)]
        category: Option<i64>,
        /// 1-based page number
        #[arg(long)]
        page: Option<i64>,
        /// Page size
        #[arg(long)]
        limit: Option<i64>,
        /// Minimum fuzzy score in [0, 1]
        #[arg(long)]
        threshold: Option<f64>,
        /// Match the whole query as a substring instead of fuzzy scoring
        #[arg(long)]
        exact: bool,
        /// Free-text query; omit to browse the catalog
        query: Vec<String>,
    },
}

/// Open the catalog the server reads from: a JSON file if given, otherwise PostgreSQL.
async fn open_catalog(
    config: &Config,
    json_path: Option<PathBuf>,
    run_migrations: bool,
) -> Result<Arc<dyn CatalogProvider + Send + Sync>> {
    match json_path {
        Some(path) => Ok(Arc::new(JsonCatalog::from_path(&path)?)),
        None => {
            let catalog = PostgresCatalog::new(&config.database_url, run_migrations).await?;
            tracing::info!("PostgreSQL catalog initialized");
            Ok(Arc::new(catalog))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Parse CLI args
    let cli = Cli::parse();

    // 2. Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Config error (using defaults): {}", e);
        Config::default()
    });

    // 3. Initialize logging before any other output; logs go to stderr only
    logging::init_logging(&config);

    match cli.command {
        Some(Commands::Migrate) => {
            tracing::info!("Running database migrations...");
            PostgresCatalog::new(&config.database_url, true).await?;
            println!("Migrations completed successfully.");
        }

        Some(Commands::Search { catalog, category, page, limit, threshold, exact, query }) => {
            let provider = Arc::new(JsonCatalog::from_path(&catalog)?);
            let service = SearchService::from_config(provider, &config);
            let request = SearchRequest {
                query: query.join(" "),
                category_id: category,
                page,
                limit,
                threshold,
                strategy: exact.then_some(MatchStrategy::ExactSubstring),
            };
            let page = service.search(&request).await?;
            println!("{}", serde_json::to_string_pretty(&page)?);
        }

        Some(Commands::Serve { catalog, bind }) => {
            run_server(&config, catalog, bind, !cli.skip_migrate).await?;
        }

        None => {
            run_server(&config, None, None, !cli.skip_migrate).await?;
        }
    }

    Ok(())
}

async fn run_server(
    config: &Config,
    catalog: Option<PathBuf>,
    bind: Option<String>,
    run_migrations: bool,
) -> Result<()> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        strategy = %config.search.strategy,
        default_threshold = config.search.default_threshold,
        "marketsearch server starting"
    );

    let provider = open_catalog(config, catalog, run_migrations).await?;
    let service = Arc::new(SearchService::from_config(provider, config));
    let bind_addr = bind.unwrap_or_else(|| config.bind_addr.clone());

    server::serve(&bind_addr, service).await
}
