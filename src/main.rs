use finnance_ledger::{
    api::LedgerGraph,
    config::{database, seed},
    core::seed::seed_from_config,
    errors::Result,
};
use dotenvy::dotenv;
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Open the database and make sure the schema exists
    ensure_data_dir(&database::get_database_url())?;
    let db = database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 4. Seed currencies, agents and categories if a seed file is present
    let config_path = seed::config_path();
    if Path::new(&config_path).exists() {
        let config = seed::load_config(&config_path)
            .inspect_err(|e| error!("Failed to load seed config: {}", e))?;
        let summary = seed_from_config(&db, &config)
            .await
            .inspect_err(|e| error!("Failed to seed ledger: {}", e))?;
        info!(
            "Seeded {} currencies, {} agents, {} categories from {}",
            summary.currencies, summary.agents, summary.categories, config_path
        );
    } else {
        warn!("No seed config at {}, skipping seeding", config_path);
    }

    // 5. Verify the ledger can be loaded for serialization
    let graph = LedgerGraph::load(&db)
        .await
        .inspect_err(|e| error!("Failed to load ledger: {}", e))?;
    info!("Ledger ready: {:?}", graph.counts());

    Ok(())
}

/// Creates the parent directory of a file-backed `SQLite` URL.
fn ensure_data_dir(url: &str) -> Result<()> {
    let Some(path) = url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let file = path.split('?').next().unwrap_or_default();
    if let Some(dir) = Path::new(file).parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}
