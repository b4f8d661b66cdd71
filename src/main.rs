//! MacroTrack
//!
//! An MCP server for calorie and macronutrient tracking.

use std::sync::Arc;

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use macrotrack::build_info;
use macrotrack::config::AppConfig;
use macrotrack::db;
use macrotrack::lookup::{FoodLookup, RestCatalog, SqliteCatalog};
use macrotrack::mcp::MacroTrackService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("macrotrack=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let config = AppConfig::from_env()?;
    let db_path = config.database_path.clone();
    eprintln!("Database path: {}", db_path.display());

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    eprintln!("Initializing database...");
    let database = db::Database::new(&db_path)?;

    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        eprintln!("Database schema version: {}", version);
        Ok(())
    })?;

    // The blocking HTTP client owns its own runtime; build it off this one
    let lookup: Arc<dyn FoodLookup> = match config.lookup.clone() {
        Some(remote) => {
            eprintln!("Food lookup: {}", remote.base_url);
            let catalog = tokio::task::spawn_blocking(move || RestCatalog::new(&remote)).await??;
            Arc::new(catalog)
        }
        None => {
            eprintln!("Food lookup: local catalog");
            Arc::new(SqliteCatalog::new(database.clone()))
        }
    };

    let service = MacroTrackService::new(config, database, lookup);

    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
