//! NutriTrack
//!
//! An MCP server for nutrition targets and food logging.

use std::sync::Arc;

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use nutritrack::config::Config;
use nutritrack::mcp::NutriTrackService;
use nutritrack::vision::{AnthropicVision, VisionClient};
use nutritrack::{build_info, db};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging goes to stderr so it does not interfere with MCP stdio
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nutritrack=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();

    let config = Config::from_env();
    tracing::info!(path = %config.database_path.display(), "using database");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = db::Database::new(&config.database_path)?;
    database.with_conn(|conn| {
        if db::migrations::needs_migration(conn)? {
            tracing::info!(
                from = db::migrations::get_schema_version(conn)?,
                to = db::migrations::SCHEMA_VERSION,
                "migrating database schema"
            );
        }
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        tracing::info!(version, "database schema ready");
        Ok(())
    })?;

    let vision: Option<Arc<dyn VisionClient>> = match &config.vision_api_key {
        Some(key) => {
            let client = AnthropicVision::new(
                key.clone(),
                config.vision_model.clone(),
                config.vision_base_url.clone(),
            )?;
            tracing::info!(model = %config.vision_model, "photo analysis enabled");
            Some(Arc::new(client) as Arc<dyn VisionClient>)
        }
        None => {
            tracing::warn!("ANTHROPIC_API_KEY not set; analyze_food_image will be unavailable");
            None
        }
    };

    let service = NutriTrackService::new(config.database_path.clone(), database, vision);

    tracing::info!("starting MCP server on stdio");
    let server = service.serve((stdin(), stdout())).await?;
    server.waiting().await?;

    Ok(())
}
