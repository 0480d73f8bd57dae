//! HTTP server command
//!
//! Runs the registration API against PostgreSQL, or against an in-memory
//! store with `--in-memory`.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use registro_server::db::{create_pool_with_options, migrations, DEFAULT_MAX_CONNECTIONS};
use registro_server::{
    run_server, AppState, AvatarStorage, MemoryParticipantStore, ParticipantStore,
    PgParticipantRepo, ServerConfig,
};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Database URL (required unless --in-memory)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum database connections
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Directory for uploaded avatars, served at /uploads
    #[arg(long, env = "UPLOADS_DIR", default_value = "uploads")]
    pub uploads_dir: PathBuf,

    /// Allowed CORS origins (comma separated). Any origin when unset.
    #[arg(long = "cors-origin", env = "CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,

    /// Keep participants in memory instead of PostgreSQL (data is lost on exit)
    #[arg(long)]
    pub in_memory: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let store = open_store(&args).await?;

    let avatars = AvatarStorage::open(&args.uploads_dir)
        .await
        .with_context(|| format!("Failed to open uploads dir {}", args.uploads_dir.display()))?;
    tracing::info!(uploads = %args.uploads_dir.display(), "Avatar storage ready");

    let config = ServerConfig {
        bind_addr: SocketAddr::new(args.host, args.port),
        cors_origins: args.cors_origins,
    };

    // Run server (blocks until shutdown)
    run_server(AppState::new(store, avatars), config)
        .await
        .context("Server error")?;

    Ok(())
}

async fn open_store(args: &ServeArgs) -> Result<Arc<dyn ParticipantStore>> {
    if args.in_memory {
        tracing::warn!("Using in-memory participant store; data will not persist");
        return Ok(Arc::new(MemoryParticipantStore::new()));
    }

    let database_url = args
        .database_url
        .as_deref()
        .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or .env (or pass --in-memory)")?;

    let pool = create_pool_with_options(database_url, args.max_connections)
        .await
        .context("Failed to create database pool")?;

    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(Arc::new(PgParticipantRepo::new(pool)))
}
