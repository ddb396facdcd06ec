//! # Yatube Server
//!
//! Main binary. `yatube serve` (the default) runs the web application;
//! the other subcommands are administrator tools working on the same
//! database and cache.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::{compression::CompressionLayer, services::ServeDir};
use yatube_api::{AppState, Settings, auth, build_router};
use yatube_common::{
    config::{self, AppConfig},
    models::user::SignupForm,
    validation::{validate_request, validate_slug},
};
use yatube_db::{
    Database,
    cache::PageCache,
    repository::{groups, users},
    storage::MediaStorage,
};

#[derive(Parser)]
#[command(name = "yatube", version, about = "Yatube blogging platform")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the web server (default)
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
    /// Create a post group
    CreateGroup {
        #[arg(long)]
        title: String,
        #[arg(long)]
        slug: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Create a user account
    CreateUser {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
    },
    /// Drop every cached page
    ClearCache,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::init()?;

    // Initialize tracing (structured logging)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yatube=debug,tower_http=debug".into()),
        )
        .with_target(true)
        .init();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await,
        Command::Migrate => {
            let db = Database::connect(config).await?;
            db.migrate().await
        }
        Command::CreateGroup {
            title,
            slug,
            description,
        } => {
            validate_slug(&slug)?;
            let db = connect_migrated(config).await?;
            let group = groups::create_group(&db.pool, &title, &slug, &description)
                .await
                .with_context(|| format!("creating group '{slug}'"))?;
            tracing::info!(group_id = group.id, slug = %group.slug, "Group created");
            Ok(())
        }
        Command::CreateUser {
            username,
            password,
            first_name,
            last_name,
        } => {
            let form = SignupForm {
                username,
                password,
                first_name,
                last_name,
            };
            validate_request(&form)?;

            let db = connect_migrated(config).await?;
            let password_hash =
                auth::hash_password(&form.password).map_err(|e| anyhow::anyhow!("{e}"))?;
            let user = users::create_user(
                &db.pool,
                &form.username,
                &form.first_name,
                &form.last_name,
                &password_hash,
            )
            .await
            .with_context(|| format!("creating user '{}'", form.username))?;
            tracing::info!(user_id = user.id, username = %user.username, "User created");
            Ok(())
        }
        Command::ClearCache => {
            let cache = page_cache(config).await?;
            cache.clear().await?;
            if config.redis.url.is_none() {
                tracing::info!("No Redis configured; in-process caches are cleared on restart");
            } else {
                tracing::info!("Page cache cleared");
            }
            Ok(())
        }
    }
}

async fn connect_migrated(config: &AppConfig) -> anyhow::Result<Database> {
    let db = Database::connect(config).await?;
    db.migrate().await?;
    Ok(db)
}

async fn page_cache(config: &AppConfig) -> anyhow::Result<PageCache> {
    let ttl = Duration::from_secs(config.cache.index_ttl_secs);
    Ok(match &config.redis.url {
        Some(url) => PageCache::redis(url, ttl).await?,
        None => PageCache::in_memory(ttl),
    })
}

async fn serve() -> anyhow::Result<()> {
    let config = config::get();

    tracing::info!("Starting Yatube v{}", env!("CARGO_PKG_VERSION"));

    // Connect to the database and run migrations
    let db = connect_migrated(config).await?;

    // === Media storage ===
    let storage = MediaStorage::new(&config.storage.data_dir);
    storage.ensure_root().await?;
    tracing::info!("Media directory ready: {}", config.storage.data_dir);

    let cache = page_cache(config).await?;

    let state = AppState {
        db,
        cache,
        storage,
        settings: Settings::from_config(config),
    };

    let media_mount = match config.storage.media_url.trim_end_matches('/') {
        "" => "/media",
        mount => mount,
    };
    let router = build_router(state)
        .nest_service(media_mount, ServeDir::new(&config.storage.data_dir))
        .layer(CompressionLayer::new());

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    tracing::info!("Listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
