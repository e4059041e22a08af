use anyhow::Result;
use recording_store::{
    config::AppConfig,
    routes,
    services::{
        metadata_store::MetadataStore, object_store::HttpObjectStore,
        recording_service::RecordingService,
    },
};
use sqlx::sqlite::SqlitePoolOptions;
use std::{fs, io::ErrorKind, path::Path, sync::Arc};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // --- Parse config + migrate flag ---
    let (cfg, migrate) = AppConfig::from_env_and_args()?;

    tracing::info!(
        addr = %cfg.addr(),
        bucket = %cfg.storage_bucket,
        database = %cfg.database_url,
        "Starting recording-store"
    );

    // --- Initialize SQLite connection ---
    let db_url = &cfg.database_url;

    // Extract the local file path SQLx will use
    let db_path = db_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("file:");
    tracing::debug!("Interpreted SQLite path => {}", db_path);

    // Create parent directory if needed
    let db_path_obj = Path::new(db_path);
    if let Some(parent) = db_path_obj.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
            tracing::info!("Created missing directory {:?}", parent);
        }
    }

    // SQLx will not create the database file on its own
    match fs::OpenOptions::new()
        .create(true)
        .write(true)
        .open(db_path)
    {
        Ok(_) => tracing::debug!("Database file can be created/opened successfully."),
        Err(e) => tracing::warn!("Failed to open database file manually: {}", e),
    }

    let db: Arc<sqlx::Pool<sqlx::Sqlite>> = Arc::new(
        SqlitePoolOptions::new()
            .max_connections(5)
            .connect(db_url)
            .await?,
    );

    // --- Metadata schema (fatal if it cannot be created) ---
    let metadata = MetadataStore::new(db.clone());
    metadata.initialize().await?;

    if migrate {
        tracing::info!("Database schema ensured.");
        return Ok(()); // exit after migration
    }

    // --- Initialize core service ---
    let objects = Arc::new(HttpObjectStore::new(
        &cfg.storage_url,
        &cfg.storage_bucket,
        &cfg.storage_key,
    )?);
    let service = RecordingService::new(metadata.clone(), objects);

    // --- Frontend assets (optional) ---
    let static_dir = Path::new(&cfg.static_dir);
    let static_dir = if static_dir.is_dir() {
        tracing::info!("Serving frontend assets from {}", static_dir.display());
        Some(static_dir.to_path_buf())
    } else {
        tracing::warn!(
            "Frontend build directory {} not found, skipping static serving",
            static_dir.display()
        );
        None
    };

    // --- Build router ---
    let app = routes::routes::routes(static_dir, &cfg.allowed_origins)
        .layer(TraceLayer::new_for_http())
        .with_state(service);

    // --- Start server ---
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Orderly close of the metadata handle once the server has drained.
    metadata.close().await;

    Ok(())
}

/// Resolve when SIGINT or SIGTERM arrives, triggering graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
    }

    tracing::info!("Shutting down gracefully...");
}
