use anyhow::{Context, Result};
use clap::Parser;
use std::env;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub storage_url: String,
    pub storage_key: String,
    pub storage_bucket: String,
    pub allowed_origins: Vec<String>,
    pub static_dir: String,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Metadata-tracking API for uploaded recordings")]
pub struct Args {
    /// Host to bind to (overrides RECORDING_STORE_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides RECORDING_STORE_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL (overrides RECORDING_STORE_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Object storage endpoint (overrides RECORDING_STORE_STORAGE_URL)
    #[arg(long)]
    pub storage_url: Option<String>,

    /// Object storage API key (overrides RECORDING_STORE_STORAGE_KEY)
    #[arg(long)]
    pub storage_key: Option<String>,

    /// Object storage bucket (overrides RECORDING_STORE_STORAGE_BUCKET)
    #[arg(long)]
    pub storage_bucket: Option<String>,

    /// Comma-separated CORS origins (overrides RECORDING_STORE_ALLOWED_ORIGINS)
    #[arg(long)]
    pub allowed_origins: Option<String>,

    /// Frontend build directory (overrides RECORDING_STORE_STATIC_DIR)
    #[arg(long)]
    pub static_dir: Option<String>,

    /// Ensure the database schema and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    ///
    /// The storage endpoint and API key have no defaults; starting without
    /// them is a fatal configuration error.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        // Parse CLI once
        let args = Args::parse();

        // --- Environment fallback ---
        let env_host = env::var("RECORDING_STORE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match env::var("RECORDING_STORE_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing RECORDING_STORE_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 3000,
            Err(err) => return Err(err).context("reading RECORDING_STORE_PORT"),
        };
        let env_db = env::var("RECORDING_STORE_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/recordings.db".into());
        let env_bucket =
            env::var("RECORDING_STORE_STORAGE_BUCKET").unwrap_or_else(|_| "uploads".into());
        let env_origins = env::var("RECORDING_STORE_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into());
        let env_static =
            env::var("RECORDING_STORE_STATIC_DIR").unwrap_or_else(|_| "./client/dist".into());

        // --- Required storage credentials ---
        let storage_url = args
            .storage_url
            .or_else(|| env::var("RECORDING_STORE_STORAGE_URL").ok())
            .context("RECORDING_STORE_STORAGE_URL (or --storage-url) is required")?;
        let storage_key = args
            .storage_key
            .or_else(|| env::var("RECORDING_STORE_STORAGE_KEY").ok())
            .context("RECORDING_STORE_STORAGE_KEY (or --storage-key) is required")?;

        // --- Merge ---
        let origins_raw = args.allowed_origins.unwrap_or(env_origins);
        let cfg = Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            database_url: args.database_url.unwrap_or(env_db),
            storage_url,
            storage_key,
            storage_bucket: args.storage_bucket.unwrap_or(env_bucket),
            allowed_origins: origins_raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            static_dir: args.static_dir.unwrap_or(env_static),
        };

        Ok((cfg, args.migrate))
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
