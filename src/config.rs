//! Service configuration, read from command line flags or the environment.

use std::time::Duration;

use anyhow::{Result, anyhow};
use clap::{Args, Parser};

const SANDBOX_BASE_URL: &str = "https://app.sandbox.midtrans.com";
const PRODUCTION_BASE_URL: &str = "https://app.midtrans.com";

/// Storefront order service configuration
#[derive(Debug, Clone, Parser)]
#[command(name = "storefront-orderservice", about = "Storefront order service", long_about = None)]
pub struct AppConfig {
    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub database: DatabaseConfig,

    #[command(flatten)]
    pub midtrans: MidtransArgs,

    #[command(flatten)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Server host address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Server port
    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Frontend origins allowed by CORS, comma separated
    #[arg(long = "frontend-url", env = "FRONTEND_URL", value_delimiter = ',')]
    pub frontend_urls: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection string
    #[arg(long = "database-url", env = "DATABASE_URL")]
    pub url: String,

    /// Upper bound of the connection pool
    #[arg(
        long = "database-max-connections",
        env = "DATABASE_MAX_CONNECTIONS",
        default_value = "10"
    )]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Args)]
pub struct MidtransArgs {
    /// Use the production Midtrans environment
    #[arg(long = "midtrans-is-production", env = "MIDTRANS_IS_PRODUCTION")]
    pub is_production: bool,

    /// Server key, takes precedence over the per-mode keys
    #[arg(
        long = "midtrans-server-key",
        env = "MIDTRANS_SERVER_KEY",
        hide_env_values = true
    )]
    pub server_key: Option<String>,

    #[arg(
        long = "midtrans-server-key-sandbox",
        env = "MIDTRANS_SERVER_KEY_SANDBOX",
        hide_env_values = true
    )]
    pub server_key_sandbox: Option<String>,

    #[arg(
        long = "midtrans-server-key-production",
        env = "MIDTRANS_SERVER_KEY_PRODUCTION",
        hide_env_values = true
    )]
    pub server_key_production: Option<String>,

    /// Overrides the Snap API base URL of the selected mode
    #[arg(long = "midtrans-base-url", env = "MIDTRANS_BASE_URL")]
    pub base_url: Option<String>,

    /// Seconds to wait for Snap before giving up
    #[arg(
        long = "midtrans-timeout-secs",
        env = "MIDTRANS_TIMEOUT_SECS",
        default_value = "15"
    )]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Args)]
pub struct AuthConfig {
    /// Secret used to verify bearer tokens
    #[arg(long = "jwt-secret", env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,
}

/// Midtrans settings with the mode-specific key and URL already picked.
#[derive(Debug, Clone)]
pub struct MidtransConfig {
    pub is_production: bool,
    pub server_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl AppConfig {
    /// Parses flags and environment. Call [`crate::bootstrap::init_env`]
    /// first so `.env` values are visible.
    pub fn load() -> Result<Self> {
        Ok(Self::try_parse()?)
    }
}

impl MidtransArgs {
    pub fn resolve(&self) -> Result<MidtransConfig> {
        let non_blank = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        let (mode_key, mode_env, default_url) = if self.is_production {
            (
                &self.server_key_production,
                "MIDTRANS_SERVER_KEY_PRODUCTION",
                PRODUCTION_BASE_URL,
            )
        } else {
            (
                &self.server_key_sandbox,
                "MIDTRANS_SERVER_KEY_SANDBOX",
                SANDBOX_BASE_URL,
            )
        };

        let server_key = non_blank(&self.server_key)
            .or_else(|| non_blank(mode_key))
            .ok_or_else(|| anyhow!("MIDTRANS_SERVER_KEY or {mode_env} must be set"))?;
        let base_url = non_blank(&self.base_url).unwrap_or_else(|| default_url.to_string());

        Ok(MidtransConfig {
            is_production: self.is_production,
            server_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}
