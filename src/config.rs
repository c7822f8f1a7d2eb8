use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

/// Deployment environment; picks the env file and the logging profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Dev,
    Prod,
}

impl AppEnv {
    /// `APP_ENV` value, defaulting to `dev` when unset. Anything that is not
    /// `dev` runs with the production profile.
    pub fn current() -> Self {
        Self::parse(std::env::var("APP_ENV").ok().as_deref())
    }

    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some("dev") => AppEnv::Dev,
            Some(_) => AppEnv::Prod,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AppEnv::Dev => "dev",
            AppEnv::Prod => "prod",
        }
    }

    /// `.dev.env` / `.prod.env`
    pub fn env_file(self) -> String {
        format!(".{}.env", self.as_str())
    }

    pub fn default_log_filter(self) -> &'static str {
        match self {
            AppEnv::Dev => "piloto_api=debug,axum=info,tower_http=debug,sqlx=warn",
            AppEnv::Prod => "piloto_api=info,axum=info,tower_http=info,sqlx=warn",
        }
    }
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: AppEnv,
    pub database: PgConnectOptions,
    pub max_connections: u32,
    pub jwt: JwtConfig,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    /// Loads `.{APP_ENV}.env` (or `.env`) into the process environment.
    /// Runs before logging is set up, so the outcome is returned for the
    /// caller to log. Missing files are fine: the variables may come from
    /// the real environment.
    pub fn load_env_file(env: AppEnv) -> Result<PathBuf, dotenvy::Error> {
        dotenvy::from_filename(env.env_file()).or_else(|_| dotenvy::dotenv())
    }

    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let database = match lookup("DATABASE_URL") {
            Some(url) => PgConnectOptions::from_str(&url)
                .context("DATABASE_URL is not a valid postgres url")?,
            None => {
                let host = lookup("DB_HOST").context("DB_HOST or DATABASE_URL must be set")?;
                let port = match lookup("DB_PORT") {
                    Some(raw) => raw
                        .parse::<u16>()
                        .with_context(|| format!("DB_PORT is not a valid port: {raw}"))?,
                    None => 5432,
                };
                let user = lookup("DB_USER").context("DB_USER must be set")?;
                let name = lookup("DB_NAME").context("DB_NAME must be set")?;

                let mut options = PgConnectOptions::new()
                    .host(&host)
                    .port(port)
                    .username(&user)
                    .database(&name)
                    .ssl_mode(PgSslMode::Disable);
                if let Some(password) = lookup("DB_PASSWORD") {
                    options = options.password(&password);
                }
                options
            }
        };

        let jwt = JwtConfig {
            secret: lookup("JWT_SECRET").context("JWT_SECRET must be set")?,
        };

        let max_connections = lookup("DB_MAX_CONNECTIONS")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let host = lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match lookup("APP_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("APP_PORT is not a valid port: {raw}"))?,
            None => 3800,
        };

        Ok(Self {
            env,
            database,
            max_connections,
            jwt,
            host,
            port,
        })
    }
}
