mod app;
mod auth;
mod config;
mod db;
mod error;
mod extract;
mod profiles;
mod state;
mod users;
mod validation;

use crate::config::{AppConfig, AppEnv};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = AppEnv::current();
    let env_file = AppConfig::load_env_file(env);

    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| env.default_log_filter().to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(env == AppEnv::Prod);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    match env_file {
        Ok(path) => tracing::info!(path = %path.display(), "loaded env file"),
        Err(e) => tracing::warn!(error = %e, "no env file loaded, using process environment"),
    }

    let config = AppConfig::from_env()?;
    let (state, pool) = state::AppState::init(config).await?;
    tracing::info!(env = state.config.env.as_str(), "starting piloto-api");
    db::migrate(&pool).await?;

    let config = state.config.clone();
    app::serve(app::build_app(state), &config.host, config.port).await
}
