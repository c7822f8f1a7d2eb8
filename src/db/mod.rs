use anyhow::Context;
use sqlx::{error::ErrorKind, postgres::PgPoolOptions, PgPool};
use thiserror::Error;

use crate::config::AppConfig;

#[cfg(test)]
pub mod memory;

/// Errors raised by the persistence gateways.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    UniqueViolation(String),

    #[error("{0}")]
    ForeignKeyViolation(String),

    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    return StoreError::UniqueViolation(unique_message(db_err.constraint()));
                }
                ErrorKind::ForeignKeyViolation => {
                    return StoreError::ForeignKeyViolation(
                        "referenced record does not exist".into(),
                    );
                }
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}

fn unique_message(constraint: Option<&str>) -> String {
    match constraint {
        Some("idx_users_email") => "email already registered".into(),
        Some("idx_profiles_user_id") => "user already has a profile".into(),
        Some(other) => format!("duplicate value violates {other}"),
        None => "duplicate value".into(),
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(config.database.clone())
        .await
        .context("connect to database")
}

pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    tracing::info!("running database migrations");
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("run database migrations")?;
    tracing::info!("database migrated");
    Ok(())
}
