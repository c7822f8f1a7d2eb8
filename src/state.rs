use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::jwt::JwtKeys;
use crate::auth::services::AuthService;
use crate::config::AppConfig;
use crate::db;
use crate::profiles::repo::{PgProfileStore, ProfileStore};
use crate::profiles::services::ProfileService;
use crate::users::repo::{PgUserStore, UserStore};
use crate::users::services::UserService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: UserService,
    pub profiles: ProfileService,
    pub auth: AuthService,
}

impl AppState {
    /// Connects the pool and wires the Postgres gateways.
    pub async fn init(config: AppConfig) -> anyhow::Result<(Self, PgPool)> {
        let pool = db::connect(&config).await?;
        let state = Self::from_stores(
            Arc::new(config),
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgProfileStore::new(pool.clone())),
        );
        Ok((state, pool))
    }

    pub fn from_stores(
        config: Arc<AppConfig>,
        user_store: Arc<dyn UserStore>,
        profile_store: Arc<dyn ProfileStore>,
    ) -> Self {
        let users = UserService::new(user_store);
        let profiles = ProfileService::new(profile_store);
        let auth = AuthService::new(
            Arc::new(users.clone()),
            JwtKeys::from_secret(&config.jwt.secret),
        );
        Self {
            config,
            users,
            profiles,
            auth,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::config::{AppEnv, JwtConfig};
        use crate::db::memory::MemoryDb;
        use sqlx::postgres::PgConnectOptions;

        let config = Arc::new(AppConfig {
            env: AppEnv::Dev,
            database: PgConnectOptions::new()
                .host("localhost")
                .port(5432)
                .username("postgres")
                .database("postgres"),
            max_connections: 1,
            jwt: JwtConfig {
                secret: "test".into(),
            },
            host: "127.0.0.1".into(),
            port: 0,
        });

        let db = Arc::new(MemoryDb::new());
        Self::from_stores(config, db.clone(), db)
    }
}
