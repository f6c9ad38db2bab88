use super::errors::DatabaseError;
use super::types::{default_seed, User};
use crate::configuration::{Config, StorageBackend};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

mod memory;
mod postgres;

pub use memory::InMemoryUserStore;
pub use postgres::PostgresUserStore;

// Identifier-scoped operations match users whose github_id or telegram_id
// equals the identifier. The in-memory store acts on the first match in
// storage order; the postgres store mutates every matching row.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, DatabaseError>;

    async fn find_by_identifier(&self, id: &str) -> Result<User, DatabaseError>;

    async fn get_roles(&self, id: &str) -> Result<String, DatabaseError> {
        Ok(self.find_by_identifier(id).await?.roles)
    }

    // No uniqueness check on either identifier
    async fn insert(&self, user: User) -> Result<User, DatabaseError>;

    async fn delete_by_identifier(&self, id: &str) -> Result<User, DatabaseError>;

    async fn update_roles(&self, id: &str, roles: &str) -> Result<String, DatabaseError>;

    // Touches fio and group_number only
    async fn update_profile(
        &self,
        id: &str,
        fio: &str,
        group_number: &str,
    ) -> Result<User, DatabaseError>;

    // Overwrites the whole record, identifiers included
    async fn replace_user(&self, id: &str, replacement: User) -> Result<User, DatabaseError>;
}

pub async fn connect_store(config: &Config) -> Result<Arc<dyn UserStore>, DatabaseError> {
    match config.storage.backend {
        StorageBackend::Memory => {
            let users = config.seed_users.clone().unwrap_or_else(default_seed);
            info!("Using in-memory user store seeded with {} users", users.len());
            Ok(Arc::new(InMemoryUserStore::new(users)))
        }
        StorageBackend::Postgres => {
            info!(
                host = %config.database.host,
                port = config.database.port,
                db_name = %config.database.db_name,
                "Using postgres user store"
            );
            let store = PostgresUserStore::connect(&config.database).await?;
            Ok(Arc::new(store))
        }
    }
}
