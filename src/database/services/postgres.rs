use super::{DatabaseError, UserStore};
use crate::configuration::DatabaseConfig;
use crate::database::User;
use async_trait::async_trait;
use tokio_postgres::{Client, NoTls, Row};
use tracing::{debug, error, info};

// The users table carries no key. Mutations are declarative: every row whose
// github_id or telegram_id equals the identifier is affected, and the first
// returned row is reported back. Scan order is whatever postgres yields.
const SELECT_ALL: &str = "SELECT github_id, telegram_id, roles, fio, group_number FROM users";

const COUNT_ALL: &str = "SELECT count(*) FROM users";

const SELECT_MATCH: &str = "SELECT github_id, telegram_id, roles, fio, group_number \
     FROM users WHERE github_id = $1 OR telegram_id = $1 LIMIT 1";

const INSERT: &str = "INSERT INTO users (github_id, telegram_id, roles, fio, group_number) \
     VALUES ($1, $2, $3, $4, $5) \
     RETURNING github_id, telegram_id, roles, fio, group_number";

const DELETE_MATCHES: &str = "DELETE FROM users WHERE github_id = $1 OR telegram_id = $1 \
     RETURNING github_id, telegram_id, roles, fio, group_number";

const UPDATE_ROLES: &str = "UPDATE users SET roles = $2 \
     WHERE github_id = $1 OR telegram_id = $1 \
     RETURNING roles";

const UPDATE_PROFILE: &str = "UPDATE users SET fio = $2, group_number = $3 \
     WHERE github_id = $1 OR telegram_id = $1 \
     RETURNING github_id, telegram_id, roles, fio, group_number";

const REPLACE: &str = "UPDATE users \
     SET github_id = $2, telegram_id = $3, roles = $4, fio = $5, group_number = $6 \
     WHERE github_id = $1 OR telegram_id = $1 \
     RETURNING github_id, telegram_id, roles, fio, group_number";

pub struct PostgresUserStore {
    client: Client,
}

impl PostgresUserStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let pg_config = config
            .pg_config()
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;
        let (client, connection) = pg_config
            .connect(NoTls)
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        // The connection object drives the socket and must be polled on its own task
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("Postgres connection error: {}", e);
            }
        });

        client
            .simple_query("SELECT 1")
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        let store = Self { client };
        let count: i64 = store.client.query_one(COUNT_ALL, &[]).await?.try_get(0)?;
        info!("Connected to postgres, {} users present", count);
        Ok(store)
    }

    fn row_to_user(row: &Row) -> Result<User, DatabaseError> {
        Ok(User {
            github_id: row.try_get("github_id")?,
            telegram_id: row.try_get("telegram_id")?,
            roles: row.try_get("roles")?,
            fio: row.try_get("fio")?,
            group_number: row.try_get("group_number")?,
        })
    }

    fn first(rows: Vec<Row>) -> Result<Row, DatabaseError> {
        rows.into_iter().next().ok_or(DatabaseError::UserNotFound)
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn list(&self) -> Result<Vec<User>, DatabaseError> {
        let rows = self.client.query(SELECT_ALL, &[]).await?;
        rows.iter().map(Self::row_to_user).collect()
    }

    async fn find_by_identifier(&self, id: &str) -> Result<User, DatabaseError> {
        let rows = self.client.query(SELECT_MATCH, &[&id]).await?;
        Self::row_to_user(&Self::first(rows)?)
    }

    async fn insert(&self, user: User) -> Result<User, DatabaseError> {
        let row = self
            .client
            .query_one(
                INSERT,
                &[
                    &user.github_id,
                    &user.telegram_id,
                    &user.roles,
                    &user.fio,
                    &user.group_number,
                ],
            )
            .await?;
        debug!(github_id = %user.github_id, "User inserted");
        Self::row_to_user(&row)
    }

    async fn delete_by_identifier(&self, id: &str) -> Result<User, DatabaseError> {
        let rows = self.client.query(DELETE_MATCHES, &[&id]).await?;
        let count = rows.len();
        let removed = Self::row_to_user(&Self::first(rows)?)?;
        debug!(id, count, "Users deleted");
        Ok(removed)
    }

    async fn update_roles(&self, id: &str, roles: &str) -> Result<String, DatabaseError> {
        let rows = self.client.query(UPDATE_ROLES, &[&id, &roles]).await?;
        let roles: String = Self::first(rows)?.try_get("roles")?;
        debug!(id, %roles, "Roles updated");
        Ok(roles)
    }

    async fn update_profile(
        &self,
        id: &str,
        fio: &str,
        group_number: &str,
    ) -> Result<User, DatabaseError> {
        let rows = self
            .client
            .query(UPDATE_PROFILE, &[&id, &fio, &group_number])
            .await?;
        let updated = Self::row_to_user(&Self::first(rows)?)?;
        debug!(id, "Profile updated");
        Ok(updated)
    }

    async fn replace_user(&self, id: &str, replacement: User) -> Result<User, DatabaseError> {
        let rows = self
            .client
            .query(
                REPLACE,
                &[
                    &id,
                    &replacement.github_id,
                    &replacement.telegram_id,
                    &replacement.roles,
                    &replacement.fio,
                    &replacement.group_number,
                ],
            )
            .await?;
        let replaced = Self::row_to_user(&Self::first(rows)?)?;
        debug!(id, "User replaced");
        Ok(replaced)
    }
}
