use super::{DatabaseError, UserStore};
use crate::database::User;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

// Each operation holds the lock for its whole read-modify-write
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users),
        }
    }

    fn position(users: &[User], id: &str) -> Result<usize, DatabaseError> {
        users
            .iter()
            .position(|u| u.has_identifier(id))
            .ok_or(DatabaseError::UserNotFound)
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn list(&self) -> Result<Vec<User>, DatabaseError> {
        Ok(self.users.lock().await.clone())
    }

    async fn find_by_identifier(&self, id: &str) -> Result<User, DatabaseError> {
        let users = self.users.lock().await;
        let index = Self::position(&users, id)?;
        Ok(users[index].clone())
    }

    async fn get_roles(&self, id: &str) -> Result<String, DatabaseError> {
        let users = self.users.lock().await;
        let index = Self::position(&users, id)?;
        Ok(users[index].roles.clone())
    }

    async fn insert(&self, user: User) -> Result<User, DatabaseError> {
        let mut users = self.users.lock().await;
        users.push(user.clone());
        debug!(github_id = %user.github_id, total = users.len(), "User inserted");
        Ok(user)
    }

    async fn delete_by_identifier(&self, id: &str) -> Result<User, DatabaseError> {
        let mut users = self.users.lock().await;
        let index = Self::position(&users, id)?;
        let removed = users.remove(index);
        debug!(id, "User deleted");
        Ok(removed)
    }

    async fn update_roles(&self, id: &str, roles: &str) -> Result<String, DatabaseError> {
        let mut users = self.users.lock().await;
        let index = Self::position(&users, id)?;
        users[index].roles = roles.to_string();
        debug!(id, roles, "Roles updated");
        Ok(users[index].roles.clone())
    }

    async fn update_profile(
        &self,
        id: &str,
        fio: &str,
        group_number: &str,
    ) -> Result<User, DatabaseError> {
        let mut users = self.users.lock().await;
        let index = Self::position(&users, id)?;
        let user = &mut users[index];
        user.fio = fio.to_string();
        user.group_number = group_number.to_string();
        debug!(id, "Profile updated");
        Ok(user.clone())
    }

    async fn replace_user(&self, id: &str, replacement: User) -> Result<User, DatabaseError> {
        let mut users = self.users.lock().await;
        let index = Self::position(&users, id)?;
        users[index] = replacement.clone();
        debug!(id, "User replaced");
        Ok(replacement)
    }
}
