use serde::{Deserialize, Serialize};

// Missing fields bind to empty strings, nothing is validated
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct User {
    pub github_id: String,
    pub telegram_id: String,
    pub roles: String,
    pub fio: String,
    pub group_number: String,
}

impl User {
    pub fn new(github_id: &str, telegram_id: &str) -> Self {
        Self {
            github_id: github_id.to_string(),
            telegram_id: telegram_id.to_string(),
            ..Default::default()
        }
    }

    pub fn with_roles(mut self, roles: &str) -> Self {
        self.roles = roles.to_string();
        self
    }

    pub fn with_profile(mut self, fio: &str, group_number: &str) -> Self {
        self.fio = fio.to_string();
        self.group_number = group_number.to_string();
        self
    }

    /// True when `id` equals either external identifier (exact, case-sensitive)
    pub fn has_identifier(&self, id: &str) -> bool {
        self.github_id == id || self.telegram_id == id
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct RolesUpdate {
    pub roles: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ProfileUpdate {
    pub fio: String,
    pub group_number: String,
}

// Users the in-memory store starts with when the config carries no seed
pub fn default_seed() -> Vec<User> {
    vec![
        User::new("11242", "8837hSh")
            .with_roles("Студент")
            .with_profile("Иван Кононский", "ИВТ-232"),
        User::new("1242", "49957hSh")
            .with_roles("Преподаватель")
            .with_profile("Вячеслав Белый", "ИВТ-232"),
        User::new("11", "14227hSh")
            .with_roles("Студент,Администратор")
            .with_profile("Иннокентий Васильев", "ИВТ-232"),
    ]
}
