use serde::{Deserialize, Serialize};

use crate::contract::model::{NewUser, Role};

/// Configuration for the accounts module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountsConfig {
    /// Create `admin` and `user` on startup when the users table is empty.
    #[serde(default = "default_seed")]
    pub seed_default_users: bool,
    #[serde(default = "default_admin_password")]
    pub admin_password: String,
    #[serde(default = "default_user_password")]
    pub user_password: String,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            seed_default_users: default_seed(),
            admin_password: default_admin_password(),
            user_password: default_user_password(),
        }
    }
}

impl AccountsConfig {
    pub fn default_users(&self) -> Vec<NewUser> {
        vec![
            NewUser {
                username: "admin".to_string(),
                password: self.admin_password.clone(),
                full_name: "Admin User".to_string(),
                role: Role::Admin,
            },
            NewUser {
                username: "user".to_string(),
                password: self.user_password.clone(),
                full_name: "Regular User".to_string(),
                role: Role::User,
            },
        ]
    }
}

fn default_seed() -> bool {
    true
}

fn default_admin_password() -> String {
    "admin123".to_string()
}

fn default_user_password() -> String {
    "user123".to_string()
}
