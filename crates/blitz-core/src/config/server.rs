//! HTTP server and session authentication configuration.

use serde::{Deserialize, Serialize};

use crate::privilege::Privilege;

/// Configuration for the HTTP listener.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Socket address string, e.g. "127.0.0.1:8080".
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Users that may log in and open a session.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub users: Vec<AuthUser>,
}

/// Role of a configured user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    /// Privilege granted to a session opened by a user with this role.
    pub fn privilege(self) -> Privilege {
        match self {
            UserRole::User => Privilege::User,
            UserRole::Admin => Privilege::Admin,
        }
    }
}

/// A user allowed to log in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    /// Username.
    pub username: String,
    /// Password (prefer `password_env`).
    #[serde(default)]
    pub password: Option<String>,
    /// Environment variable containing the password.
    #[serde(default)]
    pub password_env: Option<String>,
    /// Role granted on login.
    #[serde(default)]
    pub role: UserRole,
}

impl AuthUser {
    /// Get the password, checking password_env first.
    pub fn get_password(&self) -> Option<String> {
        if let Some(env_var) = &self.password_env
            && let Ok(password) = std::env::var(env_var)
        {
            return Some(password);
        }
        self.password.clone()
    }
}

impl AuthConfig {
    /// Find the user matching the given credentials.
    ///
    /// Users without a resolvable password can never log in.
    pub fn validate_credentials(&self, username: &str, password: &str) -> Option<&AuthUser> {
        self.users.iter().find(|user| {
            user.username == username
                && user
                    .get_password()
                    .is_some_and(|expected| !expected.is_empty() && expected == password)
        })
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}
