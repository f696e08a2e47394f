use chrono::Utc;
use thiserror::Error;

use crate::api::ApiClient;
use crate::fixtures::DemoUser;
use crate::model::User;

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("invalid username or password")]
    BadCredentials,
}

/// How a login was satisfied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginMode {
    Remote,
    Demo,
}

/// Authenticated identity for the current run. Passed by reference wherever
/// it is needed; there is no ambient singleton.
#[derive(Clone, Debug, Default)]
pub struct Session {
    token: Option<String>,
    user: Option<User>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_restricted(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_restricted())
    }

    pub fn set_auth(&mut self, token: String, user: User) {
        self.token = Some(token);
        self.user = Some(user);
    }

    /// Logout. Mirrors built under this session are stale afterwards and
    /// must be reloaded before use.
    pub fn reset(&mut self) {
        self.token = None;
        self.user = None;
    }

    /// Authenticate against the API, falling back to the demo allow-list
    /// when the API cannot answer. A credential mismatch leaves the session
    /// untouched.
    pub async fn login(
        &mut self,
        api: &ApiClient,
        username: &str,
        password: &str,
        allow_list: &[DemoUser],
    ) -> Result<LoginMode, LoginError> {
        match api.login(username, password).await {
            Ok(resp) => {
                self.set_auth(resp.token, resp.user);
                Ok(LoginMode::Remote)
            }
            Err(_) => {
                let matched = allow_list
                    .iter()
                    .find(|u| u.username == username && u.password == password)
                    .ok_or(LoginError::BadCredentials)?;
                let token = format!("demo-token-{}", Utc::now().timestamp_millis());
                self.set_auth(token, matched.user.clone());
                Ok(LoginMode::Demo)
            }
        }
    }

    #[cfg(test)]
    pub fn with_user(user: User) -> Self {
        Self {
            token: Some("test-token".to_string()),
            user: Some(user),
        }
    }
}
