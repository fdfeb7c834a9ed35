use crate::error::{AppError, AuthError};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Permissions {
    None,
    Read,
    Write,
    Delete,
}

impl FromStr for Permissions {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Permissions::None),
            "read" => Ok(Permissions::Read),
            "write" => Ok(Permissions::Write),
            "delete" => Ok(Permissions::Delete),
            other => Err(AppError::MalformedResponse(format!(
                "unknown permission level: {other}"
            ))),
        }
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Permissions::None => "none",
            Permissions::Read => "read",
            Permissions::Write => "write",
            Permissions::Delete => "delete",
        };
        write!(f, "{s}")
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub permissions: Permissions,
}

impl AccessToken {
    pub fn new(token: impl Into<String>, permissions: Permissions) -> Self {
        Self {
            token: token.into(),
            permissions,
        }
    }

    pub fn can_upload(&self) -> bool {
        self.permissions >= Permissions::Write
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("permissions", &self.permissions)
            .finish()
    }
}

/// The interactive half of the handshake: show the user the authorization page
/// and wait for them to say whether they granted access.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Authorizer: Send + Sync {
    async fn authorize(&self, url: &str) -> Result<bool, AuthError>;
}
