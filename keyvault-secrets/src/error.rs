//! Secret store error types and formatting

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The collection a lookup was made against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// An active secret
    Secret,
    /// A soft-deleted secret awaiting recovery or purge
    DeletedSecret,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Secret => "Secret",
            Self::DeletedSecret => "Deleted secret",
        }
    }

    /// Service error code reported for a failed lookup
    pub fn code(&self) -> &'static str {
        match self {
            Self::Secret => "SecretNotFound",
            Self::DeletedSecret => "DeletedSecretNotFound",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            Self::Secret | Self::DeletedSecret => 404,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Secret store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretError {
    #[error("{kind} with name '{name}' not found.")]
    NotFound { kind: EntityKind, name: String },
}

impl SecretError {
    pub(crate) fn secret_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: EntityKind::Secret,
            name: name.into(),
        }
    }

    pub(crate) fn deleted_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: EntityKind::DeletedSecret,
            name: name.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { kind, .. } => kind.code(),
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            Self::NotFound { kind, .. } => kind.http_status(),
        }
    }

    /// Name of the secret the failed operation referenced
    pub fn name(&self) -> &str {
        match self {
            Self::NotFound { name, .. } => name,
        }
    }

    /// Format as a Key Vault-style JSON error body
    pub fn to_json(&self) -> String {
        #[derive(Serialize)]
        struct Body<'a> {
            error: Inner<'a>,
        }

        #[derive(Serialize)]
        struct Inner<'a> {
            code: &'a str,
            message: String,
        }

        let body = Body {
            error: Inner {
                code: self.code(),
                message: self.to_string(),
            },
        };

        serde_json::to_string(&body).unwrap_or_else(|_| {
            format!(
                r#"{{"error":{{"code":"{}","message":"{}"}}}}"#,
                self.code(),
                self
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_not_found_message() {
        let error = SecretError::secret_not_found("TestSecret");
        assert_eq!(error.to_string(), "Secret with name 'TestSecret' not found.");
        assert_eq!(error.code(), "SecretNotFound");
        assert_eq!(error.http_status(), 404);
        assert_eq!(error.name(), "TestSecret");
    }

    #[test]
    fn test_deleted_secret_not_found_message() {
        let error = SecretError::deleted_not_found("X");
        assert_eq!(error.to_string(), "Deleted secret with name 'X' not found.");
        assert_eq!(error.code(), "DeletedSecretNotFound");
    }

    #[test]
    fn test_error_json_format() {
        let error = SecretError::deleted_not_found("db-password");

        let json: serde_json::Value = serde_json::from_str(&error.to_json()).unwrap();
        assert_eq!(json["error"]["code"], "DeletedSecretNotFound");
        assert_eq!(
            json["error"]["message"],
            "Deleted secret with name 'db-password' not found."
        );
    }
}
