//! Key Vault secrets in-memory storage

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::SecretError;

/// Metadata attached to a secret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretProperties {
    /// Secret name
    pub name: String,
    /// Whether the secret is enabled (stored, not enforced)
    pub enabled: bool,
    /// Not valid before this date (stored, not enforced)
    pub not_before: Option<DateTime<Utc>>,
    /// Expiry date (stored, not enforced)
    pub expires_on: Option<DateTime<Utc>>,
    /// Content type hint for the value
    pub content_type: Option<String>,
    /// Tags
    pub tags: HashMap<String, String>,
    /// Creation date
    pub created_on: DateTime<Utc>,
    /// Last properties update
    pub updated_on: Option<DateTime<Utc>>,
    /// Set while the secret sits in the deleted collection
    pub deleted: bool,
}

impl SecretProperties {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            not_before: None,
            expires_on: None,
            content_type: None,
            tags: HashMap::new(),
            created_on: Utc::now(),
            updated_on: None,
            deleted: false,
        }
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

/// A secret with its value and properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyVaultSecret {
    pub name: String,
    pub value: String,
    pub properties: SecretProperties,
}

impl KeyVaultSecret {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            properties: SecretProperties::new(name.clone()),
            name,
            value: value.into(),
        }
    }
}

/// A secret loaded into the store at start-up
#[derive(Debug, Clone, Deserialize)]
pub struct SeedSecret {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// Both secret collections; a name lives in at most one of them
#[derive(Debug, Default)]
struct Vault {
    /// Active secrets indexed by name
    active: HashMap<String, KeyVaultSecret>,
    /// Soft-deleted secrets in deletion order
    deleted: Vec<KeyVaultSecret>,
}

impl Vault {
    fn deleted_position(&self, name: &str) -> Option<usize> {
        self.deleted.iter().position(|s| s.name == name)
    }
}

/// In-memory storage for secrets
#[derive(Debug, Default)]
pub struct SecretStore {
    vault: Mutex<Vault>,
}

impl SecretStore {
    pub fn new() -> Self {
        Self {
            vault: Mutex::new(Vault::default()),
        }
    }

    /// Create a store ready to be shared between callers
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Create a store pre-populated with seed secrets
    pub fn from_seeds(seeds: impl IntoIterator<Item = SeedSecret>) -> Self {
        let store = Self::new();
        {
            let mut vault = store.vault.lock();
            for seed in seeds {
                let mut secret = KeyVaultSecret::new(seed.name, seed.value);
                secret.properties.content_type = seed.content_type;
                secret.properties.tags = seed.tags;
                debug!(name = %secret.name, "Seeding secret");
                vault.active.insert(secret.name.clone(), secret);
            }
        }
        store
    }

    /// Get an active secret by name
    pub fn get(&self, name: &str) -> Result<KeyVaultSecret, SecretError> {
        info!(name = %name, "Getting secret");
        self.vault.lock().active.get(name).cloned().ok_or_else(|| {
            warn!(name = %name, "Secret not found");
            SecretError::secret_not_found(name)
        })
    }

    /// Create or overwrite a secret
    pub fn set(&self, name: &str, value: &str) -> KeyVaultSecret {
        info!(name = %name, "Setting secret");
        let secret = KeyVaultSecret::new(name, value);

        let mut vault = self.vault.lock();
        // A new secret supersedes any soft-deleted one of the same name
        if let Some(pos) = vault.deleted_position(name) {
            debug!(name = %name, "Dropping deleted secret superseded by set");
            vault.deleted.remove(pos);
        }
        vault.active.insert(name.to_string(), secret.clone());
        secret
    }

    /// Soft-delete an active secret
    pub fn delete(&self, name: &str) -> Result<(), SecretError> {
        info!(name = %name, "Deleting secret");
        let mut vault = self.vault.lock();
        let mut secret = vault.active.remove(name).ok_or_else(|| {
            warn!(name = %name, "Secret not found");
            SecretError::secret_not_found(name)
        })?;

        secret.properties.deleted = true;
        vault.deleted.push(secret);
        Ok(())
    }

    /// Permanently remove a deleted secret
    pub fn purge(&self, name: &str) -> Result<(), SecretError> {
        info!(name = %name, "Purging deleted secret");
        let mut vault = self.vault.lock();
        let pos = vault.deleted_position(name).ok_or_else(|| {
            warn!(name = %name, "Deleted secret not found");
            SecretError::deleted_not_found(name)
        })?;

        vault.deleted.remove(pos);
        Ok(())
    }

    /// Move a deleted secret back to the active collection
    pub fn recover(&self, name: &str) -> Result<(), SecretError> {
        info!(name = %name, "Recovering deleted secret");
        let mut vault = self.vault.lock();
        let pos = vault.deleted_position(name).ok_or_else(|| {
            warn!(name = %name, "Deleted secret not found");
            SecretError::deleted_not_found(name)
        })?;

        let mut secret = vault.deleted.remove(pos);
        secret.properties.deleted = false;
        vault.active.insert(name.to_string(), secret);
        Ok(())
    }

    /// Replace the properties of an active secret, leaving its value alone
    pub fn update_properties(&self, properties: SecretProperties) -> Result<(), SecretError> {
        info!(name = %properties.name, "Updating secret properties");
        let mut vault = self.vault.lock();
        let Some(secret) = vault.active.get_mut(&properties.name) else {
            warn!(name = %properties.name, "Secret not found");
            return Err(SecretError::secret_not_found(properties.name));
        };

        secret.properties = SecretProperties {
            updated_on: Some(Utc::now()),
            deleted: false,
            ..properties
        };
        Ok(())
    }

    /// List the properties of every active secret
    ///
    /// Iteration order is unspecified. The listing is a snapshot taken at call
    /// time; call again to observe later changes.
    pub fn list_properties(&self) -> SecretPropertiesIter {
        debug!("Listing secret properties");
        let snapshot: Vec<SecretProperties> = self
            .vault
            .lock()
            .active
            .values()
            .map(|s| s.properties.clone())
            .collect();

        SecretPropertiesIter {
            inner: snapshot.into_iter(),
        }
    }

    /// List every deleted secret, oldest deletion first
    pub fn list_deleted(&self) -> DeletedSecrets {
        debug!("Listing deleted secrets");
        let snapshot = self.vault.lock().deleted.clone();

        DeletedSecrets {
            inner: snapshot.into_iter(),
        }
    }
}

/// Iterator over active secret properties
#[derive(Debug)]
pub struct SecretPropertiesIter {
    inner: std::vec::IntoIter<SecretProperties>,
}

impl Iterator for SecretPropertiesIter {
    type Item = SecretProperties;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for SecretPropertiesIter {}

/// Iterator over deleted secrets in deletion order
#[derive(Debug)]
pub struct DeletedSecrets {
    inner: std::vec::IntoIter<KeyVaultSecret>,
}

impl Iterator for DeletedSecrets {
    type Item = KeyVaultSecret;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for DeletedSecrets {}
