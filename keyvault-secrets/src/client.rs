//! Async secrets client interface

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;

use crate::error::SecretError;
use crate::storage::{KeyVaultSecret, SecretProperties, SecretStore};

/// Secrets client operations, shaped like a remote Key Vault client so callers
/// can swap the emulator for a real backend.
#[async_trait]
pub trait SecretClient: Send + Sync {
    /// Get an active secret
    async fn get_secret(&self, name: &str) -> Result<KeyVaultSecret, SecretError>;

    /// Create or overwrite a secret
    async fn set_secret(&self, name: &str, value: &str) -> Result<KeyVaultSecret, SecretError>;

    /// Soft-delete a secret
    async fn delete_secret(&self, name: &str) -> Result<(), SecretError>;

    /// Permanently remove a deleted secret
    async fn purge_deleted_secret(&self, name: &str) -> Result<(), SecretError>;

    /// Restore a deleted secret
    async fn recover_deleted_secret(&self, name: &str) -> Result<(), SecretError>;

    /// Replace the properties of an active secret
    async fn update_secret_properties(
        &self,
        properties: SecretProperties,
    ) -> Result<(), SecretError>;

    /// Stream the properties of all active secrets
    fn list_properties_of_secrets(&self) -> BoxStream<'static, SecretProperties>;

    /// Stream all deleted secrets in deletion order
    fn list_deleted_secrets(&self) -> BoxStream<'static, KeyVaultSecret>;
}

#[async_trait]
impl SecretClient for SecretStore {
    async fn get_secret(&self, name: &str) -> Result<KeyVaultSecret, SecretError> {
        self.get(name)
    }

    async fn set_secret(&self, name: &str, value: &str) -> Result<KeyVaultSecret, SecretError> {
        Ok(self.set(name, value))
    }

    async fn delete_secret(&self, name: &str) -> Result<(), SecretError> {
        self.delete(name)
    }

    async fn purge_deleted_secret(&self, name: &str) -> Result<(), SecretError> {
        self.purge(name)
    }

    async fn recover_deleted_secret(&self, name: &str) -> Result<(), SecretError> {
        self.recover(name)
    }

    async fn update_secret_properties(
        &self,
        properties: SecretProperties,
    ) -> Result<(), SecretError> {
        self.update_properties(properties)
    }

    fn list_properties_of_secrets(&self) -> BoxStream<'static, SecretProperties> {
        stream::iter(self.list_properties()).boxed()
    }

    fn list_deleted_secrets(&self) -> BoxStream<'static, KeyVaultSecret> {
        stream::iter(self.list_deleted()).boxed()
    }
}

#[async_trait]
impl<T: SecretClient + ?Sized> SecretClient for Arc<T> {
    async fn get_secret(&self, name: &str) -> Result<KeyVaultSecret, SecretError> {
        (**self).get_secret(name).await
    }

    async fn set_secret(&self, name: &str, value: &str) -> Result<KeyVaultSecret, SecretError> {
        (**self).set_secret(name, value).await
    }

    async fn delete_secret(&self, name: &str) -> Result<(), SecretError> {
        (**self).delete_secret(name).await
    }

    async fn purge_deleted_secret(&self, name: &str) -> Result<(), SecretError> {
        (**self).purge_deleted_secret(name).await
    }

    async fn recover_deleted_secret(&self, name: &str) -> Result<(), SecretError> {
        (**self).recover_deleted_secret(name).await
    }

    async fn update_secret_properties(
        &self,
        properties: SecretProperties,
    ) -> Result<(), SecretError> {
        (**self).update_secret_properties(properties).await
    }

    fn list_properties_of_secrets(&self) -> BoxStream<'static, SecretProperties> {
        (**self).list_properties_of_secrets()
    }

    fn list_deleted_secrets(&self) -> BoxStream<'static, KeyVaultSecret> {
        (**self).list_deleted_secrets()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trait_object_dispatch() {
        let client: Arc<dyn SecretClient> = SecretStore::shared();

        client.set_secret("my-secret", "value").await.unwrap();
        let secret = client.get_secret("my-secret").await.unwrap();
        assert_eq!(secret.value, "value");
    }

    #[tokio::test]
    async fn test_list_streams() {
        let store = SecretStore::new();
        store.set("a", "1");
        store.set("b", "2");
        store.delete("a").unwrap();

        let props: Vec<_> = store.list_properties_of_secrets().collect().await;
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].name, "b");

        let deleted: Vec<_> = store.list_deleted_secrets().collect().await;
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].name, "a");
    }
}
