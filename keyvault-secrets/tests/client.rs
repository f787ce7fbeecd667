//! Integration tests for the secrets client
//!
//! These tests drive the emulator through the `SecretClient` trait, the same
//! way application code would.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine};
use futures::StreamExt;
use keyvault_secrets::{EntityKind, SecretClient, SecretError, SecretProperties, SecretStore};

fn client() -> Arc<dyn SecretClient> {
    SecretStore::shared()
}

#[tokio::test]
async fn set_secret_stores_secret() {
    let client = client();

    let secret = client.set_secret("TestSecret", "SecretValue").await.unwrap();

    assert_eq!(secret.name, "TestSecret");
    assert_eq!(secret.value, "SecretValue");
}

#[tokio::test]
async fn get_secret_retrieves_secret() {
    let client = client();

    client.set_secret("TestSecret", "SecretValue").await.unwrap();
    let retrieved = client.get_secret("TestSecret").await.unwrap();

    assert_eq!(retrieved.name, "TestSecret");
    assert_eq!(retrieved.value, "SecretValue");
}

#[tokio::test]
async fn binary_payload_round_trips_as_base64() {
    let client = client();
    let data: [u8; 5] = [1, 2, 3, 4, 5];
    let encoded = STANDARD.encode(data);

    client.set_secret("ByteArraySecret", &encoded).await.unwrap();
    let retrieved = client.get_secret("ByteArraySecret").await.unwrap();

    assert_eq!(retrieved.value, encoded);
    assert_eq!(STANDARD.decode(&retrieved.value).unwrap(), data);
}

#[tokio::test]
async fn delete_secret_hides_it_from_get() {
    let client = client();

    client
        .set_secret("TestSecretToDelete", "SecretValueToDelete")
        .await
        .unwrap();
    client.delete_secret("TestSecretToDelete").await.unwrap();

    let err = client.get_secret("TestSecretToDelete").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Secret with name 'TestSecretToDelete' not found."
    );
}

#[tokio::test]
async fn purge_deleted_secret_removes_it_permanently() {
    let client = client();

    client
        .set_secret("TestSecretToPurge", "SecretValueToPurge")
        .await
        .unwrap();
    client.delete_secret("TestSecretToPurge").await.unwrap();
    client.purge_deleted_secret("TestSecretToPurge").await.unwrap();

    let err = client
        .recover_deleted_secret("TestSecretToPurge")
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Deleted secret with name 'TestSecretToPurge' not found."
    );
    assert_eq!(
        err,
        SecretError::NotFound {
            kind: EntityKind::DeletedSecret,
            name: "TestSecretToPurge".to_string(),
        }
    );
}

#[tokio::test]
async fn recover_deleted_secret_restores_it() {
    let client = client();

    client
        .set_secret("TestSecretToRecover", "SecretValueToRecover")
        .await
        .unwrap();
    client.delete_secret("TestSecretToRecover").await.unwrap();
    client
        .recover_deleted_secret("TestSecretToRecover")
        .await
        .unwrap();

    let recovered = client.get_secret("TestSecretToRecover").await.unwrap();
    assert_eq!(recovered.name, "TestSecretToRecover");
    assert_eq!(recovered.value, "SecretValueToRecover");
}

#[tokio::test]
async fn update_secret_properties_applies_metadata() {
    let client = client();

    client
        .set_secret("TestSecretToUpdate", "SecretValueToUpdate")
        .await
        .unwrap();
    let properties = SecretProperties::new("TestSecretToUpdate")
        .with_content_type("text/plain")
        .with_tag("Environment", "Test");

    client.update_secret_properties(properties).await.unwrap();
    let updated = client.get_secret("TestSecretToUpdate").await.unwrap();

    assert_eq!(updated.properties.name, "TestSecretToUpdate");
    assert_eq!(updated.properties.content_type.as_deref(), Some("text/plain"));
    assert_eq!(
        updated.properties.tags.get("Environment").map(String::as_str),
        Some("Test")
    );
    assert_eq!(updated.value, "SecretValueToUpdate");
}

#[tokio::test]
async fn update_missing_secret_fails() {
    let client = client();

    let err = client
        .update_secret_properties(SecretProperties::new("ghost"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Secret with name 'ghost' not found.");
}

#[tokio::test]
async fn list_deleted_secrets_in_deletion_order() {
    let client = client();

    client.set_secret("a", "1").await.unwrap();
    client.set_secret("b", "2").await.unwrap();
    client.delete_secret("a").await.unwrap();
    client.delete_secret("b").await.unwrap();

    let names: Vec<String> = client
        .list_deleted_secrets()
        .map(|s| s.name)
        .collect()
        .await;
    assert_eq!(names, vec!["a", "b"]);
}

#[tokio::test]
async fn list_properties_of_secrets_reflects_active_set() {
    let client = client();

    client.set_secret("one", "1").await.unwrap();
    client.set_secret("two", "2").await.unwrap();
    client.delete_secret("one").await.unwrap();

    let props: Vec<SecretProperties> = client.list_properties_of_secrets().collect().await;
    assert_eq!(props.len(), 1);
    assert_eq!(props[0].name, "two");
    assert!(!props[0].deleted);
}
