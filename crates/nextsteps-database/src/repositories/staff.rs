//! Staff repository implementation.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use nextsteps_core::error::AppError;
use nextsteps_core::result::AppResult;
use nextsteps_core::traits::DocumentStore;
use nextsteps_core::types::{Fields, Filter};
use nextsteps_core::types::document::to_fields;
use nextsteps_entity::collections;
use nextsteps_entity::staff::{NewStaff, Staff};

use super::decode_all;

/// Repository for colleague accounts and their PIN reservations.
#[derive(Debug, Clone)]
pub struct StaffRepository {
    store: Arc<dyn DocumentStore>,
}

impl StaffRepository {
    /// Create a new staff repository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Find a colleague by document id.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Staff>> {
        match self.store.get(collections::STAFF, id).await? {
            Some(doc) => doc.decode().map(Some),
            None => Ok(None),
        }
    }

    /// Every colleague whose PIN equals `pin` exactly, in store order.
    pub async fn find_by_pin(&self, pin: &str) -> AppResult<Vec<Staff>> {
        let docs = self
            .store
            .query(collections::STAFF, &Filter::eq("pin", pin))
            .await?;
        Ok(decode_all(collections::STAFF, &docs))
    }

    /// List all colleagues.
    pub async fn find_all(&self) -> AppResult<Vec<Staff>> {
        let docs = self.store.query(collections::STAFF, &Filter::all()).await?;
        Ok(decode_all(collections::STAFF, &docs))
    }

    /// Count stored colleague documents.
    pub async fn count(&self) -> AppResult<usize> {
        Ok(self
            .store
            .query(collections::STAFF, &Filter::all())
            .await?
            .len())
    }

    /// Whether any stored colleague already uses `pin`.
    pub async fn pin_in_use(&self, pin: &str) -> AppResult<bool> {
        let docs = self
            .store
            .query(collections::STAFF, &Filter::eq("pin", pin))
            .await?;
        Ok(!docs.is_empty())
    }

    /// Reserve `pin` for a colleague about to be written.
    ///
    /// The reservation is a create-only document keyed by the PIN, so two
    /// concurrent writers cannot both succeed.
    pub async fn claim_pin(&self, pin: &str, holder: &str) -> AppResult<()> {
        let mut fields = Fields::new();
        fields.insert("holder".into(), Value::from(holder));
        fields.insert("claimedAt".into(), self.store.server_timestamp());

        self.store
            .create(collections::PIN_CLAIMS, pin, fields)
            .await
            .map_err(|e| {
                if e.is_conflict() {
                    AppError::conflict("PIN already in use")
                } else {
                    e
                }
            })
    }

    /// Drop a PIN reservation, e.g. after the colleague write failed.
    pub async fn release_pin_claim(&self, pin: &str) -> AppResult<()> {
        self.store.delete(collections::PIN_CLAIMS, pin).await
    }

    /// Insert a colleague under a store-generated id.
    pub async fn create(&self, data: &NewStaff) -> AppResult<Staff> {
        let id = self
            .store
            .insert(collections::STAFF, to_fields(data)?)
            .await?;
        debug!(staff_id = %id, role = %data.role, "Created staff record");
        Ok(Self::materialize(id, data))
    }

    /// Create a colleague at a caller-chosen id.
    ///
    /// Fails with a conflict, leaving the existing record untouched, when
    /// the id is already taken.
    pub async fn create_with_id(&self, id: &str, data: &NewStaff) -> AppResult<Staff> {
        self.store
            .create(collections::STAFF, id, to_fields(data)?)
            .await
            .map_err(|e| {
                if e.is_conflict() {
                    AppError::conflict(format!("Staff record '{id}' already exists"))
                } else {
                    e
                }
            })?;
        debug!(staff_id = %id, role = %data.role, "Created staff record at fixed id");
        Ok(Self::materialize(id.to_string(), data))
    }

    fn materialize(id: String, data: &NewStaff) -> Staff {
        Staff {
            id,
            name: data.name.clone(),
            departments: data.departments.clone(),
            pin: data.pin.clone(),
            role: data.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDocumentStore;
    use nextsteps_entity::staff::StaffRole;

    fn repo() -> StaffRepository {
        StaffRepository::new(Arc::new(MemoryDocumentStore::new(16)))
    }

    fn new_staff(name: &str, pin: &str, role: StaffRole) -> NewStaff {
        NewStaff {
            name: name.into(),
            departments: vec!["Frozen".into()],
            pin: pin.into(),
            role,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_by_pin() {
        let repo = repo();
        let created = repo
            .create(&new_staff("Priya", "123456", StaffRole::Manager))
            .await
            .unwrap();

        let found = repo.find_by_pin("123456").await.unwrap();
        assert_eq!(found, vec![created.clone()]);
        assert!(repo.find_by_pin("654321").await.unwrap().is_empty());

        let by_id = repo.find_by_id(&created.id).await.unwrap();
        assert_eq!(by_id, Some(created));
        assert!(repo.pin_in_use("123456").await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_with_id_uses_given_id() {
        let repo = repo();
        let staff = repo
            .create_with_id("token-1", &new_staff("Sam", "222222", StaffRole::Staff))
            .await
            .unwrap();
        assert_eq!(staff.id, "token-1");
        assert_eq!(
            repo.find_by_id("token-1").await.unwrap().map(|s| s.name),
            Some("Sam".to_string())
        );
    }

    #[tokio::test]
    async fn test_create_with_id_never_overwrites() {
        let repo = repo();
        repo.create_with_id("token-1", &new_staff("Sam", "222222", StaffRole::Staff))
            .await
            .unwrap();
        let err = repo
            .create_with_id("token-1", &new_staff("Eve", "444444", StaffRole::Manager))
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        let kept = repo.find_by_id("token-1").await.unwrap().unwrap();
        assert_eq!(kept.name, "Sam");
        assert_eq!(kept.pin, "222222");
        assert!(!repo.pin_in_use("444444").await.unwrap());
    }

    #[tokio::test]
    async fn test_pin_claim_is_exclusive() {
        let repo = repo();
        repo.claim_pin("333333", "a").await.unwrap();
        let err = repo.claim_pin("333333", "b").await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(err.message, "PIN already in use");

        repo.release_pin_claim("333333").await.unwrap();
        repo.claim_pin("333333", "b").await.unwrap();
    }
}
