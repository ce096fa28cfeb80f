//! Pending invitation repository implementation.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use nextsteps_core::result::AppResult;
use nextsteps_core::traits::DocumentStore;
use nextsteps_core::types::document::to_fields;
use nextsteps_core::types::Filter;
use nextsteps_entity::collections;
use nextsteps_entity::invitation::{NewInvitation, PendingInvitation};

use super::decode_all;

/// Repository for outstanding PIN-setup invitations.
#[derive(Debug, Clone)]
pub struct InvitationRepository {
    store: Arc<dyn DocumentStore>,
}

impl InvitationRepository {
    /// Create a new invitation repository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Store a pending invitation carrying `token` and return its document id.
    pub async fn create(&self, data: &NewInvitation, token: &str) -> AppResult<String> {
        let mut fields = to_fields(data)?;
        fields.insert("token".into(), Value::from(token));
        fields.insert("createdAt".into(), self.store.server_timestamp());

        let id = self
            .store
            .insert(collections::PENDING_INVITATIONS, fields)
            .await?;
        debug!(invitation_id = %id, "Created pending invitation");
        Ok(id)
    }

    /// Find the first pending invitation carrying `token`.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<PendingInvitation>> {
        let docs = self
            .store
            .query(collections::PENDING_INVITATIONS, &Filter::eq("token", token))
            .await?;
        Ok(decode_all(collections::PENDING_INVITATIONS, &docs)
            .into_iter()
            .next())
    }

    /// List every pending invitation.
    pub async fn find_all(&self) -> AppResult<Vec<PendingInvitation>> {
        let docs = self
            .store
            .query(collections::PENDING_INVITATIONS, &Filter::all())
            .await?;
        Ok(decode_all(collections::PENDING_INVITATIONS, &docs))
    }

    /// Remove an invitation by document id.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.store
            .delete(collections::PENDING_INVITATIONS, id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDocumentStore;

    #[tokio::test]
    async fn test_create_find_delete() {
        let repo = InvitationRepository::new(Arc::new(MemoryDocumentStore::new(16)));
        let data = NewInvitation {
            name: "Sam".into(),
            departments: vec!["Clothing".into(), "Dot Com".into()],
        };
        let id = repo.create(&data, "tok-1").await.unwrap();

        let found = repo.find_by_token("tok-1").await.unwrap().expect("invitation");
        assert_eq!(found.id, id);
        assert_eq!(found.token, "tok-1");
        assert_eq!(found.departments, data.departments);
        assert!(found.created_at > 0);

        assert!(repo.find_by_token("TOK-1").await.unwrap().is_none());

        repo.delete(&id).await.unwrap();
        assert!(repo.find_all().await.unwrap().is_empty());
    }
}
