//! Invitation issue, lookup and claim.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use nextsteps_auth::{Capability, PinValidator, RbacEnforcer};
use nextsteps_core::config::InvitationConfig;
use nextsteps_core::error::AppError;
use nextsteps_core::result::AppResult;
use nextsteps_database::repositories::{InvitationRepository, StaffRepository};
use nextsteps_entity::invitation::{NewInvitation, PendingInvitation};
use nextsteps_entity::staff::{NewStaff, Staff, StaffRole};

use crate::catalog::DepartmentCatalog;
use crate::context::ActorContext;
use crate::pin_registry;

use super::link::setup_link;

/// Message for a token that matches no pending invitation.
pub const LINK_INVALID: &str = "This setup link is no longer valid.";

/// Message for a token whose colleague has already been created.
pub const LINK_USED: &str = "This setup link has already been used.";

/// A freshly issued setup link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupLink {
    /// Invitation token.
    pub token: String,
    /// Full URL to hand to the invitee.
    pub url: String,
}

/// A pending invitation found by its token, ready to be claimed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSetup {
    /// Document id of the invitation.
    pub invitation_id: String,
    /// Token from the link; becomes the colleague's id.
    pub token: String,
    /// Invitee's display name.
    pub name: String,
    /// Departments the invitee will belong to.
    pub departments: Vec<String>,
}

impl From<PendingInvitation> for PendingSetup {
    fn from(inv: PendingInvitation) -> Self {
        Self {
            invitation_id: inv.id,
            token: inv.token,
            name: inv.name,
            departments: inv.departments,
        }
    }
}

/// Issues setup links and turns claimed invitations into colleagues.
#[derive(Debug, Clone)]
pub struct InvitationService {
    invitations: InvitationRepository,
    staff: StaffRepository,
    rbac: RbacEnforcer,
    pins: PinValidator,
    catalog: DepartmentCatalog,
    config: InvitationConfig,
}

impl InvitationService {
    /// Creates a new invitation service.
    pub fn new(
        invitations: InvitationRepository,
        staff: StaffRepository,
        rbac: RbacEnforcer,
        catalog: DepartmentCatalog,
        config: InvitationConfig,
    ) -> Self {
        Self {
            invitations,
            staff,
            rbac,
            pins: PinValidator::new(),
            catalog,
            config,
        }
    }

    /// Issues a setup link for a prospective colleague.
    pub async fn generate_link(
        &self,
        ctx: &ActorContext,
        data: NewInvitation,
    ) -> AppResult<SetupLink> {
        self.rbac.require(&ctx.staff, Capability::InvitationCreate)?;
        data.validate()?;
        self.catalog.validate_all(&data.departments)?;

        let token = Uuid::new_v4().to_string();
        let url = setup_link(&self.config.setup_base_url, &token)?;
        let id = self.invitations.create(&data, &token).await?;

        info!(invitation_id = %id, issued_by = %ctx.staff_id(), "Setup link issued");
        Ok(SetupLink { token, url })
    }

    /// Resolves a token to its pending invitation.
    ///
    /// Unknown tokens and invitations past their TTL are both reported as
    /// not found; the expired invitation is removed.
    pub async fn lookup(&self, token: &str) -> AppResult<PendingSetup> {
        if token.is_empty() {
            return Err(AppError::validation("Missing token."));
        }

        let invitation = self
            .invitations
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::not_found(LINK_INVALID))?;

        if invitation.is_expired(Utc::now().timestamp_millis(), self.ttl_millis()) {
            info!(invitation_id = %invitation.id, "Setup link expired");
            if let Err(e) = self.invitations.delete(&invitation.id).await {
                warn!(invitation_id = %invitation.id, error = %e, "Failed to delete expired invitation");
            }
            return Err(AppError::not_found("This setup link has expired."));
        }

        Ok(invitation.into())
    }

    /// Claims an invitation with the invitee's chosen PIN.
    ///
    /// Creates the colleague at `id = token` with the staff role, then
    /// deletes the invitation. A PIN collision writes nothing.
    pub async fn claim(&self, setup: PendingSetup, pin: &str) -> AppResult<Staff> {
        self.pins.validate(pin)?;

        if self.staff.find_by_id(&setup.token).await?.is_some() {
            return Err(AppError::conflict(LINK_USED));
        }

        pin_registry::reserve(&self.staff, pin, &setup.token).await?;

        let data = NewStaff {
            name: setup.name.clone(),
            departments: setup.departments.clone(),
            pin: pin.to_string(),
            role: StaffRole::Staff,
        };
        let staff = match self.staff.create_with_id(&setup.token, &data).await {
            Ok(staff) => staff,
            Err(e) => {
                pin_registry::release(&self.staff, pin).await;
                return Err(if e.is_conflict() {
                    AppError::conflict(LINK_USED)
                } else {
                    e
                });
            }
        };

        if let Err(e) = self.invitations.delete(&setup.invitation_id).await {
            warn!(
                invitation_id = %setup.invitation_id,
                error = %e,
                "Colleague created but invitation not deleted"
            );
        }

        info!(staff_id = %staff.id, "Setup link claimed");
        Ok(staff)
    }

    /// Every invitation still waiting to be claimed.
    pub async fn pending(&self, ctx: &ActorContext) -> AppResult<Vec<PendingInvitation>> {
        self.rbac.require(&ctx.staff, Capability::InvitationCreate)?;
        self.invitations.find_all().await
    }

    fn ttl_millis(&self) -> Option<i64> {
        match self.config.ttl_hours {
            0 => None,
            hours => Some(hours as i64 * 60 * 60 * 1000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::Value;

    use nextsteps_core::error::ErrorKind;
    use nextsteps_core::traits::DocumentStore;
    use nextsteps_core::types::Fields;
    use nextsteps_database::MemoryDocumentStore;
    use nextsteps_entity::collections;

    use crate::invitation::token_from_link;

    struct Fixture {
        service: InvitationService,
        staff: StaffRepository,
        docs: Arc<dyn DocumentStore>,
    }

    fn fixture(ttl_hours: u64) -> Fixture {
        let docs: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new(16));
        let staff = StaffRepository::new(docs.clone());
        let service = InvitationService::new(
            InvitationRepository::new(docs.clone()),
            staff.clone(),
            RbacEnforcer::new(),
            DepartmentCatalog::default(),
            InvitationConfig {
                ttl_hours,
                ..InvitationConfig::default()
            },
        );
        Fixture {
            service,
            staff,
            docs,
        }
    }

    fn manager() -> ActorContext {
        ActorContext::new(Staff {
            id: "m1".into(),
            name: "Manager".into(),
            departments: vec!["Frozen".into()],
            pin: "999999".into(),
            role: StaffRole::Manager,
        })
    }

    fn invitation(name: &str) -> NewInvitation {
        NewInvitation {
            name: name.into(),
            departments: vec!["Clothing".into(), "Dot Com".into()],
        }
    }

    #[tokio::test]
    async fn test_generate_lookup_claim() {
        let fx = fixture(168);
        let link = fx
            .service
            .generate_link(&manager(), invitation("Sam"))
            .await
            .unwrap();
        assert!(link.url.starts_with("https://tesco-three.vercel.app/setup?token="));
        assert!(Uuid::parse_str(&link.token).is_ok());

        let token = token_from_link(&link.url).unwrap();
        let setup = fx.service.lookup(&token).await.unwrap();
        assert_eq!(setup.name, "Sam");

        let staff = fx.service.claim(setup, "246810").await.unwrap();
        assert_eq!(staff.id, link.token);
        assert_eq!(staff.role, StaffRole::Staff);
        assert_eq!(staff.departments, vec!["Clothing", "Dot Com"]);

        // PENDING -> CLAIMED: the invitation is gone.
        assert!(fx.service.lookup(&token).await.unwrap_err().is_not_found());
        assert_eq!(fx.staff.find_by_id(&token).await.unwrap(), Some(staff));
    }

    #[tokio::test]
    async fn test_claim_with_pin_in_use_creates_nothing() {
        let fx = fixture(168);
        fx.staff
            .create(&NewStaff {
                name: "Existing".into(),
                departments: vec!["BWS".into()],
                pin: "111111".into(),
                role: StaffRole::Staff,
            })
            .await
            .unwrap();

        let link = fx
            .service
            .generate_link(&manager(), invitation("Sam"))
            .await
            .unwrap();
        let setup = fx.service.lookup(&link.token).await.unwrap();

        let err = fx.service.claim(setup.clone(), "111111").await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(fx.staff.count().await.unwrap(), 1);
        assert!(fx.staff.find_by_id(&link.token).await.unwrap().is_none());

        // The invitation survives and can still be claimed with another PIN.
        assert!(fx.service.lookup(&link.token).await.is_ok());
        fx.service.claim(setup, "222222").await.unwrap();
    }

    #[tokio::test]
    async fn test_claim_twice_is_rejected() {
        let fx = fixture(168);
        let link = fx
            .service
            .generate_link(&manager(), invitation("Sam"))
            .await
            .unwrap();
        let setup = fx.service.lookup(&link.token).await.unwrap();
        fx.service.claim(setup.clone(), "333333").await.unwrap();

        let err = fx.service.claim(setup, "444444").await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(fx.staff.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_claims_keep_first_record() {
        let fx = fixture(168);
        let link = fx
            .service
            .generate_link(&manager(), invitation("Sam"))
            .await
            .unwrap();
        let setup = fx.service.lookup(&link.token).await.unwrap();

        let (first, second) = tokio::join!(
            fx.service.claim(setup.clone(), "333333"),
            fx.service.claim(setup, "444444"),
        );
        let (winner, loser) = match (first, second) {
            (Ok(staff), Err(e)) | (Err(e), Ok(staff)) => (staff, e),
            other => panic!("expected exactly one successful claim, got {other:?}"),
        };
        assert!(loser.is_conflict());
        assert_eq!(loser.message, LINK_USED);

        let stored = fx.staff.find_by_id(&link.token).await.unwrap().unwrap();
        assert_eq!(stored.pin, winner.pin);
        assert_eq!(fx.staff.count().await.unwrap(), 1);

        let losing_pin = if winner.pin == "333333" { "444444" } else { "333333" };
        assert!(fx.docs.get(collections::PIN_CLAIMS, losing_pin).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_existing_record_at_token_is_not_overwritten() {
        let fx = fixture(168);
        let link = fx
            .service
            .generate_link(&manager(), invitation("Sam"))
            .await
            .unwrap();
        let setup = fx.service.lookup(&link.token).await.unwrap();

        fx.staff
            .create_with_id(
                &link.token,
                &NewStaff {
                    name: "Eve".into(),
                    departments: vec!["Frozen".into()],
                    pin: "555555".into(),
                    role: StaffRole::Manager,
                },
            )
            .await
            .unwrap();

        let err = fx.service.claim(setup, "333333").await.unwrap_err();
        assert_eq!(err.message, LINK_USED);
        let kept = fx.staff.find_by_id(&link.token).await.unwrap().unwrap();
        assert_eq!(kept.name, "Eve");
        assert!(!fx.staff.pin_in_use("333333").await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_invitation() {
        let fx = fixture(1);
        let mut fields = Fields::new();
        fields.insert("token".into(), Value::from("old"));
        fields.insert("name".into(), Value::from("Late"));
        fields.insert("departments".into(), serde_json::json!(["Frozen"]));
        fields.insert(
            "createdAt".into(),
            Value::from(Utc::now().timestamp_millis() - 2 * 60 * 60 * 1000),
        );
        fx.docs
            .insert(collections::PENDING_INVITATIONS, fields)
            .await
            .unwrap();

        let err = fx.service.lookup("old").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.message, "This setup link has expired.");
        assert!(
            fx.service
                .pending(&manager())
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_zero_ttl_never_expires() {
        let fx = fixture(0);
        let mut fields = Fields::new();
        fields.insert("token".into(), Value::from("ancient"));
        fields.insert("name".into(), Value::from("Early"));
        fields.insert("department".into(), Value::from("Frozen"));
        fields.insert("createdAt".into(), Value::from(0));
        fx.docs
            .insert(collections::PENDING_INVITATIONS, fields)
            .await
            .unwrap();

        let setup = fx.service.lookup("ancient").await.unwrap();
        assert_eq!(setup.departments, vec!["Frozen"]);
    }

    #[tokio::test]
    async fn test_generate_requires_manager_and_fields() {
        let fx = fixture(168);
        let staff_actor = ActorContext::new(Staff {
            role: StaffRole::Staff,
            ..manager().staff
        });
        let err = fx
            .service
            .generate_link(&staff_actor, invitation("Sam"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        let err = fx
            .service
            .generate_link(
                &manager(),
                NewInvitation {
                    name: "Sam".into(),
                    departments: vec![],
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(fx.service.pending(&manager()).await.unwrap().is_empty());
    }
}
