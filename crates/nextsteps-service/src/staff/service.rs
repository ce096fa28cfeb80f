//! Colleague account operations for managers.

use tracing::info;
use validator::Validate;

use nextsteps_auth::{Capability, PinValidator, RbacEnforcer};
use nextsteps_core::error::AppError;
use nextsteps_core::result::AppResult;
use nextsteps_database::repositories::StaffRepository;
use nextsteps_entity::staff::{NewStaff, Staff, StaffRole};

use crate::catalog::DepartmentCatalog;
use crate::context::ActorContext;
use crate::pin_registry;

/// Handles adding and listing colleagues.
#[derive(Debug, Clone)]
pub struct StaffService {
    /// Staff repository.
    repo: StaffRepository,
    /// Capability checks.
    rbac: RbacEnforcer,
    /// PIN format policy.
    pins: PinValidator,
    /// Departments a colleague may belong to.
    catalog: DepartmentCatalog,
}

impl StaffService {
    /// Creates a new staff service.
    pub fn new(repo: StaffRepository, rbac: RbacEnforcer, catalog: DepartmentCatalog) -> Self {
        Self {
            repo,
            rbac,
            pins: PinValidator::new(),
            catalog,
        }
    }

    /// Adds a colleague with a manager-chosen PIN.
    ///
    /// Fails with a conflict, writing nothing, when the PIN is taken.
    pub async fn add_colleague(&self, ctx: &ActorContext, data: NewStaff) -> AppResult<Staff> {
        self.rbac.require(&ctx.staff, Capability::StaffAdd)?;
        self.insert(data).await.inspect(|staff| {
            info!(
                staff_id = %staff.id,
                added_by = %ctx.staff_id(),
                role = %staff.role,
                "Colleague added"
            );
        })
    }

    /// Lists every colleague.
    pub async fn list_colleagues(&self, ctx: &ActorContext) -> AppResult<Vec<Staff>> {
        self.rbac.require(&ctx.staff, Capability::StaffList)?;
        self.repo.find_all().await
    }

    /// Creates the first manager on an empty store.
    ///
    /// Refused once any colleague exists, so it cannot be used to mint a
    /// manager account later.
    pub async fn bootstrap_manager(&self, mut data: NewStaff) -> AppResult<Staff> {
        if self.repo.count().await? > 0 {
            return Err(AppError::conflict(
                "Colleagues already exist; ask a manager to add you",
            ));
        }
        data.role = StaffRole::Manager;
        let staff = self.insert(data).await?;
        info!(staff_id = %staff.id, "Bootstrapped first manager");
        Ok(staff)
    }

    async fn insert(&self, data: NewStaff) -> AppResult<Staff> {
        data.validate()?;
        self.pins.validate(&data.pin)?;
        self.catalog.validate_all(&data.departments)?;

        pin_registry::reserve(&self.repo, &data.pin, &data.name).await?;
        match self.repo.create(&data).await {
            Ok(staff) => Ok(staff),
            Err(e) => {
                pin_registry::release(&self.repo, &data.pin).await;
                Err(e)
            }
        }
    }
}
