//! PIN uniqueness for new colleague records.

use tracing::{info, warn};

use nextsteps_core::error::AppError;
use nextsteps_core::result::AppResult;
use nextsteps_database::repositories::StaffRepository;

/// Message carried by every PIN collision.
pub const PIN_IN_USE: &str = "That PIN is already being used. Please choose a different one.";

/// Reserve `pin` for a colleague about to be written.
///
/// Two checks: the query catches records that predate PIN reservations,
/// the create-only reservation catches a concurrent writer.
pub async fn reserve(repo: &StaffRepository, pin: &str, holder: &str) -> AppResult<()> {
    if repo.pin_in_use(pin).await? {
        info!(holder, "Rejected PIN already held by a colleague");
        return Err(AppError::conflict(PIN_IN_USE));
    }

    repo.claim_pin(pin, holder).await.map_err(|e| {
        if e.is_conflict() {
            info!(holder, "Rejected PIN reserved by a concurrent setup");
            AppError::conflict(PIN_IN_USE)
        } else {
            e
        }
    })
}

/// Drop a reservation after the colleague write failed.
pub async fn release(repo: &StaffRepository, pin: &str) {
    if let Err(e) = repo.release_pin_claim(pin).await {
        warn!(error = %e, "Failed to release PIN reservation");
    }
}
