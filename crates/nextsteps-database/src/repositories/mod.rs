//! Typed repositories over the document store collections.

pub mod invitation;
pub mod staff;
pub mod task;

pub use invitation::InvitationRepository;
pub use staff::StaffRepository;
pub use task::TaskRepository;

use serde::de::DeserializeOwned;
use tracing::warn;

use nextsteps_core::types::Document;

/// Decode every document, skipping (and logging) the ones that do not fit
/// the record shape. One bad document must not blank a whole list.
pub(crate) fn decode_all<T: DeserializeOwned>(collection: &str, docs: &[Document]) -> Vec<T> {
    docs.iter()
        .filter_map(|doc| match doc.decode::<T>() {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(collection, id = %doc.id, error = %e, "Skipping malformed document");
                None
            }
        })
        .collect()
}
