//! Contact data access.
//!
//! The genealogy and the edit dialog only need three operations from the
//! data layer: the current contacts, the current cells, and an update.
//! [`ContactStore`] is that seam. Two implementations ship here:
//!
//! - [`InMemoryContactStore`]: plain vectors, used in tests and as the
//!   working set of the file-backed store
//! - [`JsonlContactStore`]: loads `contacts.jsonl` / `cells.jsonl` and
//!   rewrites the contacts file atomically after each update
//!
//! # Example
//!
//! ```
//! use rede::domain::{ContactRecord, ContactUpdate};
//! use rede::storage::{ContactStore, InMemoryContactStore};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> rede::error::Result<()> {
//! let mut store = InMemoryContactStore::new(vec![ContactRecord::new("ana", "Ana")], vec![]);
//! let update = ContactUpdate { name: Some("Ana Paula".to_string()), ..Default::default() };
//! let updated = store.update_contact(&"ana".into(), update).await?;
//! assert_eq!(updated.name, "Ana Paula");
//! # Ok(())
//! # }
//! ```

mod in_memory;
mod jsonl;

pub use in_memory::InMemoryContactStore;
pub use jsonl::{JsonlContactStore, LoadWarning};

use crate::domain::{CellRecord, ContactId, ContactRecord, ContactUpdate};
use crate::error::Result;
use async_trait::async_trait;

/// Data collaborator consumed by the genealogy view and the edit dialog.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Current contact records, in storage order.
    async fn contacts(&self) -> Result<Vec<ContactRecord>>;

    /// Current cell records.
    async fn cells(&self) -> Result<Vec<CellRecord>>;

    /// Apply `update` to the contact `id` and return the stored result.
    ///
    /// # Errors
    ///
    /// - [`crate::error::Error::ContactNotFound`] for an unknown `id` or
    ///   an unknown new referrer
    /// - [`crate::error::Error::ReferralCycle`] if the new referrer would
    ///   make the contact its own ancestor
    /// - [`crate::error::Error::Validation`] if the result lacks a name
    async fn update_contact(&mut self, id: &ContactId, update: ContactUpdate)
    -> Result<ContactRecord>;
}
