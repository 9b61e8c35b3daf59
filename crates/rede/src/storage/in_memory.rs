//! Vector-backed contact store.

use super::ContactStore;
use crate::domain::{CellRecord, ContactId, ContactRecord, ContactUpdate};
use crate::error::{Error, Result};
use crate::genealogy::referral_cycle;
use async_trait::async_trait;

/// Contact store holding records in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryContactStore {
    contacts: Vec<ContactRecord>,
    cells: Vec<CellRecord>,
}

impl InMemoryContactStore {
    /// Create a store over the given records.
    pub fn new(contacts: Vec<ContactRecord>, cells: Vec<CellRecord>) -> Self {
        Self { contacts, cells }
    }

    /// Borrow the contacts without cloning.
    pub fn contact_slice(&self) -> &[ContactRecord] {
        &self.contacts
    }

    /// Borrow the cells without cloning.
    pub fn cell_slice(&self) -> &[CellRecord] {
        &self.cells
    }

    /// Apply an update in place.
    ///
    /// Validates the referrer change against the current records before
    /// touching anything, so a rejected update leaves the store unchanged.
    pub(crate) fn apply_update(
        &mut self,
        id: &ContactId,
        update: ContactUpdate,
    ) -> Result<ContactRecord> {
        let position = self
            .contacts
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| Error::ContactNotFound(id.clone()))?;

        if let Some(Some(referrer)) = &update.referred_by {
            if !self.contacts.iter().any(|c| &c.id == referrer) {
                return Err(Error::ContactNotFound(referrer.clone()));
            }
            if let Some(path) = referral_cycle(&self.contacts, id, referrer) {
                return Err(Error::ReferralCycle { path });
            }
        }

        let mut updated = self.contacts[position].clone();
        update.apply(&mut updated);
        updated.validate().map_err(|message| Error::Validation {
            field: "name",
            message,
        })?;

        self.contacts[position] = updated.clone();
        tracing::debug!(contact = %id, "Updated contact");
        Ok(updated)
    }
}

#[async_trait]
impl ContactStore for InMemoryContactStore {
    async fn contacts(&self) -> Result<Vec<ContactRecord>> {
        Ok(self.contacts.clone())
    }

    async fn cells(&self) -> Result<Vec<CellRecord>> {
        Ok(self.cells.clone())
    }

    async fn update_contact(
        &mut self,
        id: &ContactId,
        update: ContactUpdate,
    ) -> Result<ContactRecord> {
        self.apply_update(id, update)
    }
}
