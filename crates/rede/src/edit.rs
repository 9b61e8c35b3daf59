//! Contact edit dialog state.
//!
//! An [`EditSession`] owns an editable [`ContactForm`] for one contact and
//! drives the save flow against a [`ContactStore`], reporting outcomes
//! through a [`Notifier`]:
//!
//! - opening on a record without an ID or name is refused
//! - required fields are checked before anything is sent; a failure is
//!   notified and nothing reaches the store
//! - a store failure is notified and the session stays open for another try
//! - success is notified and closes the session

use crate::domain::{CellId, ContactId, ContactRecord, ContactStatus, ContactUpdate};
use crate::error::{Error, Result};
use crate::storage::ContactStore;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// User-visible success/failure messages (toasts).
pub trait Notifier: Send + Sync {
    /// Report that an action succeeded.
    fn success(&self, title: &str, message: &str);

    /// Report that an action failed.
    fn failure(&self, title: &str, message: &str);
}

/// Notifier that writes to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, title: &str, message: &str) {
        tracing::info!(title, detail = message, "Notification");
    }

    fn failure(&self, title: &str, message: &str) {
        tracing::warn!(title, detail = message, "Notification");
    }
}

/// Uploads a photo and returns a reference to store on the contact.
#[async_trait]
pub trait PhotoUploader: Send + Sync {
    /// Upload `source` and return its reference string.
    async fn upload(&self, source: &Path) -> Result<String>;
}

/// Uploader that references photos by absolute local path.
///
/// It checks that the file exists and is a regular file; it stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalPhotoUploader;

#[async_trait]
impl PhotoUploader for LocalPhotoUploader {
    async fn upload(&self, source: &Path) -> Result<String> {
        let metadata = tokio::fs::metadata(source)
            .await
            .map_err(|e| Error::Upload(format!("{}: {}", source.display(), e)))?;
        if !metadata.is_file() {
            return Err(Error::Upload(format!("{} is not a file", source.display())));
        }
        let canonical: PathBuf = tokio::fs::canonicalize(source).await?;
        Ok(canonical.display().to_string())
    }
}

/// Editable copy of a contact's fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactForm {
    /// Display name (required)
    pub name: String,
    /// Contact number (required)
    pub whatsapp: String,
    /// Neighborhood (required)
    pub neighborhood: String,
    /// City reference
    pub city_id: Option<String>,
    /// Birth date
    pub birth_date: Option<NaiveDate>,
    /// Encounter flag
    pub encounter_with_god: bool,
    /// Baptized flag
    pub baptized: bool,
    /// Founder flag
    pub founder: bool,
    /// Status
    pub status: ContactStatus,
    /// Cell reference
    pub cell_id: Option<CellId>,
    /// Referrer
    pub referred_by: Option<ContactId>,
    /// Photo reference
    pub photo_url: Option<String>,
}

impl From<&ContactRecord> for ContactForm {
    fn from(record: &ContactRecord) -> Self {
        Self {
            name: record.name.clone(),
            whatsapp: record.whatsapp.clone(),
            neighborhood: record.neighborhood.clone(),
            city_id: record.city_id.clone(),
            birth_date: record.birth_date,
            encounter_with_god: record.encounter_with_god,
            baptized: record.baptized,
            founder: record.founder,
            status: record.status,
            cell_id: record.cell_id.clone(),
            referred_by: record.referred_by.clone(),
            photo_url: record.photo_url.clone(),
        }
    }
}

impl ContactForm {
    /// Check the fields the dialog requires: name, contact number and
    /// neighborhood.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("name", &self.name),
            ("whatsapp", &self.whatsapp),
            ("neighborhood", &self.neighborhood),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(Error::Validation {
                    field,
                    message: "is required".to_string(),
                });
            }
        }
        Ok(())
    }

    /// The update that turns `original` into this form, trimming text.
    ///
    /// Unchanged fields are left as `None`.
    pub fn changes_from(&self, original: &ContactRecord) -> ContactUpdate {
        fn changed<T: PartialEq + Clone>(new: &T, old: &T) -> Option<T> {
            (new != old).then(|| new.clone())
        }

        let name = self.name.trim().to_string();
        let whatsapp = self.whatsapp.trim().to_string();
        let neighborhood = self.neighborhood.trim().to_string();

        ContactUpdate {
            name: changed(&name, &original.name),
            whatsapp: changed(&whatsapp, &original.whatsapp),
            neighborhood: changed(&neighborhood, &original.neighborhood),
            city_id: changed(&self.city_id, &original.city_id),
            birth_date: changed(&self.birth_date, &original.birth_date),
            encounter_with_god: changed(&self.encounter_with_god, &original.encounter_with_god),
            baptized: changed(&self.baptized, &original.baptized),
            founder: changed(&self.founder, &original.founder),
            status: changed(&self.status, &original.status),
            cell_id: changed(&self.cell_id, &original.cell_id),
            referred_by: changed(&self.referred_by, &original.referred_by),
            photo_url: changed(&self.photo_url, &original.photo_url),
        }
    }
}

/// Open/closed state of an edit dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Form is editable
    Open,
    /// Saved successfully; no further edits
    Closed,
}

/// One contact's edit dialog.
#[derive(Debug, Clone)]
pub struct EditSession {
    original: ContactRecord,
    form: ContactForm,
    state: SessionState,
}

impl EditSession {
    /// Open the dialog for `record`.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedRecord`] if the record has no ID or name; the
    /// caller shows this instead of an empty form.
    pub fn open(record: ContactRecord) -> Result<Self> {
        record.validate().map_err(Error::MalformedRecord)?;
        let form = ContactForm::from(&record);
        Ok(Self {
            original: record,
            form,
            state: SessionState::Open,
        })
    }

    /// ID of the contact being edited.
    pub fn contact_id(&self) -> &ContactId {
        &self.original.id
    }

    /// The record as it was last loaded or saved.
    pub fn original(&self) -> &ContactRecord {
        &self.original
    }

    /// Current form values.
    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    /// Mutable form values, while the session is open.
    pub fn form_mut(&mut self) -> Result<&mut ContactForm> {
        match self.state {
            SessionState::Open => Ok(&mut self.form),
            SessionState::Closed => Err(Error::SessionClosed),
        }
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True while edits are accepted.
    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    /// Upload `source` and put the returned reference in the photo field.
    ///
    /// Failures are notified and leave the form as it was.
    pub async fn attach_photo(
        &mut self,
        uploader: &dyn PhotoUploader,
        notifier: &dyn Notifier,
        source: &Path,
    ) -> Result<()> {
        if !self.is_open() {
            return Err(Error::SessionClosed);
        }
        match uploader.upload(source).await {
            Ok(reference) => {
                self.form.photo_url = Some(reference);
                notifier.success("Photo uploaded", "The photo was attached to the form.");
                Ok(())
            }
            Err(err) => {
                notifier.failure("Photo upload failed", &err.to_string());
                Err(err)
            }
        }
    }

    /// Validate and save the form.
    ///
    /// # Errors
    ///
    /// - [`Error::SessionClosed`] if already saved
    /// - [`Error::Validation`] if a required field is blank (nothing sent)
    /// - whatever the store returns; the session stays open
    pub async fn submit(
        &mut self,
        store: &mut dyn ContactStore,
        notifier: &dyn Notifier,
    ) -> Result<ContactRecord> {
        if !self.is_open() {
            return Err(Error::SessionClosed);
        }

        if let Err(err) = self.form.validate() {
            notifier.failure("Missing information", &err.to_string());
            return Err(err);
        }

        let update = self.form.changes_from(&self.original);
        if update.is_empty() {
            tracing::debug!(contact = %self.original.id, "Nothing to save");
            notifier.success("No changes", "The contact is already up to date.");
            self.state = SessionState::Closed;
            return Ok(self.original.clone());
        }

        match store.update_contact(&self.original.id, update).await {
            Ok(updated) => {
                notifier.success("Contact updated", &format!("{} was saved.", updated.name));
                self.original = updated.clone();
                self.form = ContactForm::from(&updated);
                self.state = SessionState::Closed;
                Ok(updated)
            }
            Err(err) => {
                tracing::warn!(contact = %self.original.id, error = %err, "Contact update failed");
                notifier.failure("Could not update contact", &err.to_string());
                Err(err)
            }
        }
    }
}
