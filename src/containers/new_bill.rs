//! New bill form container
//!
//! The proof file is uploaded as soon as it is chosen; submitting the form
//! then fills in the bill record the upload created.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::common::config::NewBillConfig;
use crate::common::{file_extension, format, Error, Result};
use crate::router::Route;
use crate::session::Session;
use crate::store::{Bill, BillStatus, ProofUpload, Store, EXPENSE_TYPES};

/// A file picked in the proof input
#[derive(Debug, Clone)]
pub struct FileSelection {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileSelection {
    pub fn new(file_name: &str, mime_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its MIME type from the extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = match file_extension(&file_name).as_deref() {
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("png") => "image/png",
            _ => "application/octet-stream",
        };

        Ok(Self::new(&file_name, mime_type, bytes))
    }
}

/// State of the proof input
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FileState {
    #[default]
    NotChosen,
    /// Accepted and uploaded; `key` is the id of the created bill
    Valid {
        key: String,
        file_url: String,
        file_name: String,
    },
    /// Rejected by extension; the input was cleared
    Invalid { file_name: String, message: String },
}

/// Fields of the new bill form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewBillForm {
    #[serde(rename = "type")]
    pub expense_type: String,
    pub name: String,
    pub amount: i64,
    /// ISO date, `YYYY-MM-DD`
    pub date: String,
    pub vat: String,
    /// Left empty means the configured default
    pub pct: Option<u32>,
    pub commentary: String,
}

/// Container behind the new bill page
pub struct NewBillContainer {
    store: Arc<dyn Store>,
    session: Session,
    config: NewBillConfig,
    file: FileState,
}

impl NewBillContainer {
    pub fn new(store: Arc<dyn Store>, session: Session, config: NewBillConfig) -> Self {
        Self {
            store,
            session,
            config,
            file: FileState::NotChosen,
        }
    }

    /// Current state of the proof input
    pub fn file_state(&self) -> &FileState {
        &self.file
    }

    fn is_allowed(&self, file_name: &str) -> bool {
        file_extension(file_name)
            .map(|ext| self.config.allowed_extensions.iter().any(|a| a.eq_ignore_ascii_case(&ext)))
            .unwrap_or(false)
    }

    /// Validate and upload a newly chosen proof
    ///
    /// A file with a rejected extension clears the input and leaves an error
    /// indicator; that is not an `Err`. Only a failing upload is.
    #[tracing::instrument(skip(self, selection), fields(file = %selection.file_name))]
    pub async fn handle_change_file(&mut self, selection: FileSelection) -> Result<&FileState> {
        if !self.is_allowed(&selection.file_name) {
            let message = Error::invalid_proof(
                &selection.file_name,
                self.config.allowed_extensions.as_slice(),
            )
            .to_string();
            tracing::info!(%message, "Proof rejected");
            self.file = FileState::Invalid {
                file_name: selection.file_name,
                message,
            };
            return Ok(&self.file);
        }

        self.file = FileState::NotChosen;

        let upload = ProofUpload {
            file_name: selection.file_name.clone(),
            mime_type: selection.mime_type,
            bytes: selection.bytes,
            email: self.session.email.clone(),
        };
        let created = self.store.create(upload).await?;
        tracing::info!(key = %created.key, url = %created.file_url, "Proof uploaded");

        self.file = FileState::Valid {
            key: created.key,
            file_url: created.file_url,
            file_name: selection.file_name,
        };
        Ok(&self.file)
    }

    /// Build the bill record from the form and the uploaded proof
    fn build_bill(&self, form: NewBillForm, key: &str, file_url: &str, file_name: &str) -> Result<Bill> {
        if !EXPENSE_TYPES.contains(&form.expense_type.as_str()) {
            return Err(Error::invalid_field(
                "type",
                &format!("expected one of: {}", EXPENSE_TYPES.join(", ")),
            ));
        }
        if format::parse_date(&form.date).is_none() {
            return Err(Error::invalid_field("date", "expected YYYY-MM-DD"));
        }
        if form.amount <= 0 {
            return Err(Error::invalid_field("amount", "must be a positive amount"));
        }

        let pct = match form.pct {
            Some(pct) if pct > 0 => pct,
            _ => self.config.default_pct,
        };

        Ok(Bill {
            id: Some(key.to_string()),
            email: self.session.email.clone(),
            expense_type: form.expense_type,
            name: form.name,
            amount: form.amount,
            date: form.date,
            vat: form.vat,
            pct,
            commentary: form.commentary,
            file_url: file_url.to_string(),
            file_name: file_name.to_string(),
            status: BillStatus::Pending,
        })
    }

    /// Submit the form: update the bill created by the upload, then go back
    /// to the bills list
    #[tracing::instrument(skip(self, form), fields(email = %self.session.email))]
    pub async fn handle_submit(&mut self, form: NewBillForm) -> Result<Route> {
        let FileState::Valid {
            key,
            file_url,
            file_name,
        } = &self.file
        else {
            return Err(Error::MissingProof);
        };

        let bill = self.build_bill(form, key, file_url, file_name)?;
        let saved = self.store.update(key, &bill).await?;
        tracing::info!(id = ?saved.id, amount = saved.amount, "Bill submitted");

        Ok(Route::Bills)
    }
}
