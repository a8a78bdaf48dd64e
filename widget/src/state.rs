//! The upload widget state machine
//!
//! ```text
//! Idle --select--> Selected --begin_upload--> Uploading --ok--> Succeeded --close--> Idle
//!  ^                  |                          |
//!  +------cancel------+                          +--error (notification)--> Idle
//! ```
//!
//! Every rejected selection and every failed upload leaves a [`Notification`]
//! behind and returns the widget to a state where the user can try again.

use std::path::Path;

use bytes::Bytes;
use document_policy::{
    base_name, resolve_content_type, DocumentKind, PolicyViolation, UploadPolicy,
    DEFAULT_CONTENT_TYPE,
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::clipboard::{ClipboardChain, CopyOutcome};
use crate::transport::{TransportError, UploadTransport, UploadedDocument};

/// A file offered to the widget, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Filename without directories
    pub name: String,
    /// MIME type reported for the file
    pub declared_type: String,
    /// Size in bytes as reported by the source
    pub size: u64,
    /// File content; empty when the file was too large to load
    pub content: Bytes,
}

impl CandidateFile {
    /// Candidate whose size is the length of `content`
    pub fn new(name: &str, declared_type: &str, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        Self {
            name: base_name(name).to_string(),
            declared_type: declared_type.to_string(),
            size: content.len() as u64,
            content,
        }
    }

    /// Reads a candidate from disk.
    ///
    /// The declared type is inferred from the extension. Files larger than
    /// `policy` allows are not read; they keep their reported size so that
    /// selection rejects them.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be inspected or read
    pub async fn from_path(path: &Path, policy: &UploadPolicy) -> std::io::Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let declared_type = resolve_content_type(&name, DEFAULT_CONTENT_TYPE).to_string();
        let size = tokio::fs::metadata(path).await?.len();

        let content = if size <= policy.max_bytes {
            Bytes::from(tokio::fs::read(path).await?)
        } else {
            Bytes::new()
        };

        Ok(Self {
            name,
            declared_type,
            size,
            content,
        })
    }
}

/// A file that passed the upload policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Filename without directories
    pub name: String,
    /// MIME type reported for the file
    pub declared_type: String,
    /// Kind of document
    pub kind: DocumentKind,
    /// File content
    pub content: Bytes,
}

impl SelectedFile {
    /// Applies `policy` to a candidate
    ///
    /// # Errors
    ///
    /// Returns the [`PolicyViolation`] that disqualifies the file
    pub fn validate(candidate: CandidateFile, policy: &UploadPolicy) -> Result<Self, PolicyViolation> {
        let kind = policy.validate(&candidate.name, &candidate.declared_type, candidate.size)?;
        Ok(Self {
            name: candidate.name,
            declared_type: candidate.declared_type,
            kind,
            content: candidate.content,
        })
    }
}

/// How a notification should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationVariant {
    /// Informational
    Default,
    /// Something went wrong and needs the user's attention
    Destructive,
}

/// A transient message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Short headline
    pub title: String,
    /// One sentence of detail
    pub description: String,
    /// Presentation
    pub variant: NotificationVariant,
}

impl Notification {
    fn info(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            variant: NotificationVariant::Default,
        }
    }

    fn destructive(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            variant: NotificationVariant::Destructive,
        }
    }
}

/// Where the widget currently is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetState {
    /// No file chosen
    Idle,
    /// A file is chosen and awaits confirmation
    Selected(SelectedFile),
    /// The upload request is in flight
    Uploading(SelectedFile),
    /// The link dialog is open
    Succeeded(UploadedDocument),
}

impl WidgetState {
    /// Short name used in errors and logs
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Selected(_) => "selected",
            Self::Uploading(_) => "uploading",
            Self::Succeeded(_) => "succeeded",
        }
    }
}

/// Errors returned by widget actions
#[derive(Debug, Error)]
pub enum WidgetError {
    /// The action is not available in the current state
    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        /// Attempted action
        action: &'static str,
        /// State the widget was in
        state: &'static str,
    },

    /// Upload was requested with nothing selected
    #[error("No file selected")]
    NoFileSelected,

    /// More than one file was offered
    #[error("Expected one file, got {0}")]
    MultipleFiles(usize),

    /// The offered file breaks the upload policy
    #[error(transparent)]
    Rejected(#[from] PolicyViolation),

    /// The upload request failed
    #[error(transparent)]
    UploadFailed(#[from] TransportError),
}

/// Upload widget driven by user actions
pub struct UploadWidget<T> {
    transport: T,
    policy: UploadPolicy,
    state: WidgetState,
    notifications: Vec<Notification>,
}

impl<T: UploadTransport> UploadWidget<T> {
    /// Widget using the default upload policy
    pub fn new(transport: T) -> Self {
        Self::with_policy(transport, UploadPolicy::default())
    }

    /// Widget using a custom upload policy
    pub const fn with_policy(transport: T, policy: UploadPolicy) -> Self {
        Self {
            transport,
            policy,
            state: WidgetState::Idle,
            notifications: Vec::new(),
        }
    }

    /// Current state
    pub const fn state(&self) -> &WidgetState {
        &self.state
    }

    /// Policy files are checked against
    pub const fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Takes the notifications raised since the last call
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    fn invalid(&self, action: &'static str) -> WidgetError {
        WidgetError::InvalidTransition {
            action,
            state: self.state.name(),
        }
    }

    /// Offers dropped or picked files to the widget.
    ///
    /// Exactly one file is accepted. A rejected offer raises a notification
    /// and leaves the current selection untouched.
    ///
    /// # Errors
    ///
    /// Returns why the offer was rejected, or `InvalidTransition` while
    /// uploading or showing a link
    pub fn select(&mut self, mut files: Vec<CandidateFile>) -> Result<(), WidgetError> {
        if !matches!(self.state, WidgetState::Idle | WidgetState::Selected(_)) {
            return Err(self.invalid("select a file"));
        }

        let candidate = match files.len() {
            0 => return Ok(()),
            1 => files.remove(0),
            n => {
                self.notifications.push(Notification::destructive(
                    "One file at a time",
                    "Drop a single PDF or Word document",
                ));
                return Err(WidgetError::MultipleFiles(n));
            }
        };

        match SelectedFile::validate(candidate, &self.policy) {
            Ok(selected) => {
                debug!(filename = %selected.name, kind = %selected.kind, "File selected");
                self.state = WidgetState::Selected(selected);
                Ok(())
            }
            Err(violation) => {
                let title = match violation {
                    PolicyViolation::UnsupportedType { .. } => "Unsupported file type",
                    PolicyViolation::TooLarge { .. } => "File too large",
                    PolicyViolation::Empty => "Empty file",
                };
                self.notifications
                    .push(Notification::destructive(title, violation.to_string()));
                Err(violation.into())
            }
        }
    }

    /// Drops the current selection
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless a file is selected
    pub fn cancel(&mut self) -> Result<(), WidgetError> {
        if !matches!(self.state, WidgetState::Selected(_)) {
            return Err(self.invalid("cancel"));
        }
        self.state = WidgetState::Idle;
        Ok(())
    }

    /// Confirms the selection and moves to `Uploading`.
    ///
    /// Returns the file to send; only one upload can be in flight.
    ///
    /// # Errors
    ///
    /// Returns `NoFileSelected` when idle, `InvalidTransition` otherwise
    pub fn begin_upload(&mut self) -> Result<SelectedFile, WidgetError> {
        match &self.state {
            WidgetState::Selected(file) => {
                let file = file.clone();
                self.state = WidgetState::Uploading(file.clone());
                Ok(file)
            }
            WidgetState::Idle => {
                self.notifications.push(Notification::destructive(
                    "Choose a file",
                    "Select a file to upload first",
                ));
                Err(WidgetError::NoFileSelected)
            }
            _ => Err(self.invalid("start an upload")),
        }
    }

    /// Records the outcome of the in-flight upload.
    ///
    /// Success opens the link dialog; failure clears the file and returns to
    /// `Idle` so the user can retry by hand.
    ///
    /// # Errors
    ///
    /// Returns `UploadFailed` carrying the transport error, or
    /// `InvalidTransition` if no upload was in flight
    pub fn complete_upload(
        &mut self,
        result: Result<UploadedDocument, TransportError>,
    ) -> Result<(), WidgetError> {
        if !matches!(self.state, WidgetState::Uploading(_)) {
            return Err(self.invalid("complete an upload"));
        }

        match result {
            Ok(uploaded) => {
                self.notifications.push(Notification::info(
                    "Upload complete",
                    "Copy the link to share it",
                ));
                self.state = WidgetState::Succeeded(uploaded);
                Ok(())
            }
            Err(err) => {
                warn!("Upload failed: {err}");
                self.notifications.push(Notification::destructive(
                    "Upload failed",
                    "Please try again later",
                ));
                self.state = WidgetState::Idle;
                Err(err.into())
            }
        }
    }

    /// Uploads the selected file through the transport
    ///
    /// # Errors
    ///
    /// See [`Self::begin_upload`] and [`Self::complete_upload`]
    pub async fn upload(&mut self) -> Result<&UploadedDocument, WidgetError> {
        let file = self.begin_upload()?;
        let result = self.transport.upload(&file).await;
        self.complete_upload(result)?;
        self.uploaded()
    }

    fn uploaded(&self) -> Result<&UploadedDocument, WidgetError> {
        match &self.state {
            WidgetState::Succeeded(uploaded) => Ok(uploaded),
            _ => Err(self.invalid("read the link")),
        }
    }

    /// Copies the link through the clipboard fallback chain
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the link dialog is open
    pub fn copy_link(&mut self, clipboard: &ClipboardChain) -> Result<CopyOutcome, WidgetError> {
        let outcome = clipboard.copy(&self.uploaded()?.url);

        self.notifications.push(match outcome {
            CopyOutcome::Copied { .. } => {
                Notification::info("Copied", "The link is on your clipboard")
            }
            CopyOutcome::Manual => {
                Notification::destructive("Copy manually", "Select the link and copy it yourself")
            }
        });

        Ok(outcome)
    }

    /// The link to open in a browser
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the link dialog is open
    pub fn open_link(&self) -> Result<&str, WidgetError> {
        self.uploaded().map(|uploaded| uploaded.url.as_str())
    }

    /// Closes the link dialog and resets the widget
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the link dialog is open
    pub fn close_dialog(&mut self) -> Result<(), WidgetError> {
        if !matches!(self.state, WidgetState::Succeeded(_)) {
            return Err(self.invalid("close the dialog"));
        }
        self.state = WidgetState::Idle;
        Ok(())
    }
}
