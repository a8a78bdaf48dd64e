//! Client side of doclink: pick one document, confirm, upload, share the link.
//!
//! [`UploadWidget`] holds the selection/upload/link-dialog state machine and
//! checks files against the shared [`UploadPolicy`] before anything is sent.
//! [`HttpUploadClient`] posts the file to the server, and [`ClipboardChain`]
//! copies the resulting link with fallbacks.

pub mod clipboard;
pub mod state;
pub mod transport;

pub use clipboard::{ClipboardChain, ClipboardError, ClipboardStrategy, CopyOutcome};
pub use document_policy::UploadPolicy;
pub use state::{
    CandidateFile, Notification, NotificationVariant, SelectedFile, UploadWidget, WidgetError,
    WidgetState,
};
pub use transport::{HttpUploadClient, TransportError, UploadTransport, UploadedDocument};
