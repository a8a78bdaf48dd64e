//! Doclink backend: uploads PDF and Word documents to object storage and
//! hands back a public link

#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

/// Document storage on an S3-compatible object store
pub mod document_storage;

/// HTTP routes
pub mod routes;

/// Server startup
pub mod server;

/// Configuration and error types
pub mod types;
