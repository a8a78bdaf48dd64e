//! Upload rules shared by the doclink server and its clients.
//!
//! Both sides apply the same policy: the client to short-circuit bad selections
//! before any network call, the server to refuse anything that slipped past it.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};
use thiserror::Error;

/// Largest accepted document, 10 MiB
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Content type stored for PDF documents
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Content type stored for Word documents (both `.doc` and `.docx`)
pub const MSWORD_CONTENT_TYPE: &str = "application/msword";

/// Content type browsers report for `.docx` files
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Fallback when a client does not declare a content type
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Kind of document accepted for upload
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DocumentKind {
    /// Portable Document Format
    Pdf,
    /// Microsoft Word, legacy or OOXML
    Word,
}

/// A filename suffix mapped to the content type it forces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentTypeRule {
    /// Lowercase suffix including the dot
    pub suffix: &'static str,
    /// Content type stored for matching files
    pub content_type: &'static str,
    /// Document kind the suffix identifies
    pub kind: DocumentKind,
}

impl ContentTypeRule {
    /// Whether `filename` ends with this rule's suffix, ignoring ASCII case
    #[must_use]
    pub fn matches(&self, filename: &str) -> bool {
        let suffix_len = self.suffix.len();
        filename.len() >= suffix_len
            && filename
                .get(filename.len() - suffix_len..)
                .is_some_and(|tail| tail.eq_ignore_ascii_case(self.suffix))
    }
}

/// Suffix rules, evaluated top-down; the first match wins
pub const CONTENT_TYPE_RULES: &[ContentTypeRule] = &[
    ContentTypeRule {
        suffix: ".pdf",
        content_type: PDF_CONTENT_TYPE,
        kind: DocumentKind::Pdf,
    },
    ContentTypeRule {
        suffix: ".docx",
        content_type: MSWORD_CONTENT_TYPE,
        kind: DocumentKind::Word,
    },
    ContentTypeRule {
        suffix: ".doc",
        content_type: MSWORD_CONTENT_TYPE,
        kind: DocumentKind::Word,
    },
];

fn matching_rule(filename: &str) -> Option<&'static ContentTypeRule> {
    CONTENT_TYPE_RULES.iter().find(|rule| rule.matches(filename))
}

/// Resolves the content type to store for `filename`.
///
/// The declared type is kept unless a suffix rule overrides it.
#[must_use]
pub fn resolve_content_type<'a>(filename: &str, declared: &'a str) -> &'a str {
    matching_rule(filename).map_or(declared, |rule| rule.content_type)
}

/// Determines which document kind a file is, if any.
///
/// Browsers sometimes report an empty or generic type, so the suffix is
/// checked first and the declared MIME type only as a fallback.
#[must_use]
pub fn classify(filename: &str, declared: &str) -> Option<DocumentKind> {
    if let Some(rule) = matching_rule(filename) {
        return Some(rule.kind);
    }

    let declared = declared.to_ascii_lowercase();
    if declared.contains("pdf") {
        Some(DocumentKind::Pdf)
    } else if declared == MSWORD_CONTENT_TYPE || declared == DOCX_CONTENT_TYPE {
        Some(DocumentKind::Word)
    } else {
        None
    }
}

/// Extensions accepted for upload, in rule order
#[must_use]
pub fn allowed_extensions() -> Vec<&'static str> {
    CONTENT_TYPE_RULES.iter().map(|rule| rule.suffix).collect()
}

/// Content types a client may declare for an accepted document
#[must_use]
pub fn accepted_content_types() -> Vec<&'static str> {
    DocumentKind::iter()
        .flat_map(|kind| match kind {
            DocumentKind::Pdf => vec![PDF_CONTENT_TYPE],
            DocumentKind::Word => vec![MSWORD_CONTENT_TYPE, DOCX_CONTENT_TYPE],
        })
        .collect()
}

/// Strips any directory components a client sent along with the filename
#[must_use]
pub fn base_name(filename: &str) -> &str {
    filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim()
}

/// Reasons a file is refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    /// The file has no content
    #[error("File is empty")]
    Empty,

    /// Neither the name nor the declared type identify a PDF or Word document
    #[error("Unsupported file type: {filename}; upload a PDF or Word document")]
    UnsupportedType {
        /// Name of the rejected file
        filename: String,
    },

    /// The file exceeds the size limit
    #[error("File is {size} bytes; the limit is {max} bytes")]
    TooLarge {
        /// Size of the rejected file in bytes
        size: u64,
        /// Configured limit in bytes
        max: u64,
    },
}

/// Limits applied to every upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Largest accepted file in bytes
    pub max_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

impl UploadPolicy {
    /// Checks a file against the policy and returns its kind
    ///
    /// # Errors
    ///
    /// Returns the first [`PolicyViolation`] found: type first, then size
    pub fn validate(
        &self,
        filename: &str,
        declared: &str,
        size: u64,
    ) -> Result<DocumentKind, PolicyViolation> {
        let kind = classify(filename, declared).ok_or_else(|| PolicyViolation::UnsupportedType {
            filename: filename.to_string(),
        })?;

        if size == 0 {
            return Err(PolicyViolation::Empty);
        }

        if size > self.max_bytes {
            return Err(PolicyViolation::TooLarge {
                size,
                max: self.max_bytes,
            });
        }

        Ok(kind)
    }
}
