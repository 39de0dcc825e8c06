use std::error::Error as StdError;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCategory {
    /// Any failure that cannot be confidently attributed to the host or the
    /// user.
    ///
    /// Internal is never a guarantee that the failure was not caused by
    /// misconfiguration - only that the code cannot tell.
    Internal,

    /// The host or user supplied something unusable (a missing secret key,
    /// an unreadable key file).
    User,
}

/// Fine-grained condition flags for hosts that want to branch on error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The operating system random number generator could not supply a salt or IV.
    RandomUnavailable,
    /// AES-256-CBC could not be initialized with the derived key material.
    CipherFailure,
    /// The secret key could not be obtained from the configured source.
    SecretKeyUnavailable,
    /// Input that must be text (a key file, an environment variable) was not UTF-8.
    InvalidEncoding,
    /// The output record could not be encoded as JSON for the host.
    Serialization,
    /// Interaction with the filesystem, stdin/stdout, or other I/O failed.
    Io,
}

#[derive(Debug, Error)]
#[error("{msg}")]
pub struct TextboxError {
    /// Broad error category, always provided.
    pub category: ErrorCategory,
    /// Optional specific condition tag. Code consuming errors MUST handle
    /// the absence of a defined kind.
    pub kind: Option<ErrorKind>,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    msg: String,
}

impl TextboxError {
    /// Creates a new error with a required category and display message.
    pub fn new(category: ErrorCategory, msg: impl Into<String>) -> Self {
        Self {
            category,
            kind: None,
            source: None,
            msg: msg.into(),
        }
    }

    /// Creates a new error that also tags the failure with a kind.
    pub fn with_kind(category: ErrorCategory, kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            category,
            kind: Some(kind),
            source: None,
            msg: msg.into(),
        }
    }

    /// Creates a new error that carries both a kind tag and the originating source error.
    pub fn with_kind_and_source(
        category: ErrorCategory,
        kind: ErrorKind,
        msg: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            category,
            kind: Some(kind),
            source: Some(Box::new(source)),
            msg: msg.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Returns the preserved source error if present.
    pub fn source_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// Wraps the current error with a higher-level message while preserving
    /// the original as source. Category and kind carry over.
    pub fn with_context(self, msg: impl Into<String>) -> Self {
        let category = self.category;
        let kind = self.kind;
        Self {
            category,
            kind,
            source: Some(Box::new(self)),
            msg: msg.into(),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, TextboxError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_context_preserves_category_and_kind() {
        let inner = TextboxError::with_kind(
            ErrorCategory::User,
            ErrorKind::SecretKeyUnavailable,
            "no key",
        );
        let outer = inner.with_context("failed to prepare control");

        assert_eq!(outer.category, ErrorCategory::User);
        assert_eq!(outer.kind, Some(ErrorKind::SecretKeyUnavailable));
        assert_eq!(outer.message(), "failed to prepare control");
        assert_eq!(outer.source_error().unwrap().to_string(), "no key");
    }

    #[test]
    fn test_source_is_exposed_through_std_error() {
        let err = TextboxError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to read key file",
            io::Error::other("disk on fire"),
        );

        let source = StdError::source(&err).expect("source should be set");
        assert_eq!(source.to_string(), "disk on fire");
        assert_eq!(err.to_string(), "failed to read key file");
    }

    #[test]
    fn test_new_has_no_kind() {
        let err = TextboxError::new(ErrorCategory::Internal, "boom");
        assert!(err.kind.is_none());
        assert!(err.source_error().is_none());
    }
}
