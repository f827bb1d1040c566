//! Error taxonomy for the change hook.
//!
//! [`TranslationError`] is what a dialect plugin reports while turning a
//! request into change records. [`HookError`] is the request-level outcome the
//! transport turns into an HTTP response; [`HookError::status_code`] is the one
//! place where errors are mapped onto status codes.
//!
//! | Variant | Raised by | Status |
//! |---------|-----------|--------|
//! | [`HookError::NotFound`] | router (unknown or disabled dialect) | 404 |
//! | [`HookError::NotImplemented`] | router (reserved path), plugins | 501 |
//! | [`HookError::Validation`] | plugins (malformed client input) | 400 |
//! | [`HookError::Internal`] | plugins, registry inconsistencies | 500 |
//! | [`HookError::Submission`] | change queue during submission | 400 |

use thiserror::Error;

use crate::submission::QueueError;

// ---------------------------------------------------------------------------
// Translation errors
// ---------------------------------------------------------------------------

/// Failure reported by a dialect plugin while translating a request.
///
/// The variant decides whether the caller or the plugin is to blame; the
/// message is returned verbatim to the caller as the response body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    /// The request is malformed or unacceptable for this dialect.
    #[error("{message}")]
    Invalid {
        /// Human-readable description of what is wrong with the request.
        message: String,
    },

    /// The request asks for behaviour the plugin does not provide.
    #[error("{message}")]
    NotImplemented {
        /// Name or description of the unimplemented operation.
        message: String,
    },

    /// The plugin failed for a reason not attributable to the request.
    #[error("{message}")]
    Internal {
        /// Description of the failure.
        message: String,
    },
}

impl TranslationError {
    /// Creates an [`TranslationError::Invalid`] error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Creates a [`TranslationError::NotImplemented`] error.
    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::NotImplemented {
            message: message.into(),
        }
    }

    /// Creates a [`TranslationError::Internal`] error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Request-level errors
// ---------------------------------------------------------------------------

/// Request-level failure of the change hook.
///
/// The `Display` output of each variant is the response body; it is kept
/// short and free of internal detail beyond what the raising component chose
/// to report.
#[derive(Debug, Error)]
pub enum HookError {
    /// The path names a dialect that is unknown or disabled.
    #[error("{message}")]
    NotFound {
        /// Explanation including the dialect name.
        message: String,
    },

    /// The path names a reserved operation that does not exist yet.
    #[error("{operation}")]
    NotImplemented {
        /// Name of the unimplemented operation.
        operation: String,
    },

    /// A plugin rejected the request as malformed.
    #[error("{message}")]
    Validation {
        /// Plugin-supplied message.
        message: String,
    },

    /// A plugin or the registry failed unexpectedly.
    #[error("{message}")]
    Internal {
        /// Description of the failure.
        message: String,
    },

    /// The change queue refused or failed to accept a change.
    ///
    /// Changes submitted earlier in the same request stay submitted.
    #[error("{0}")]
    Submission(#[from] QueueError),
}

impl HookError {
    /// Returns the HTTP status code for this error.
    ///
    /// Every submission failure maps to 400, including failures that
    /// originate inside the master.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::NotImplemented { .. } => 501,
            Self::Validation { .. } | Self::Submission(_) => 400,
            Self::Internal { .. } => 500,
        }
    }

    /// Creates a [`HookError::NotFound`] error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates a [`HookError::NotImplemented`] error.
    pub fn not_implemented(operation: impl Into<String>) -> Self {
        Self::NotImplemented {
            operation: operation.into(),
        }
    }

    /// Creates a [`HookError::Internal`] error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<TranslationError> for HookError {
    fn from(error: TranslationError) -> Self {
        match error {
            TranslationError::Invalid { message } => Self::Validation { message },
            TranslationError::NotImplemented { message } => {
                Self::NotImplemented { operation: message }
            }
            TranslationError::Internal { message } => Self::Internal { message },
        }
    }
}
