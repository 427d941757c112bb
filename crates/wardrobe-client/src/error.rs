//! # Client Error Types
//!
//! Failures of the I/O layer, plus the machine-readable codes the dashboard
//! front-end switches on.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  HttpBackend ──► reqwest / JSON failure ──► Fetch { endpoint, reason }  │
//! │                                         └─► Sale { item_id, reason }    │
//! │                                                                         │
//! │  wardrobe-core ──► CoreError ───────────────► Rejected(CoreError)       │
//! │                                                                         │
//! │  Config ──► bad TOML / env value ───────────► InvalidConfig             │
//! │                                                                         │
//! │  None of these are fatal: a failed fetch is shown as an error state,   │
//! │  a failed sale leaves the store untouched.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;
use wardrobe_core::{CoreError, ItemId};

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Backend Errors
    // =========================================================================
    /// Network or parse failure while fetching a feed.
    #[error("Failed to fetch {endpoint}: {reason}")]
    Fetch { endpoint: String, reason: String },

    /// The backend did not confirm a sale.
    #[error("Sale of item {item_id} failed: {reason}")]
    Sale { item_id: ItemId, reason: String },

    // =========================================================================
    // Engine Errors
    // =========================================================================
    /// The engine refused the operation (precondition or validation).
    #[error(transparent)]
    Rejected(#[from] CoreError),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::InvalidConfig(err.to_string())
    }
}

impl ClientError {
    pub fn fetch(endpoint: impl Into<String>, reason: impl ToString) -> Self {
        ClientError::Fetch {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }

    pub fn sale(item_id: ItemId, reason: impl ToString) -> Self {
        ClientError::Sale {
            item_id,
            reason: reason.to_string(),
        }
    }

    /// Machine-readable category of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ClientError::Fetch { .. } => ErrorCode::FetchFailed,
            ClientError::Sale { .. } => ErrorCode::SaleFailed,
            ClientError::Rejected(CoreError::ItemNotFound(_)) => ErrorCode::NotFound,
            ClientError::Rejected(CoreError::InvalidOperation { .. }) => {
                ErrorCode::InvalidOperation
            }
            ClientError::Rejected(CoreError::Validation(_)) => ErrorCode::ValidationError,
            ClientError::InvalidConfig(_) => ErrorCode::ConfigError,
            ClientError::Io(_) => ErrorCode::Internal,
        }
    }

    /// True when the store was certainly left unchanged.
    pub fn is_sale_failure(&self) -> bool {
        matches!(
            self,
            ClientError::Sale { .. } | ClientError::Rejected(CoreError::InvalidOperation { .. })
        )
    }
}

// =============================================================================
// Error Codes
// =============================================================================

/// Error codes for UI consumers.
///
/// ```typescript
/// switch (e.code) {
///   case 'INVALID_OPERATION': disableSellButton(); break;
///   case 'FETCH_FAILED':      showRetryBanner();   break;
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    FetchFailed,
    SaleFailed,
    NotFound,
    InvalidOperation,
    ValidationError,
    ConfigError,
    Internal,
}

/// What the front-end receives when an operation fails.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub code: ErrorCode,
    pub message: String,
}

impl From<&ClientError> for ErrorPayload {
    fn from(err: &ClientError) -> Self {
        ErrorPayload {
            code: err.code(),
            message: err.to_string(),
        }
    }
}
