//! Error types for catalog model operations.

use thiserror::Error;

use crate::model::TypeName;

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors that can occur while composing names, building references or
/// talking to the remote catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No active entity matched a lookup.
    #[error("not found: {message}")]
    NotFound {
        /// Description of what was not found.
        message: String,
    },

    /// An internal invariant was violated, either here or in the remote catalog.
    #[error("logic error: {message}")]
    Logic {
        /// Description of the violated invariant.
        message: String,
    },

    /// A qualifiedName prefix token does not map to any known connector.
    #[error("unrecognized connector type: '{token}'")]
    UnrecognizedConnectorType {
        /// The token found at the connector position.
        token: String,
    },

    /// A typeName is not part of the closed type registry.
    #[error("unknown type name: '{type_name}'")]
    UnknownTypeName { type_name: String },

    /// A qualifiedName could not be decomposed the way its kind requires.
    #[error("invalid qualifiedName '{qualified_name}': {reason}")]
    InvalidQualifiedName {
        qualified_name: String,
        reason: String,
    },

    /// A save was attempted without an attribute the kind requires.
    #[error("{type_name} is missing required attribute '{attribute}'")]
    MissingRequiredAttribute {
        type_name: TypeName,
        attribute: String,
    },

    /// An anchor was supplied through a channel the operation does not accept.
    #[error("invalid anchor for {type_name}: {message}")]
    InvalidAnchor { type_name: TypeName, message: String },

    /// The HTTP transport failed (connect, timeout, TLS, body decode).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote catalog answered with a non-success status.
    #[error("catalog service returned {status}: {message}")]
    Service { status: u16, message: String },

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CatalogError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn logic(message: impl Into<String>) -> Self {
        Self::Logic {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_logic(&self) -> bool {
        matches!(self, Self::Logic { .. })
    }
}
