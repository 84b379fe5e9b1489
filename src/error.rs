//! Error types for flightdesk
//!
//! Provides a unified error type for all data-layer operations.

use thiserror::Error;

use crate::codec::CodecError;
use crate::store::StoreError;

/// Result type alias using DataError
pub type Result<T> = std::result::Result<T, DataError>;

/// Unified error type for data-layer operations
///
/// Every variant is returned unchanged to the caller. Nothing at this layer
/// retries or recovers.
#[derive(Debug, Error)]
pub enum DataError {
    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    /// Entity could not be converted to its stored form
    #[error("failed to encode {entity} record: {source}")]
    Encode {
        entity: &'static str,
        #[source]
        source: CodecError,
    },

    /// Stored form could not be converted back to an entity
    #[error("failed to decode {entity} record: {source}")]
    Decode {
        entity: &'static str,
        #[source]
        source: CodecError,
    },

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    /// Put, delete, or set update rejected by the store
    #[error("write to table `{table}` failed: {source}")]
    Write {
        table: String,
        #[source]
        source: StoreError,
    },

    /// Point read, batch read, or scan rejected by the store
    #[error("read from table `{table}` failed: {source}")]
    Read {
        table: String,
        #[source]
        source: StoreError,
    },

    /// Store provider could not produce a client
    #[error("failed to connect to store: {0}")]
    Connect(#[source] StoreError),

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    /// Point lookup returned no record
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DataError {
    pub(crate) fn encode(entity: &'static str, source: CodecError) -> Self {
        Self::Encode { entity, source }
    }

    pub(crate) fn decode(entity: &'static str, source: CodecError) -> Self {
        Self::Decode { entity, source }
    }

    pub(crate) fn write(table: &str, source: StoreError) -> Self {
        Self::Write {
            table: table.to_string(),
            source,
        }
    }

    pub(crate) fn read(table: &str, source: StoreError) -> Self {
        Self::Read {
            table: table.to_string(),
            source,
        }
    }

    pub(crate) fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    /// True for a point lookup that found no record
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True when the store itself rejected the request
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            Self::Write { .. } | Self::Read { .. } | Self::Connect(_)
        )
    }
}
