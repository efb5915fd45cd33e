//! Error types for the spatial join.

use crate::types::FeatureId;
use thiserror::Error;

/// Errors raised while configuring or running a join.
///
/// Per-point weight parse failures never show up here; they are absorbed by the
/// join engine and counted in [`JoinSummary::weights_skipped`](crate::JoinSummary).
#[derive(Error, Debug)]
pub enum PolysumError {
    /// A field name did not resolve against a layer schema.
    #[error("Field '{field}' not found in {layer} layer")]
    FieldNotFound { field: String, layer: String },

    /// Configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A geometry cannot be indexed or prepared.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Malformed collaborator data.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A point source was asked for an identifier it does not hold.
    #[error("Feature {0} not found")]
    FeatureNotFound(FeatureId),

    /// Sink lifecycle violation or sink-side write failure.
    #[error("Sink error: {0}")]
    Sink(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for join operations.
pub type Result<T> = std::result::Result<T, PolysumError>;
