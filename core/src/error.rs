//! Error types for the Podio API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the object does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `Http` with the raw status
//! code and body for debugging. Typed field accessors fail with
//! `TypeMismatch` so misuse surfaces as a labeled kind error instead of an
//! opaque cast failure.

use serde_json::Value;
use thiserror::Error;

use crate::field::FieldType;
use crate::values::describe;

/// Errors returned by service methods and typed accessors.
#[derive(Debug, Error)]
pub enum PodioError {
    /// The server returned 404 — the requested object does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The transport failed before a response was produced. Propagated
    /// verbatim; the client performs no retries.
    #[error("transport error: {0}")]
    Transport(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// A typed accessor was used against a field of a different kind, or a
    /// raw value did not have the shape its kind tag promises.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
}

impl PodioError {
    /// Accessor misuse: the field's declared kind differs from the one the
    /// accessor handles.
    pub(crate) fn kind_mismatch(expected: FieldType, actual: FieldType) -> Self {
        PodioError::TypeMismatch {
            expected: format!("{expected} field"),
            found: format!("{actual} field"),
        }
    }

    /// A raw entry that cannot be projected into the declared kind's shape.
    pub(crate) fn value_mismatch(expected: &str, found: &Value) -> Self {
        PodioError::TypeMismatch {
            expected: expected.to_string(),
            found: format!("{} {found}", describe(found)),
        }
    }
}
