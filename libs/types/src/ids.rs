//! Unique identifier types for booking entities
//!
//! Order IDs are generated from random UUIDs so they are unguessable;
//! they keep the `ord_` prefix used on the wire.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an order
///
/// Opaque string of the form `ord_<32 hex chars>`, generated from a
/// random UUID. Customers receive this id after placing an order, so
/// it must not be guessable or enumerable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Create a new random OrderId
    pub fn new() -> Self {
        Self(format!("ord_{}", Uuid::new_v4().simple()))
    }

    /// Wrap an existing id string (e.g. from a request body)
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a payment authorization owned by the remote processor
///
/// Weak reference: this system stores the identifier only and never
/// manages the remote object's lifecycle directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct AuthorizationId(String);

impl AuthorizationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AuthorizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
