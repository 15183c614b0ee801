//! Opaque identifiers.
//!
//! Ids are random v4 UUIDs rendered as decimal digits, so the browser client
//! can match them with a plain numeric pattern.

use std::fmt;
use serde::Serialize;

fn generate() -> String {
    uuid::Uuid::new_v4().as_u128().to_string()
}

/// Stable player identity, assigned once at game creation.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Generate a fresh identity.
    pub fn generate() -> Self {
        Self(generate())
    }

    /// Wrap an existing token (decoded from the wire or a save file).
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier for a celestial body, base, ship, or other entity.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Generate a fresh id.
    pub fn generate() -> Self {
        Self(generate())
    }

    /// Wrap an existing id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
