//! Core primitives.
//!
//! Hex-grid coordinates and opaque identifiers shared by every other layer.

pub mod hex;
pub mod id;

// Re-export core types
pub use hex::HexVector;
pub use id::{EntityId, PlayerId};
