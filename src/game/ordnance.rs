//! Mines, torpedoes, and nukes in flight.

use crate::core::{EntityId, HexVector, PlayerId};

/// Kind of ordnance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OrdnanceKind {
    /// Stationary-relative area denial
    Mine,
    /// Guided
    Torpedo,
    /// Area destruction
    Nuke,
}

impl OrdnanceKind {
    /// Wire tag.
    pub fn tag(self) -> &'static str {
        match self {
            OrdnanceKind::Mine => "M",
            OrdnanceKind::Torpedo => "T",
            OrdnanceKind::Nuke => "N",
        }
    }

    /// Parse a wire tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "M" => Some(OrdnanceKind::Mine),
            "T" => Some(OrdnanceKind::Torpedo),
            "N" => Some(OrdnanceKind::Nuke),
            _ => None,
        }
    }
}

/// A launched piece of ordnance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ordnance {
    /// Launching player
    pub owner: PlayerId,
    /// Entity id
    pub id: EntityId,
    /// Current hex
    pub position: HexVector,
    /// Velocity in hexes per turn
    pub velocity: HexVector,
    /// Turns until self-destruct
    pub ttl: u32,
    /// Kind
    pub kind: OrdnanceKind,
}

impl Ordnance {
    /// Lifetime of freshly launched ordnance.
    pub const DEFAULT_TTL: u32 = 5;

    /// Launch new ordnance with the default lifetime.
    pub fn launch(
        owner: PlayerId,
        id: EntityId,
        position: HexVector,
        velocity: HexVector,
        kind: OrdnanceKind,
    ) -> Self {
        Self {
            owner,
            id,
            position,
            velocity,
            ttl: Self::DEFAULT_TTL,
            kind,
        }
    }
}
