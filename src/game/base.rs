//! Bases and outposts.
//!
//! Structurally identical installations; bases sit on celestial bodies,
//! outposts sit on asteroid clusters.

use crate::core::{EntityId, HexVector, PlayerId};
use crate::game::storage::{Capacity, CargoHold, FuelTank};

/// A player installation on a celestial body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Base {
    /// Owning player
    pub owner: PlayerId,
    /// Display name
    pub name: String,
    /// Entity id
    pub id: EntityId,
    /// Hex the base occupies
    pub position: HexVector,
    /// Stored cargo
    pub cargo: CargoHold,
    /// Stored fuel
    pub fuel: FuelTank,
}

impl Base {
    /// A new base with empty, unbounded storage.
    pub fn new(
        owner: PlayerId,
        name: impl Into<String>,
        id: EntityId,
        position: HexVector,
    ) -> Self {
        Self {
            owner,
            name: name.into(),
            id,
            position,
            cargo: CargoHold::empty(Capacity::Unbounded),
            fuel: FuelTank::empty(Capacity::Unbounded),
        }
    }
}

/// A player installation on an asteroid cluster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outpost {
    /// Owning player
    pub owner: PlayerId,
    /// Display name
    pub name: String,
    /// Entity id
    pub id: EntityId,
    /// Hex the outpost occupies
    pub position: HexVector,
    /// Stored cargo
    pub cargo: CargoHold,
    /// Stored fuel
    pub fuel: FuelTank,
}

impl Outpost {
    /// A new outpost with empty, unbounded storage.
    pub fn new(
        owner: PlayerId,
        name: impl Into<String>,
        id: EntityId,
        position: HexVector,
    ) -> Self {
        Self {
            owner,
            name: name.into(),
            id,
            position,
            cargo: CargoHold::empty(Capacity::Unbounded),
            fuel: FuelTank::empty(Capacity::Unbounded),
        }
    }
}

/// Fixed-size ring of base slots around (or on) a body.
///
/// Slot `i` corresponds to the `i`th entry of [`HexVector::adjacent`].
pub type BaseSlots = [Option<Base>; 6];

/// Six empty slots.
pub fn empty_slots() -> BaseSlots {
    Default::default()
}
