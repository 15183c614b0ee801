//! Ships.

use crate::core::{EntityId, HexVector, PlayerId};
use crate::game::storage::{CargoHold, FuelTank};

/// A ship in flight or docked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ship {
    /// Owning player
    pub owner: PlayerId,
    /// Display name
    pub name: String,
    /// Entity id
    pub id: EntityId,
    /// Free-form hull type tag
    pub ship_type: String,
    /// Whether the hull is a warship
    pub is_warship: bool,
    /// Current hex
    pub position: HexVector,
    /// Velocity in hexes per turn
    pub velocity: HexVector,
    /// Combat strength
    pub strength: u32,
    /// Defensive-only combat
    pub is_defensive: bool,
    /// Carried cargo
    pub cargo: CargoHold,
    /// Carried fuel
    pub fuel: FuelTank,
    /// Carrying more than capacity allows
    pub overloaded: bool,
    /// Weapon system health (0 to MAX_HEALTH)
    pub weapon_health: u8,
    /// Drive health (0 to MAX_HEALTH)
    pub drive_health: u8,
    /// Structure health (0 to MAX_HEALTH)
    pub structure_health: u8,
}

impl Ship {
    /// Maximum value of each health counter.
    pub const MAX_HEALTH: u8 = 6;

    /// A new, undamaged, stationary-relative ship.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        owner: PlayerId,
        name: impl Into<String>,
        id: EntityId,
        ship_type: impl Into<String>,
        is_warship: bool,
        position: HexVector,
        velocity: HexVector,
        strength: u32,
        is_defensive: bool,
        cargo: CargoHold,
        fuel: FuelTank,
    ) -> Self {
        Self {
            owner,
            name: name.into(),
            id,
            ship_type: ship_type.into(),
            is_warship,
            position,
            velocity,
            strength,
            is_defensive,
            cargo,
            fuel,
            overloaded: false,
            weapon_health: Self::MAX_HEALTH,
            drive_health: Self::MAX_HEALTH,
            structure_health: Self::MAX_HEALTH,
        }
    }
}
