//! Game Model Module
//!
//! Every entity the server keeps authoritative state for.
//!
//! ## Module Structure
//!
//! - `storage`: Cargo holds, fuel tanks, capacities
//! - `base`: Bases and outposts
//! - `celestial`: Celestial bodies, asteroid clusters
//! - `ship`: Ships
//! - `ordnance`: Mines, torpedoes, nukes
//! - `state`: The game aggregate
//! - `setup`: New-game generation

pub mod storage;
pub mod base;
pub mod celestial;
pub mod ship;
pub mod ordnance;
pub mod state;
pub mod setup;

// Re-export key types
pub use storage::{Capacity, CargoHold, FuelTank};
pub use base::{Base, BaseSlots, Outpost};
pub use celestial::{AsteroidCluster, BodyKind, CelestialBody, ResourceKind};
pub use ship::Ship;
pub use ordnance::{Ordnance, OrdnanceKind};
pub use state::{Game, RosterError, MAX_PLAYERS, MIN_PLAYERS};
