//! New-game setup.
//!
//! Lays out the solar system, gives each player a capital on Terra, and
//! scatters the asteroid belt.

use rand::Rng;

use crate::core::{EntityId, HexVector, PlayerId};
use crate::game::base::Base;
use crate::game::celestial::{AsteroidCluster, CelestialBody, ResourceKind};
use crate::game::state::{Game, RosterError, MAX_PLAYERS, MIN_PLAYERS};

/// Capital name for each player slot.
pub const PLAYER_CAPITALS: [&str; MAX_PLAYERS] =
    ["Washington", "Beijing", "Tokyo", "Berlin", "London", "New Delhi"];

/// Money in each capital at game start.
pub const STARTING_MONEY: u32 = 25;

/// Index of Terra in the celestial list produced by [`solar_system`].
const TERRA: usize = 3;

/// The fixed set of bodies, sun first.
pub fn solar_system() -> Vec<CelestialBody> {
    let id = EntityId::generate;
    vec![
        CelestialBody::plain("Sol", id(), HexVector::new(0, 0), 0.8, "#ffff00"),
        CelestialBody::landable("Mercury", id(), HexVector::new(1, 3), 0.3, "#404040"),
        CelestialBody::landable("Venus", id(), HexVector::new(-8, 4), 0.6, "#ffc000"),
        CelestialBody::landable("Terra", id(), HexVector::new(13, -6), 0.6, "#0000ff"),
        CelestialBody::landable("Luna", id(), HexVector::new(16, -7), 0.4, "#808080"),
        CelestialBody::landable("Mars", id(), HexVector::new(1, -20), 0.5, "#ff0000"),
        CelestialBody::minor("Ceres", id(), HexVector::new(22, -26), 0.3, "#808080"),
        CelestialBody::minor("Vesta", id(), HexVector::new(-2, 26), 0.3, "#808080"),
        CelestialBody::orbitable("Jupiter", id(), HexVector::new(20, -42), 0.8, "#ffc000"),
        CelestialBody::landable("Europa", id(), HexVector::new(20, -39), 0.3, "#a0a0ff"),
        CelestialBody::landable("Callisto", id(), HexVector::new(16, -42), 0.3, "#404040"),
        CelestialBody::landable("Ganymede", id(), HexVector::new(24, -44), 0.3, "#404040"),
    ]
}

/// Whether a belt cluster may be placed at `position`.
fn belt_admits(celestials: &[CelestialBody], position: HexVector) -> bool {
    let sun = celestials.first().map(|b| b.position).unwrap_or(HexVector::ZERO);
    if position.distance(sun) < AsteroidCluster::BELT_INNER_RADIUS {
        return false;
    }

    celestials.iter().all(|body| {
        let standoff = if body.is_minor() { 0 } else { AsteroidCluster::BELT_BODY_STANDOFF };
        body.position.distance(position) > standoff
    })
}

/// Scatter the asteroid belt around the sun.
pub fn asteroid_belt<R: Rng + ?Sized>(
    celestials: &[CelestialBody],
    rng: &mut R,
) -> Vec<AsteroidCluster> {
    let outer = AsteroidCluster::BELT_OUTER_RADIUS;
    let mut belt = Vec::new();

    for q in -outer..=outer {
        for r in (-outer).max(-q - outer)..=outer.min(-q + outer) {
            let position = HexVector::new(q, r);
            if !belt_admits(celestials, position) {
                continue;
            }
            if !rng.gen_bool(AsteroidCluster::BELT_DENSITY) {
                continue;
            }

            let resource = ResourceKind::from_d6(rng.gen_range(1..=6));
            let id = EntityId::generate();
            belt.push(AsteroidCluster::new(id, position, resource, Vec::new(), None));
        }
    }

    belt
}

impl Game {
    /// Generate a fresh game for `num_players` players.
    ///
    /// Player identities are generated here and never change afterwards.
    pub fn setup<R: Rng + ?Sized>(num_players: usize, rng: &mut R) -> Result<Self, RosterError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&num_players) {
            return Err(RosterError::UnsupportedPlayerCount(num_players));
        }

        let player_ids: Vec<PlayerId> = (0..num_players).map(|_| PlayerId::generate()).collect();
        let mut celestials = solar_system();

        let terra = &mut celestials[TERRA];
        let capital_position = terra.position;
        if let Some(slots) = terra.surface_bases_mut() {
            let seats = player_ids.iter().zip(PLAYER_CAPITALS);
            for (slot, (owner, name)) in slots.iter_mut().zip(seats) {
                let mut capital =
                    Base::new(owner.clone(), name, EntityId::generate(), capital_position);
                capital.cargo.money = STARTING_MONEY;
                *slot = Some(capital);
            }
        }

        let asteroids = asteroid_belt(&celestials, rng);

        Game::new(
            num_players,
            Vec::new(),
            player_ids,
            celestials,
            asteroids,
            Vec::new(),
            Vec::new(),
        )
    }
}
