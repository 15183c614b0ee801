//! Game State
//!
//! The aggregate root. Owns every entity and the player roster.

use crate::core::PlayerId;
use crate::game::celestial::{AsteroidCluster, CelestialBody};
use crate::game::ordnance::Ordnance;
use crate::game::ship::Ship;

/// Fewest players a game can be created for.
pub const MIN_PLAYERS: usize = 2;

/// Most players a game can be created for.
pub const MAX_PLAYERS: usize = 6;

/// Authoritative game state.
///
/// `player_ids` is fixed at creation and always holds `num_players` entries.
/// `player_names` grows as players join; `player_names[i]` belongs to
/// `player_ids[i]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Game {
    num_players: usize,
    player_names: Vec<String>,
    player_ids: Vec<PlayerId>,

    /// Planets, moons, and the sun
    pub celestials: Vec<CelestialBody>,
    /// Belt hexes
    pub asteroids: Vec<AsteroidCluster>,
    /// Ships in play
    pub ships: Vec<Ship>,
    /// Ordnance in flight
    pub ordnance: Vec<Ordnance>,
}

/// Roster invariant violated when assembling a game.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    /// Player count outside the supported range.
    #[error("player count {0} outside 2..=6")]
    UnsupportedPlayerCount(usize),
    /// Identity list length differs from the player count.
    #[error("expected {expected} player ids, got {actual}")]
    IdCount {
        /// Player count
        expected: usize,
        /// Ids supplied
        actual: usize,
    },
    /// More names than seats.
    #[error("{names} player names exceed {seats} seats")]
    TooManyNames {
        /// Names supplied
        names: usize,
        /// Player count
        seats: usize,
    },
    /// Two seats share an identity.
    #[error("player id {0} appears more than once")]
    DuplicateId(PlayerId),
    /// Two seats share a name.
    #[error("player name {0:?} appears more than once")]
    DuplicateName(String),
}

impl Game {
    /// Assemble a game, checking the roster invariants.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        num_players: usize,
        player_names: Vec<String>,
        player_ids: Vec<PlayerId>,
        celestials: Vec<CelestialBody>,
        asteroids: Vec<AsteroidCluster>,
        ships: Vec<Ship>,
        ordnance: Vec<Ordnance>,
    ) -> Result<Self, RosterError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&num_players) {
            return Err(RosterError::UnsupportedPlayerCount(num_players));
        }
        if player_ids.len() != num_players {
            return Err(RosterError::IdCount {
                expected: num_players,
                actual: player_ids.len(),
            });
        }
        if player_names.len() > num_players {
            return Err(RosterError::TooManyNames {
                names: player_names.len(),
                seats: num_players,
            });
        }
        if let Some(id) = first_repeat(&player_ids) {
            return Err(RosterError::DuplicateId(id.clone()));
        }
        if let Some(name) = first_repeat(&player_names) {
            return Err(RosterError::DuplicateName(name.clone()));
        }

        Ok(Self {
            num_players,
            player_names,
            player_ids,
            celestials,
            asteroids,
            ships,
            ordnance,
        })
    }

    /// Number of seats, fixed at creation.
    pub fn num_players(&self) -> usize {
        self.num_players
    }

    /// Names of joined players, in join order.
    pub fn player_names(&self) -> &[String] {
        &self.player_names
    }

    /// Every player identity, joined or not.
    pub fn player_ids(&self) -> &[PlayerId] {
        &self.player_ids
    }

    /// Whether every seat has been claimed.
    pub fn is_full(&self) -> bool {
        self.player_names.len() >= self.num_players
    }

    /// Identity bound to a joined player's name.
    pub fn player_by_name(&self, name: &str) -> Option<&PlayerId> {
        self.player_names
            .iter()
            .position(|n| n == name)
            .and_then(|index| self.player_ids.get(index))
    }

    /// Claim the next free seat for `name`.
    ///
    /// Returns the seat's identity, or `None` if the game is full or `name`
    /// already holds a seat.
    pub fn seat_player(&mut self, name: impl Into<String>) -> Option<PlayerId> {
        let name = name.into();
        if self.player_by_name(&name).is_some() {
            return None;
        }
        let id = self.player_ids.get(self.player_names.len())?.clone();
        self.player_names.push(name);
        Some(id)
    }
}

fn first_repeat<T: PartialEq>(items: &[T]) -> Option<&T> {
    items
        .iter()
        .enumerate()
        .find(|(i, item)| items[..*i].contains(item))
        .map(|(_, item)| item)
}
