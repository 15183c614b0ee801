//! Wire form of the game aggregate.

use serde_json::{json, Value};

use crate::core::PlayerId;
use crate::game::{Game, RosterError};
use crate::wire::{decode_all, encode_all, DecodeError, Fields, Wire};

impl Wire for Game {
    fn encode(&self) -> Value {
        json!({
            "numPlayers": self.num_players(),
            "playerNames": self.player_names(),
            "playerIds": self.player_ids(),
            "celestials": encode_all(&self.celestials),
            "asteroids": encode_all(&self.asteroids),
            "ships": encode_all(&self.ships),
            "ordnance": encode_all(&self.ordnance),
        })
    }

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::of(value, "game")?;

        let num_players = fields
            .get("numPlayers")?
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| fields.wrong("numPlayers", "a non-negative integer"))?;
        let player_names = fields.strings("playerNames")?;
        let player_ids = fields
            .strings("playerIds")?
            .into_iter()
            .map(PlayerId::new)
            .collect();
        let celestials = decode_all(fields.array("celestials")?)?;
        let asteroids = decode_all(fields.array("asteroids")?)?;
        let ships = decode_all(fields.array("ships")?)?;
        let ordnance = decode_all(fields.array("ordnance")?)?;

        Game::new(
            num_players,
            player_names,
            player_ids,
            celestials,
            asteroids,
            ships,
            ordnance,
        )
        .map_err(|err| {
            let field = match err {
                RosterError::UnsupportedPlayerCount(_) => "numPlayers",
                RosterError::IdCount { .. } | RosterError::DuplicateId(_) => "playerIds",
                RosterError::TooManyNames { .. } | RosterError::DuplicateName(_) => "playerNames",
            };
            fields.inconsistent(field, err.to_string())
        })
    }
}
