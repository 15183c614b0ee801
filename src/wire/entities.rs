//! Wire forms of vectors, storage, installations, ships, and ordnance.

use serde_json::{json, Value};

use crate::core::{EntityId, HexVector, PlayerId};
use crate::game::{Base, CargoHold, FuelTank, Ordnance, OrdnanceKind, Outpost, Ship};
use crate::wire::{encode_capacity, DecodeError, Fields, Wire};

impl Wire for HexVector {
    fn encode(&self) -> Value {
        json!({ "q": self.q, "r": self.r })
    }

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::of(value, "vec2")?;
        let vector = HexVector::new(fields.int("q")?, fields.int("r")?);
        if !vector.in_range() {
            return Err(fields.inconsistent(
                "q",
                format!("coordinates must stay within {} on every axis", HexVector::LIMIT),
            ));
        }
        Ok(vector)
    }
}

impl Wire for CargoHold {
    fn encode(&self) -> Value {
        json!({
            "capacity": encode_capacity(self.capacity),
            "money": self.money,
            "mines": self.mines,
            "torpedoes": self.torpedoes,
            "nukes": self.nukes,
            "outposts": self.outposts,
            "ore": self.ore,
            "bases": self.bases,
        })
    }

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::of(value, "cargo hold")?;
        Ok(CargoHold {
            capacity: fields.capacity("capacity")?,
            money: fields.count("money")?,
            mines: fields.count("mines")?,
            torpedoes: fields.count("torpedoes")?,
            nukes: fields.count("nukes")?,
            outposts: fields.count("outposts")?,
            ore: fields.count("ore")?,
            bases: fields.count("bases")?,
        })
    }
}

impl Wire for FuelTank {
    fn encode(&self) -> Value {
        json!({
            "capacity": encode_capacity(self.capacity),
            "fuel": self.fuel,
        })
    }

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::of(value, "fuel tank")?;
        Ok(FuelTank::new(fields.capacity("capacity")?, fields.count("fuel")?))
    }
}

// Bases and outposts share one shape under different names.
struct Installation {
    owner: PlayerId,
    name: String,
    id: EntityId,
    position: HexVector,
    cargo: CargoHold,
    fuel: FuelTank,
}

fn encode_installation(
    owner: &PlayerId,
    name: &str,
    id: &EntityId,
    position: HexVector,
    cargo: &CargoHold,
    fuel: &FuelTank,
) -> Value {
    json!({
        "owner": owner,
        "name": name,
        "id": id,
        "position": position.encode(),
        "cargo": cargo.encode(),
        "fuel": fuel.encode(),
    })
}

fn decode_installation(value: &Value, context: &'static str) -> Result<Installation, DecodeError> {
    let fields = Fields::of(value, context)?;
    Ok(Installation {
        owner: PlayerId::new(fields.string("owner")?),
        name: fields.string("name")?,
        id: EntityId::new(fields.string("id")?),
        position: fields.nested("position")?,
        cargo: fields.nested("cargo")?,
        fuel: fields.nested("fuel")?,
    })
}

impl Wire for Base {
    fn encode(&self) -> Value {
        encode_installation(
            &self.owner,
            &self.name,
            &self.id,
            self.position,
            &self.cargo,
            &self.fuel,
        )
    }

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let Installation {
            owner,
            name,
            id,
            position,
            cargo,
            fuel,
        } = decode_installation(value, "base")?;
        Ok(Base {
            owner,
            name,
            id,
            position,
            cargo,
            fuel,
        })
    }
}

impl Wire for Outpost {
    fn encode(&self) -> Value {
        encode_installation(
            &self.owner,
            &self.name,
            &self.id,
            self.position,
            &self.cargo,
            &self.fuel,
        )
    }

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let Installation {
            owner,
            name,
            id,
            position,
            cargo,
            fuel,
        } = decode_installation(value, "outpost")?;
        Ok(Outpost {
            owner,
            name,
            id,
            position,
            cargo,
            fuel,
        })
    }
}

impl Wire for Ship {
    fn encode(&self) -> Value {
        json!({
            "owner": self.owner,
            "name": self.name,
            "id": self.id,
            "type": self.ship_type,
            "isWarship": self.is_warship,
            "position": self.position.encode(),
            "velocity": self.velocity.encode(),
            "strength": self.strength,
            "isDefensive": self.is_defensive,
            "cargo": self.cargo.encode(),
            "fuel": self.fuel.encode(),
            "overloaded": self.overloaded,
            "weaponHealth": self.weapon_health,
            "driveHealth": self.drive_health,
            "structureHealth": self.structure_health,
        })
    }

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::of(value, "ship")?;
        Ok(Ship {
            owner: PlayerId::new(fields.string("owner")?),
            name: fields.string("name")?,
            id: EntityId::new(fields.string("id")?),
            ship_type: fields.string("type")?,
            is_warship: fields.boolean("isWarship")?,
            position: fields.nested("position")?,
            velocity: fields.nested("velocity")?,
            strength: fields.count("strength")?,
            is_defensive: fields.boolean("isDefensive")?,
            cargo: fields.nested("cargo")?,
            fuel: fields.nested("fuel")?,
            overloaded: fields.boolean("overloaded")?,
            weapon_health: fields.health("weaponHealth", Ship::MAX_HEALTH)?,
            drive_health: fields.health("driveHealth", Ship::MAX_HEALTH)?,
            structure_health: fields.health("structureHealth", Ship::MAX_HEALTH)?,
        })
    }
}

impl Wire for Ordnance {
    fn encode(&self) -> Value {
        json!({
            "owner": self.owner,
            "id": self.id,
            "position": self.position.encode(),
            "velocity": self.velocity.encode(),
            "ttl": self.ttl,
            "type": self.kind.tag(),
        })
    }

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::of(value, "ordnance")?;
        Ok(Ordnance {
            owner: PlayerId::new(fields.string("owner")?),
            id: EntityId::new(fields.string("id")?),
            position: fields.nested("position")?,
            velocity: fields.nested("velocity")?,
            ttl: fields.count("ttl")?,
            kind: fields
                .get("type")?
                .as_str()
                .and_then(OrdnanceKind::from_tag)
                .ok_or_else(|| fields.wrong("type", "one of 'M', 'T', 'N'"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Capacity;

    fn sample_ship() -> Ship {
        let mut ship = Ship::new(
            PlayerId::new("11"),
            "Rocinante",
            EntityId::new("s1"),
            "corvette",
            true,
            HexVector::new(4, -2),
            HexVector::new(-1, 1),
            8,
            false,
            CargoHold { torpedoes: 2, ore: 5, ..CargoHold::empty(Capacity::Finite(20)) },
            FuelTank::full(12),
        );
        ship.overloaded = true;
        ship.drive_health = 3;
        ship
    }

    #[test]
    fn test_vector_shape() {
        assert_eq!(HexVector::new(3, -3).encode(), json!({ "q": 3, "r": -3 }));
    }

    #[test]
    fn test_vector_rejects_overflowing_coordinates() {
        for (q, r) in [(i32::MAX, i32::MAX), (i32::MAX, 0), (0, i32::MIN), (HexVector::LIMIT, 1)] {
            let err = HexVector::decode(&json!({ "q": q, "r": r })).unwrap_err();
            assert!(matches!(err, DecodeError::Inconsistent { field: "q", .. }), "{:?}", err);
        }

        let limit = HexVector::LIMIT;
        let edge = HexVector::decode(&json!({ "q": limit, "r": -limit })).unwrap();
        assert_eq!(edge.adjacent()[0].distance(edge), 1);
    }

    #[test]
    fn test_fuel_tank_unbounded() {
        let tank = FuelTank::decode(&json!({ "capacity": "Infinity", "fuel": 0 })).unwrap();
        assert_eq!(tank, FuelTank::empty(Capacity::Unbounded));
    }

    #[test]
    fn test_empty_unbounded_hold_encodes_sentinel() {
        let encoded = CargoHold::empty(Capacity::Unbounded).encode();
        assert_eq!(encoded["capacity"], json!("Infinity"));
    }

    #[test]
    fn test_roundtrip_installations() {
        let mut base = Base::new(
            PlayerId::new("7"),
            "Washington",
            EntityId::new("b"),
            HexVector::new(13, -6),
        );
        base.cargo.money = 25;
        base.fuel.fuel = 40;
        assert_eq!(Base::decode(&base.encode()), Ok(base));

        let outpost = Outpost::new(
            PlayerId::new("7"),
            "Camp",
            EntityId::new("o"),
            HexVector::new(20, 1),
        );
        assert_eq!(Outpost::decode(&outpost.encode()), Ok(outpost));
    }

    #[test]
    fn test_roundtrip_ship() {
        let ship = sample_ship();
        let encoded = ship.encode();
        assert_eq!(encoded["type"], json!("corvette"));
        assert_eq!(encoded["isWarship"], json!(true));
        assert_eq!(Ship::decode(&encoded), Ok(ship));
    }

    #[test]
    fn test_roundtrip_ordnance() {
        let nuke = Ordnance::launch(
            PlayerId::new("2"),
            EntityId::new("n"),
            HexVector::new(1, 1),
            HexVector::new(0, 2),
            OrdnanceKind::Nuke,
        );
        let encoded = nuke.encode();
        assert_eq!(encoded["type"], json!("N"));
        assert_eq!(Ordnance::decode(&encoded), Ok(nuke));
    }

    #[test]
    fn test_ship_rejects_excess_health() {
        let mut encoded = sample_ship().encode();
        encoded["weaponHealth"] = json!(7);
        let err = Ship::decode(&encoded).unwrap_err();
        assert_eq!(err.to_string(), "malformed input: ship 'weaponHealth' must be at most 6");
    }

    #[test]
    fn test_ordnance_rejects_unknown_kind() {
        let mut encoded = Ordnance::launch(
            PlayerId::new("2"),
            EntityId::new("m"),
            HexVector::ZERO,
            HexVector::ZERO,
            OrdnanceKind::Mine,
        ).encode();
        encoded["type"] = json!("MINE");
        assert!(matches!(
            Ordnance::decode(&encoded),
            Err(DecodeError::WrongType { field: "type", .. })
        ));
    }

    #[test]
    fn test_nested_failure_names_inner_entity() {
        let mut encoded = sample_ship().encode();
        encoded["cargo"]["nukes"] = json!("three");
        let err = Ship::decode(&encoded).unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed input: cargo hold 'nukes' must be a non-negative integer"
        );
    }

    #[test]
    fn test_first_failure_wins() {
        let err = Base::decode(&json!({ "name": 5 })).unwrap_err();
        assert_eq!(err, DecodeError::MissingField { context: "base", field: "owner" });
    }
}
