//! Wire forms of celestial bodies and asteroid clusters.
//!
//! A body's variant is not tagged on the wire; it is recovered from which
//! slot fields are present.

use serde_json::{json, Map, Value};

use crate::core::{EntityId, PlayerId};
use crate::game::{AsteroidCluster, Base, BaseSlots, BodyKind, CelestialBody, ResourceKind};
use crate::wire::{encode_nullable, DecodeError, Fields, Wire};

fn is_colour(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 7
        && bytes[0] == b'#'
        && bytes[1..].iter().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

fn encode_slots(slots: &BaseSlots) -> Value {
    Value::Array(slots.iter().map(|slot| encode_nullable(slot.as_ref())).collect())
}

fn decode_slots(fields: &Fields<'_>, field: &'static str) -> Result<BaseSlots, DecodeError> {
    let values = fields.array(field)?;
    if values.len() != 6 {
        return Err(fields.inconsistent(field, format!("must have 6 slots, got {}", values.len())));
    }

    let mut slots = BaseSlots::default();
    for (slot, value) in slots.iter_mut().zip(values) {
        *slot = match value {
            Value::Null => None,
            value => Some(Base::decode(value)?),
        };
    }
    Ok(slots)
}

fn is_array(fields: &Fields<'_>, field: &'static str) -> bool {
    fields.get(field).map_or(false, Value::is_array)
}

impl Wire for CelestialBody {
    fn encode(&self) -> Value {
        let mut map = Map::new();
        map.insert("name".into(), json!(self.name));
        map.insert("id".into(), json!(self.id));
        map.insert("position".into(), self.position.encode());
        map.insert("radius".into(), json!(self.radius));
        map.insert("colour".into(), json!(self.colour));

        match &self.kind {
            BodyKind::Plain => {}
            BodyKind::Orbitable { orbital_bases } => {
                map.insert("orbitalBases".into(), encode_slots(orbital_bases));
            }
            BodyKind::Landable { orbital_bases, surface_bases } => {
                map.insert("orbitalBases".into(), encode_slots(orbital_bases));
                map.insert("surfaceBases".into(), encode_slots(surface_bases));
            }
            BodyKind::Minor { surface_base } => {
                map.insert("surfaceBase".into(), encode_nullable(surface_base.as_ref()));
            }
        }

        Value::Object(map)
    }

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::of(value, "celestial body")?;

        let name = fields.string("name")?;
        let id = EntityId::new(fields.string("id")?);
        let position = fields.nested("position")?;
        let radius = fields.number("radius")?;
        let colour = fields.string("colour")?;
        if !is_colour(&colour) {
            return Err(fields.wrong("colour", "a string of the form #rrggbb (lowercase hex)"));
        }

        // Dispatch order matters: a minor body is recognised before the slot arrays.
        let kind = if fields.has("surfaceBase") {
            BodyKind::Minor {
                surface_base: fields.nullable("surfaceBase")?,
            }
        } else if is_array(&fields, "surfaceBases") && is_array(&fields, "orbitalBases") {
            BodyKind::Landable {
                orbital_bases: decode_slots(&fields, "orbitalBases")?,
                surface_bases: decode_slots(&fields, "surfaceBases")?,
            }
        } else if is_array(&fields, "orbitalBases") {
            BodyKind::Orbitable {
                orbital_bases: decode_slots(&fields, "orbitalBases")?,
            }
        } else {
            BodyKind::Plain
        };

        Ok(CelestialBody { name, id, position, radius, colour, kind })
    }
}

impl Wire for AsteroidCluster {
    fn encode(&self) -> Value {
        json!({
            "id": self.id,
            "position": self.position.encode(),
            "resource": self.resource().tag(),
            "prospected": self.prospected,
            "outpost": encode_nullable(self.outpost.as_ref()),
        })
    }

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::of(value, "asteroid cluster")?;

        let id = EntityId::new(fields.string("id")?);
        let position = fields.nested("position")?;
        let resource = fields
            .get("resource")?
            .as_u64()
            .and_then(ResourceKind::from_tag)
            .ok_or_else(|| fields.wrong("resource", "a resource tag between 0 and 3"))?;
        let prospected = fields
            .strings("prospected")?
            .into_iter()
            .map(PlayerId::new)
            .collect();
        let outpost = fields.nullable("outpost")?;

        Ok(AsteroidCluster::new(id, position, resource, prospected, outpost))
    }
}
