//! Celestial bodies and asteroid clusters.

use crate::core::{EntityId, HexVector, PlayerId};
use crate::game::base::{empty_slots, Base, BaseSlots, Outpost};

// =============================================================================
// CELESTIAL BODIES
// =============================================================================

/// What a body can host. Resolved structurally when decoding.
#[derive(Clone, Debug, PartialEq)]
pub enum BodyKind {
    /// Nothing can be built here (e.g. the sun).
    Plain,
    /// Gas giant: orbital bases only.
    Orbitable {
        /// Orbital slots
        orbital_bases: BaseSlots,
    },
    /// Terrestrial body: orbital and surface bases.
    Landable {
        /// Orbital slots
        orbital_bases: BaseSlots,
        /// Surface slots
        surface_bases: BaseSlots,
    },
    /// Dwarf planet or large asteroid: a single optional surface base.
    Minor {
        /// The surface base, if built
        surface_base: Option<Base>,
    },
}

/// A planet, moon, star, or minor body.
#[derive(Clone, Debug, PartialEq)]
pub struct CelestialBody {
    /// Display name
    pub name: String,
    /// Entity id
    pub id: EntityId,
    /// Hex the body occupies
    pub position: HexVector,
    /// Render radius in hex units
    pub radius: f64,
    /// `#rrggbb` render colour
    pub colour: String,
    /// Capabilities and installed bases
    pub kind: BodyKind,
}

impl CelestialBody {
    fn with_kind(
        name: impl Into<String>,
        id: EntityId,
        position: HexVector,
        radius: f64,
        colour: impl Into<String>,
        kind: BodyKind,
    ) -> Self {
        Self {
            name: name.into(),
            id,
            position,
            radius,
            colour: colour.into(),
            kind,
        }
    }

    /// A body with no installations.
    pub fn plain(
        name: impl Into<String>,
        id: EntityId,
        position: HexVector,
        radius: f64,
        colour: impl Into<String>,
    ) -> Self {
        Self::with_kind(name, id, position, radius, colour, BodyKind::Plain)
    }

    /// A body with empty orbital slots.
    pub fn orbitable(
        name: impl Into<String>,
        id: EntityId,
        position: HexVector,
        radius: f64,
        colour: impl Into<String>,
    ) -> Self {
        Self::with_kind(name, id, position, radius, colour, BodyKind::Orbitable {
            orbital_bases: empty_slots(),
        })
    }

    /// A body with empty orbital and surface slots.
    pub fn landable(
        name: impl Into<String>,
        id: EntityId,
        position: HexVector,
        radius: f64,
        colour: impl Into<String>,
    ) -> Self {
        Self::with_kind(name, id, position, radius, colour, BodyKind::Landable {
            orbital_bases: empty_slots(),
            surface_bases: empty_slots(),
        })
    }

    /// A minor body without a surface base.
    pub fn minor(
        name: impl Into<String>,
        id: EntityId,
        position: HexVector,
        radius: f64,
        colour: impl Into<String>,
    ) -> Self {
        Self::with_kind(name, id, position, radius, colour, BodyKind::Minor { surface_base: None })
    }

    /// Whether this is a minor body.
    pub fn is_minor(&self) -> bool {
        matches!(self.kind, BodyKind::Minor { .. })
    }

    /// Mutable surface slots, if the body has them.
    pub fn surface_bases_mut(&mut self) -> Option<&mut BaseSlots> {
        match &mut self.kind {
            BodyKind::Landable { surface_bases, .. } => Some(surface_bases),
            _ => None,
        }
    }

    /// Every base on this body, orbital slots first.
    pub fn bases(&self) -> impl Iterator<Item = &Base> {
        let (orbital, surface, single): (Option<&BaseSlots>, Option<&BaseSlots>, Option<&Base>) =
            match &self.kind {
                BodyKind::Plain => (None, None, None),
                BodyKind::Orbitable { orbital_bases } => (Some(orbital_bases), None, None),
                BodyKind::Landable {
                    orbital_bases,
                    surface_bases,
                } => (Some(orbital_bases), Some(surface_bases), None),
                BodyKind::Minor { surface_base } => (None, None, surface_base.as_ref()),
            };
        orbital
            .into_iter()
            .flatten()
            .chain(surface.into_iter().flatten())
            .flatten()
            .chain(single)
    }

    /// Every base on this body, mutably.
    pub fn bases_mut(&mut self) -> impl Iterator<Item = &mut Base> {
        let (orbital, surface, single): (
            Option<&mut BaseSlots>,
            Option<&mut BaseSlots>,
            Option<&mut Base>,
        ) = match &mut self.kind {
            BodyKind::Plain => (None, None, None),
            BodyKind::Orbitable { orbital_bases } => (Some(orbital_bases), None, None),
            BodyKind::Landable {
                orbital_bases,
                surface_bases,
            } => (Some(orbital_bases), Some(surface_bases), None),
            BodyKind::Minor { surface_base } => (None, None, surface_base.as_mut()),
        };
        orbital
            .into_iter()
            .flatten()
            .chain(surface.into_iter().flatten())
            .flatten()
            .chain(single)
    }
}

// =============================================================================
// ASTEROID CLUSTERS
// =============================================================================

/// Resource present in an asteroid cluster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ResourceKind {
    /// Not yet prospected by the viewer.
    Unknown = 0,
    /// Mineable ore
    Ore = 1,
    /// Ice (fuel)
    Ice = 2,
    /// Barren
    None = 3,
}

impl ResourceKind {
    /// Wire tag.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Parse a wire tag.
    pub fn from_tag(tag: u64) -> Option<Self> {
        match tag {
            0 => Some(ResourceKind::Unknown),
            1 => Some(ResourceKind::Ore),
            2 => Some(ResourceKind::Ice),
            3 => Some(ResourceKind::None),
            _ => None,
        }
    }

    /// Resource rolled on a d6 when the belt is generated.
    pub fn from_d6(roll: u8) -> Self {
        match roll {
            1 => ResourceKind::Ice,
            6 => ResourceKind::Ore,
            _ => ResourceKind::None,
        }
    }
}

/// A hex of the asteroid belt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsteroidCluster {
    /// Entity id
    pub id: EntityId,
    /// Hex the cluster occupies
    pub position: HexVector,
    /// True resource; fixed at creation
    resource: ResourceKind,
    /// Players who know the true resource
    pub prospected: Vec<PlayerId>,
    /// Outpost built here, if any
    pub outpost: Option<Outpost>,
}

impl AsteroidCluster {
    /// Belt generation: chance that an eligible hex holds a cluster.
    pub const BELT_DENSITY: f64 = 0.15;
    /// Belt generation: outer radius from the sun.
    pub const BELT_OUTER_RADIUS: i32 = 30;
    /// Belt generation: inner radius from the sun.
    pub const BELT_INNER_RADIUS: u32 = 19;
    /// Belt generation: clearance around non-minor bodies.
    pub const BELT_BODY_STANDOFF: u32 = 5;

    /// Create a cluster.
    pub fn new(
        id: EntityId,
        position: HexVector,
        resource: ResourceKind,
        prospected: Vec<PlayerId>,
        outpost: Option<Outpost>,
    ) -> Self {
        Self { id, position, resource, prospected, outpost }
    }

    /// True resource kind, regardless of who has prospected.
    pub fn resource(&self) -> ResourceKind {
        self.resource
    }

    /// Whether `player` knows the true resource kind.
    pub fn is_prospected_by(&self, player: &PlayerId) -> bool {
        self.prospected.contains(player)
    }

    /// Record that `player` has prospected this cluster.
    ///
    /// Returns false if they already had.
    pub fn prospect(&mut self, player: PlayerId) -> bool {
        if self.is_prospected_by(&player) {
            return false;
        }
        self.prospected.push(player);
        true
    }
}
