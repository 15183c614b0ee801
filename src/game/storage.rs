//! Cargo holds and fuel tanks.

/// Storage capacity. Bases and outposts have unbounded storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capacity {
    /// At most this many units.
    Finite(u32),
    /// No limit.
    Unbounded,
}

/// Cargo carried by a ship, base, or outpost.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CargoHold {
    /// Mass limit
    pub capacity: Capacity,
    /// Megacredits
    pub money: u32,
    /// Mines
    pub mines: u32,
    /// Torpedoes
    pub torpedoes: u32,
    /// Nukes
    pub nukes: u32,
    /// Outpost kits
    pub outposts: u32,
    /// Refined ore
    pub ore: u32,
    /// Base kits
    pub bases: u32,
}

impl CargoHold {
    /// An empty hold of the given capacity.
    pub fn empty(capacity: Capacity) -> Self {
        Self {
            capacity,
            money: 0,
            mines: 0,
            torpedoes: 0,
            nukes: 0,
            outposts: 0,
            ore: 0,
            bases: 0,
        }
    }

    /// Whether every count is zero.
    pub fn is_empty(&self) -> bool {
        *self == Self::empty(self.capacity)
    }
}

/// Fuel carried by a ship, base, or outpost.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FuelTank {
    /// Fuel limit
    pub capacity: Capacity,
    /// Current fuel
    pub fuel: u32,
}

impl FuelTank {
    /// Create a tank.
    pub fn new(capacity: Capacity, fuel: u32) -> Self {
        Self { capacity, fuel }
    }

    /// An empty tank of the given capacity.
    pub fn empty(capacity: Capacity) -> Self {
        Self::new(capacity, 0)
    }

    /// A tank filled to a finite capacity.
    pub fn full(capacity: u32) -> Self {
        Self::new(Capacity::Finite(capacity), capacity)
    }
}
