//! Redaction Layer
//!
//! Produces the view of a game one player is entitled to see. Every rule
//! lives in [`Redactor`]; the socket layer and the save file only ever see
//! its output or the unfiltered aggregate.
//!
//! A player viewing someone else's entities sees:
//! - bases and outposts with empty holds and tanks of the same capacity
//! - ships with empty holds and tanks and `overloaded` cleared; health,
//!   position and velocity stay visible
//! - ordnance with a time-to-live of 0
//!
//! Asteroid clusters show their resource only to players who prospected
//! them, and the prospected list never names anyone but the viewer.

use serde_json::Value;

use crate::core::PlayerId;
use crate::game::{AsteroidCluster, CargoHold, FuelTank, Game, Ordnance, ResourceKind, Ship};
use crate::wire::Wire;

/// Whose eyes a view is rendered for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Viewer {
    /// Sees everything. Used for persistence and diagnostics.
    Omniscient,
    /// A seated player.
    Player(PlayerId),
}

impl Viewer {
    /// Whether this viewer may see private state owned by `owner`.
    pub fn owns(&self, owner: &PlayerId) -> bool {
        match self {
            Viewer::Omniscient => true,
            Viewer::Player(id) => id == owner,
        }
    }
}

/// Applies the fog-of-war rules for one viewer.
#[derive(Clone, Copy, Debug)]
pub struct Redactor<'a> {
    viewer: &'a Viewer,
}

impl<'a> Redactor<'a> {
    /// Redactor for `viewer`.
    pub fn new(viewer: &'a Viewer) -> Self {
        Self { viewer }
    }

    /// A redacted copy of `game`. The original is left untouched.
    pub fn redact(&self, game: &Game) -> Game {
        let mut view = game.clone();
        if *self.viewer == Viewer::Omniscient {
            return view;
        }

        for body in &mut view.celestials {
            for base in body.bases_mut() {
                self.installation(&base.owner, &mut base.cargo, &mut base.fuel);
            }
        }
        for cluster in &mut view.asteroids {
            self.cluster(cluster);
        }
        for ship in &mut view.ships {
            self.ship(ship);
        }
        for ordnance in &mut view.ordnance {
            self.ordnance(ordnance);
        }

        view
    }

    fn installation(&self, owner: &PlayerId, cargo: &mut CargoHold, fuel: &mut FuelTank) {
        if self.viewer.owns(owner) {
            return;
        }
        *cargo = CargoHold::empty(cargo.capacity);
        *fuel = FuelTank::empty(fuel.capacity);
    }

    fn ship(&self, ship: &mut Ship) {
        if self.viewer.owns(&ship.owner) {
            return;
        }
        ship.cargo = CargoHold::empty(ship.cargo.capacity);
        ship.fuel = FuelTank::empty(ship.fuel.capacity);
        ship.overloaded = false;
    }

    fn ordnance(&self, ordnance: &mut Ordnance) {
        if !self.viewer.owns(&ordnance.owner) {
            ordnance.ttl = 0;
        }
    }

    fn cluster(&self, cluster: &mut AsteroidCluster) {
        if let Some(outpost) = &mut cluster.outpost {
            self.installation(&outpost.owner, &mut outpost.cargo, &mut outpost.fuel);
        }

        let Viewer::Player(viewer) = self.viewer else {
            return;
        };
        let (resource, prospected) = if cluster.is_prospected_by(viewer) {
            (cluster.resource(), vec![viewer.clone()])
        } else {
            (ResourceKind::Unknown, Vec::new())
        };

        *cluster = AsteroidCluster::new(
            cluster.id.clone(),
            cluster.position,
            resource,
            prospected,
            cluster.outpost.take(),
        );
    }
}

/// Encode `game` as `viewer` is allowed to see it.
pub fn view(game: &Game, viewer: &Viewer) -> Value {
    Redactor::new(viewer).redact(game).encode()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EntityId, HexVector};
    use crate::game::{Base, BodyKind, Capacity, CelestialBody, OrdnanceKind, Outpost};
    use proptest::prelude::*;

    const SEATS: usize = 3;

    fn seat(i: usize) -> PlayerId {
        PlayerId::new(format!("{}", 1000 + i))
    }

    fn hold(capacity: Capacity, n: u32) -> CargoHold {
        CargoHold {
            money: n,
            mines: n,
            torpedoes: n,
            nukes: n,
            outposts: n,
            ore: n,
            bases: n,
            ..CargoHold::empty(capacity)
        }
    }

    fn ship(owner: usize, cargo: u32, fuel: u32, overloaded: bool) -> Ship {
        let mut ship = Ship::new(
            seat(owner),
            "ship",
            EntityId::generate(),
            "frigate",
            true,
            HexVector::new(owner as i32, 0),
            HexVector::new(0, 1),
            4,
            false,
            hold(Capacity::Finite(cargo.max(1) * 7), cargo),
            FuelTank::new(Capacity::Finite(fuel.max(1)), fuel),
        );
        ship.overloaded = overloaded;
        ship.weapon_health = 2;
        ship
    }

    fn sample_game() -> Game {
        let ids = (0..SEATS).map(seat).collect();
        let mut terra = CelestialBody::landable(
            "Terra",
            EntityId::new("t"),
            HexVector::new(13, -6),
            0.6,
            "#0000ff",
        );
        if let BodyKind::Landable { orbital_bases, surface_bases } = &mut terra.kind {
            for i in 0..SEATS {
                let mut base = Base::new(seat(i), "capital", EntityId::generate(), terra.position);
                base.cargo.money = 25;
                base.fuel.fuel = 9;
                surface_bases[i] = Some(base);
            }
            let mut orbital = Base::new(seat(1), "high", EntityId::generate(), terra.position);
            orbital.cargo.nukes = 2;
            orbital_bases[3] = Some(orbital);
        }

        let camp = HexVector::new(21, 0);
        let mut outpost = Outpost::new(seat(2), "camp", EntityId::generate(), camp);
        outpost.cargo.ore = 4;
        let clusters = vec![
            AsteroidCluster::new(
                EntityId::new("a"),
                camp,
                ResourceKind::Ore,
                vec![seat(0), seat(2)],
                Some(outpost),
            ),
            AsteroidCluster::new(
                EntityId::new("b"),
                HexVector::new(22, 0),
                ResourceKind::Ice,
                vec![seat(1)],
                None,
            ),
        ];

        let launch = |owner, velocity, kind| {
            Ordnance::launch(seat(owner), EntityId::generate(), HexVector::ZERO, velocity, kind)
        };
        let ordnance = vec![
            launch(0, HexVector::new(1, 0), OrdnanceKind::Mine),
            launch(1, HexVector::new(0, 1), OrdnanceKind::Nuke),
        ];

        Game::new(
            SEATS,
            vec!["a".into(), "b".into(), "c".into()],
            ids,
            vec![terra],
            clusters,
            vec![ship(0, 3, 5, true), ship(1, 2, 8, false)],
            ordnance,
        )
        .unwrap()
    }

    #[test]
    fn test_omniscient_view_is_canonical() {
        let game = sample_game();
        assert_eq!(Redactor::new(&Viewer::Omniscient).redact(&game), game);
        assert_eq!(view(&game, &Viewer::Omniscient), game.encode());
    }

    #[test]
    fn test_foreign_bases_hide_contents_keep_capacity() {
        let game = sample_game();
        let redacted = Redactor::new(&Viewer::Player(seat(0))).redact(&game);

        for base in redacted.celestials[0].bases() {
            if base.owner == seat(0) {
                assert_eq!(base.cargo.money, 25);
                assert_eq!(base.fuel.fuel, 9);
            } else {
                assert!(base.cargo.is_empty());
                assert_eq!(base.cargo.capacity, Capacity::Unbounded);
                assert_eq!(base.fuel, FuelTank::empty(Capacity::Unbounded));
            }
        }

        let outpost = redacted.asteroids[0].outpost.as_ref().unwrap();
        assert_eq!(outpost.cargo.ore, 0);
    }

    #[test]
    fn test_ship_public_fields_survive() {
        let game = sample_game();
        let redacted = Redactor::new(&Viewer::Player(seat(0))).redact(&game);

        let own = &redacted.ships[0];
        assert_eq!(own, &game.ships[0]);

        let foreign = &redacted.ships[1];
        assert!(foreign.cargo.is_empty());
        assert_eq!(foreign.cargo.capacity, game.ships[1].cargo.capacity);
        assert_eq!(foreign.fuel.fuel, 0);
        assert!(!foreign.overloaded);
        assert_eq!(foreign.weapon_health, 2);
        assert_eq!(foreign.position, game.ships[1].position);
        assert_eq!(foreign.velocity, game.ships[1].velocity);
    }

    #[test]
    fn test_ordnance_ttl() {
        let game = sample_game();
        let redacted = Redactor::new(&Viewer::Player(seat(0))).redact(&game);
        assert_eq!(redacted.ordnance[0].ttl, Ordnance::DEFAULT_TTL);
        assert_eq!(redacted.ordnance[1].ttl, 0);
        assert_eq!(redacted.ordnance[1].kind, OrdnanceKind::Nuke);
    }

    #[test]
    fn test_prospecting_visibility() {
        let game = sample_game();

        let for_zero = Redactor::new(&Viewer::Player(seat(0))).redact(&game);
        assert_eq!(for_zero.asteroids[0].resource(), ResourceKind::Ore);
        assert_eq!(for_zero.asteroids[0].prospected, vec![seat(0)]);
        assert_eq!(for_zero.asteroids[1].resource(), ResourceKind::Unknown);
        assert!(for_zero.asteroids[1].prospected.is_empty());

        let for_one = view(&game, &Viewer::Player(seat(1)));
        assert_eq!(for_one["asteroids"][0]["resource"], 0);
        assert_eq!(for_one["asteroids"][1]["resource"], 2);
        assert_eq!(for_one["asteroids"][1]["prospected"], serde_json::json!([seat(1).as_str()]));
    }

    #[test]
    fn test_canonical_state_untouched() {
        let game = sample_game();
        let before = game.clone();
        let _ = view(&game, &Viewer::Player(seat(2)));
        assert_eq!(game, before);
    }

    // =========================================================================
    // PROPERTIES
    // =========================================================================

    prop_compose! {
        fn arb_ship()(
            owner in 0..SEATS,
            cargo in 0u32..20,
            fuel in 0u32..20,
            overloaded in any::<bool>(),
        ) -> Ship {
            ship(owner, cargo, fuel, overloaded)
        }
    }

    prop_compose! {
        fn arb_ordnance()(owner in 0..SEATS, ttl in 0u32..=5) -> Ordnance {
            let mut o = Ordnance::launch(
                seat(owner),
                EntityId::generate(),
                HexVector::ZERO,
                HexVector::ZERO,
                OrdnanceKind::Torpedo,
            );
            o.ttl = ttl;
            o
        }
    }

    prop_compose! {
        fn arb_cluster()(
            tag in 1u64..=3,
            mask in 0u8..8,
            owner in proptest::option::of(0..SEATS),
        ) -> AsteroidCluster {
            let prospected = (0..SEATS).filter(|i| mask & (1 << i) != 0).map(seat).collect();
            let outpost = owner.map(|i| {
                let mut o = Outpost::new(
                    seat(i),
                    "camp",
                    EntityId::generate(),
                    HexVector::new(20, 0),
                );
                o.fuel.fuel = 3;
                o
            });
            let resource = ResourceKind::from_tag(tag).unwrap();
            AsteroidCluster::new(
                EntityId::generate(),
                HexVector::new(20, 0),
                resource,
                prospected,
                outpost,
            )
        }
    }

    prop_compose! {
        fn arb_game()(
            ships in proptest::collection::vec(arb_ship(), 0..6),
            ordnance in proptest::collection::vec(arb_ordnance(), 0..6),
            asteroids in proptest::collection::vec(arb_cluster(), 0..6),
        ) -> Game {
            let mut game = sample_game();
            game.ships = ships;
            game.ordnance = ordnance;
            game.asteroids = asteroids;
            game
        }
    }

    proptest! {
        #[test]
        fn prop_redaction_idempotent(game in arb_game(), who in 0..SEATS) {
            let viewer = Viewer::Player(seat(who));
            let redactor = Redactor::new(&viewer);
            let once = redactor.redact(&game);
            prop_assert_eq!(redactor.redact(&once), once);
        }

        #[test]
        fn prop_redaction_hides_foreign_state(game in arb_game(), who in 0..SEATS) {
            let me = seat(who);
            let viewer = Viewer::Player(me.clone());
            let redacted = Redactor::new(&viewer).redact(&game);

            for ship in redacted.ships.iter().filter(|s| s.owner != me) {
                prop_assert!(ship.cargo.is_empty());
                prop_assert_eq!(ship.fuel.fuel, 0);
                prop_assert!(!ship.overloaded);
            }
            for ordnance in redacted.ordnance.iter().filter(|o| o.owner != me) {
                prop_assert_eq!(ordnance.ttl, 0);
            }
            for (cluster, original) in redacted.asteroids.iter().zip(&game.asteroids) {
                prop_assert!(cluster.prospected.iter().all(|p| *p == me));
                if original.is_prospected_by(&me) {
                    prop_assert_eq!(cluster.resource(), original.resource());
                } else {
                    prop_assert_eq!(cluster.resource(), ResourceKind::Unknown);
                }
                if let Some(outpost) = cluster.outpost.as_ref().filter(|o| o.owner != me) {
                    prop_assert_eq!(outpost.fuel.fuel, 0);
                }
            }
        }
    }
}
