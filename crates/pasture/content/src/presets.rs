//! Built-in species: sheep, wolves and the wolf-pack anchor.
//!
//! These mirror `data/species.ron` and are used whenever no species file is
//! supplied.

use std::collections::BTreeMap;

use glam::Vec2;
use pasture_core::{
    Action, FoodMarker, GoalKind, NeedKind, SmellKind, SpeciesConfig, Tag, TerrainKind,
};
use steering::{BlendWeights, MovementLimits};

pub const SHEEP: &str = "sheep";
pub const WOLF: &str = "wolf";
pub const WOLF_PACK: &str = "wolf-pack";

/// Expected duration used when projecting every built-in action.
const EST_DURATION_SECS: f32 = 15.0;
const SLEEP_SECS: f32 = 10.0;
const WANDER_SECS: f32 = 10.0;

fn effects(entries: &[(NeedKind, f32)]) -> BTreeMap<NeedKind, f32> {
    entries.iter().copied().collect()
}

fn seek_water() -> Action {
    Action::new(
        "Seek Water",
        GoalKind::SeekTerrain {
            terrain: TerrainKind::Water,
            smell: SmellKind::Water,
        },
        effects(&[(NeedKind::Water, -5.0)]),
        EST_DURATION_SECS,
    )
}

fn sleep(joy: f32) -> Action {
    Action::new(
        "Sleep",
        GoalKind::Sleep {
            duration_secs: SLEEP_SECS,
        },
        effects(&[(NeedKind::Sleep, -5.0), (NeedKind::Joy, joy)]),
        EST_DURATION_SECS,
    )
}

fn wander(sleep: f32) -> Action {
    Action::new(
        "Wander",
        GoalKind::Wander {
            duration_secs: WANDER_SECS,
        },
        effects(&[(NeedKind::Joy, -5.0), (NeedKind::Sleep, sleep)]),
        EST_DURATION_SECS,
    )
}

fn wolf_actions() -> Vec<Action> {
    vec![
        Action::new(
            "Hunt",
            GoalKind::Hunt {
                prey: Tag::Sheep,
                smell: SmellKind::MeatFood,
            },
            effects(&[(NeedKind::Food, -7.0), (NeedKind::Sleep, 2.0)]),
            EST_DURATION_SECS,
        ),
        seek_water(),
        sleep(2.0),
        wander(2.0),
    ]
}

pub fn sheep() -> SpeciesConfig {
    let mut species = SpeciesConfig::new(SHEEP, Tag::Sheep);
    species.limits = MovementLimits::new(2.0, 10.0, 179.0, 30.0);
    species.rotate_arrive_angle = 15.0;
    species.rotate_slow_angle = 45.0;
    species.collision_tags = vec![Tag::Sheep];
    species.growth = effects(&[
        (NeedKind::Food, 0.1),
        (NeedKind::Water, 0.1),
        (NeedKind::Sleep, 0.02),
        (NeedKind::Joy, 0.05),
    ]);
    species.actions = vec![
        Action::new(
            "Eat Bush",
            GoalKind::SeekFood {
                marker: FoodMarker::Bush,
                smell: SmellKind::GroundFood,
            },
            effects(&[(NeedKind::Food, -5.0)]),
            EST_DURATION_SECS,
        ),
        seek_water(),
        sleep(1.0),
        wander(1.0),
    ];
    species
}

pub fn wolf() -> SpeciesConfig {
    let mut species = SpeciesConfig::new(WOLF, Tag::Wolf);
    species.limits = MovementLimits::new(2.2, 1.0, 240.0, 30.0);
    species.rotate_arrive_angle = 5.0;
    species.rotate_slow_angle = 70.0;
    // Hunting wolves notice sheep anywhere on the board.
    species.perception_radius = 240.0;
    species.collision_tags = vec![Tag::Wolf];
    species.growth = effects(&[
        (NeedKind::Food, 0.15),
        (NeedKind::Water, 0.1),
        (NeedKind::Sleep, 0.05),
        (NeedKind::Joy, 0.2),
    ]);
    species.actions = wolf_actions();
    species
}

/// Invisible leader a pack of wolves holds formation around.
pub fn wolf_pack() -> SpeciesConfig {
    let mut species = wolf();
    species.name = WOLF_PACK.to_string();
    species.tag = Tag::WolfPack;
    species.weights = BlendWeights {
        main: 0.2,
        walls: 0.8,
        collisions: 0.0,
    };
    species.perception_radius = 5.0;
    species.collision_tags = Vec::new();
    species.formation = vec![
        Vec2::new(-1.0, 1.0),
        Vec2::new(-2.0, 2.0),
        Vec2::new(-1.0, -1.0),
        Vec2::new(-2.0, -2.0),
    ];
    species
}

/// Every built-in species, in registry order.
pub fn all() -> Vec<SpeciesConfig> {
    vec![sheep(), wolf(), wolf_pack()]
}
