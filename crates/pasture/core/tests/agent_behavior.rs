use std::collections::BTreeMap;
use std::sync::Arc;

use glam::Vec2;
use pasture_core::{
    Action, Agent, AgentEvent, AgentId, BodySnapshot, Cell, EmptyPhysics, Env, Falloff,
    FoodMarker, GoalKind, Grid, GridDimensions, Insistance, NeedKind, Physics, SmellField,
    SmellKind, SpeciesConfig, Tag, TerrainKind, TerrainMap, TerrainSet, propagate,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use steering::{RayCaster, RayHit};

/// Physics double: a fixed set of bodies and, optionally, a wall one unit
/// ahead of every ray origin.
#[derive(Default)]
struct Scene {
    bodies: Vec<BodySnapshot>,
    wall: Option<Tag>,
}

impl RayCaster<Tag> for Scene {
    fn cast_ray(&self, origin: Vec2, _direction: Vec2, _max_distance: f32) -> Option<RayHit<Tag>> {
        self.wall.map(|tag| RayHit {
            point: origin + Vec2::X,
            normal: -Vec2::X,
            tag,
        })
    }
}

impl Physics for Scene {
    fn nearby_bodies(&self, origin: Vec2, radius: f32, tags: &[Tag]) -> Vec<BodySnapshot> {
        self.bodies
            .iter()
            .filter(|body| tags.contains(&body.tag) && body.position.distance(origin) <= radius)
            .copied()
            .collect()
    }
}

fn open_board() -> TerrainMap {
    TerrainMap::open(GridDimensions::square(10), 1.0).expect("valid board")
}

fn eat_bush() -> Action {
    Action::new(
        "Eat Bush",
        GoalKind::SeekFood {
            marker: FoodMarker::Bush,
            smell: SmellKind::GroundFood,
        },
        BTreeMap::from([(NeedKind::Food, -5.0)]),
        15.0,
    )
}

fn seek_water() -> Action {
    Action::new(
        "Seek Water",
        GoalKind::SeekTerrain {
            terrain: TerrainKind::Water,
            smell: SmellKind::Water,
        },
        BTreeMap::from([(NeedKind::Water, -5.0)]),
        15.0,
    )
}

fn sheep(actions: Vec<Action>) -> Arc<SpeciesConfig> {
    let mut species = SpeciesConfig::new("sheep", Tag::Sheep);
    species.growth = BTreeMap::from([(NeedKind::Food, 0.1), (NeedKind::Water, 0.1)]);
    species.actions = actions;
    Arc::new(species)
}

fn agent_at(species: Arc<SpeciesConfig>, position: Vec2, food: f32, water: f32) -> Agent {
    let needs = Insistance::new(
        BTreeMap::from([(NeedKind::Food, food), (NeedKind::Water, water)]),
        species.growth.clone(),
    );
    Agent::with_insistance(
        AgentId(1),
        species,
        position,
        needs,
        &mut StdRng::seed_from_u64(11),
    )
}

fn completed(events: &[AgentEvent]) -> bool {
    events
        .iter()
        .any(|event| matches!(event, AgentEvent::GoalCompleted { .. }))
}

/// A hungry sheep prefers eating over an action that changes nothing.
#[test]
fn hungry_agent_selects_food_over_idle_action() {
    let idle = Action::new(
        "Idle",
        GoalKind::Wander { duration_secs: 10.0 },
        BTreeMap::new(),
        15.0,
    );
    let board = open_board();
    let smell = SmellField::new(board.dimensions());
    let env = Env::new(&board, &smell, &EmptyPhysics, 0.0, 0.1);
    let mut agent = agent_at(sheep(vec![idle, eat_bush()]), Vec2::new(4.0, 4.0), 10.0, 0.0);

    let thought = agent.think(&env, &mut StdRng::seed_from_u64(1));

    assert_eq!(agent.decision().goal, Some(1));
    assert_eq!(agent.goal().map(|a| a.name.as_str()), Some("Eat Bush"));
    assert!(thought.events.iter().any(|event| matches!(
        event,
        AgentEvent::GoalSelected { action, .. } if action == "Eat Bush"
    )));
}

/// Standing on the remembered target completes the goal in the same tick.
#[test]
fn standing_on_remembered_target_completes_seek_water() {
    let board = open_board();
    let smell = SmellField::new(board.dimensions());
    let env = Env::new(&board, &smell, &EmptyPhysics, 0.0, 0.1);
    let mut agent = agent_at(sheep(vec![seek_water()]), Vec2::new(3.0, 3.0), 0.0, 8.0);
    agent.set_goal(0);
    agent.set_target(Some(Cell::new(3, 3)));

    let thought = agent.think(&env, &mut StdRng::seed_from_u64(1));

    assert!(completed(&thought.events));
    assert!(agent.decision().is_deciding());
    assert_eq!(agent.decision().target, None);
    assert_eq!(agent.insistance().value(NeedKind::Water), Some(3.0));
}

/// Any water cell completes a water goal, target or not.
#[test]
fn stepping_into_water_completes_without_a_target() {
    let dims = GridDimensions::square(10);
    let mut terrain = Grid::filled(dims, TerrainKind::Low);
    terrain
        .set(Cell::new(4, 4), TerrainKind::Water)
        .expect("cell in bounds");
    let board = TerrainMap::new(terrain, Grid::filled(dims, FoodMarker::None), 1.0)
        .expect("valid board");
    let smell = SmellField::new(dims);
    let env = Env::new(&board, &smell, &EmptyPhysics, 0.0, 0.1);

    let mut agent = agent_at(sheep(vec![seek_water()]), Vec2::new(4.2, 3.9), 0.0, 8.0);
    agent.set_goal(0);

    let thought = agent.think(&env, &mut StdRng::seed_from_u64(1));

    assert!(completed(&thought.events));
    assert_eq!(agent.insistance().value(NeedKind::Water), Some(3.0));
}

/// A bush within sight is remembered and approached.
#[test]
fn visible_food_becomes_the_target() {
    let dims = GridDimensions::square(10);
    let mut food = Grid::filled(dims, FoodMarker::None);
    food.set(Cell::new(6, 4), FoodMarker::Bush)
        .expect("cell in bounds");
    let board = TerrainMap::new(Grid::filled(dims, TerrainKind::Low), food, 1.0)
        .expect("valid board");
    let smell = SmellField::new(dims);
    let env = Env::new(&board, &smell, &EmptyPhysics, 0.0, 0.1);

    let mut agent = agent_at(sheep(vec![eat_bush()]), Vec2::new(4.0, 4.0), 10.0, 0.0);
    let thought = agent.think(&env, &mut StdRng::seed_from_u64(1));

    assert_eq!(agent.decision().target, Some(Cell::new(6, 4)));
    assert!(thought.linear.x > 0.0);
    assert!(thought.linear.y.abs() < 1e-5);
    assert!(!completed(&thought.events));
}

/// With nothing in sight the agent climbs the scent gradient.
#[test]
fn unseen_food_is_found_by_smell() {
    let dims = GridDimensions::square(10);
    let mut food = Grid::filled(dims, FoodMarker::None);
    food.set(Cell::new(9, 4), FoodMarker::Bush)
        .expect("cell in bounds");
    let board = TerrainMap::new(Grid::filled(dims, TerrainKind::Low), food, 1.0)
        .expect("valid board");
    let mut smell = SmellField::new(dims);
    propagate(
        &mut smell,
        &board,
        &[Cell::new(9, 4)],
        SmellKind::GroundFood,
        Falloff::PathLength {
            impassable: TerrainSet::IMPASSABLE,
        },
    );
    let env = Env::new(&board, &smell, &EmptyPhysics, 0.0, 0.1);

    let mut agent = agent_at(sheep(vec![eat_bush()]), Vec2::new(2.0, 4.0), 10.0, 0.0);
    let thought = agent.think(&env, &mut StdRng::seed_from_u64(1));

    assert_eq!(agent.decision().target, None);
    assert!(thought.linear.x > 0.0);
}

/// Water walls are ignored while water is the destination.
#[test]
fn sought_surface_is_not_avoided() {
    let board = open_board();
    let smell = SmellField::new(board.dimensions());
    let scene = Scene {
        wall: Some(Tag::Water),
        ..Scene::default()
    };
    let env = Env::new(&board, &smell, &scene, 0.0, 0.1);

    let mut thirsty = agent_at(sheep(vec![seek_water()]), Vec2::new(4.0, 4.0), 0.0, 8.0);
    thirsty.set_goal(0);
    thirsty.set_target(Some(Cell::new(8, 4)));
    let thought = thirsty.think(&env, &mut StdRng::seed_from_u64(1));
    assert!((thought.linear - Vec2::new(1.0, 0.0)).length() < 1e-5);

    let mut hungry = agent_at(sheep(vec![eat_bush()]), Vec2::new(4.0, 4.0), 10.0, 0.0);
    hungry.set_goal(0);
    hungry.set_target(Some(Cell::new(8, 4)));
    let thought = hungry.think(&env, &mut StdRng::seed_from_u64(1));
    assert!(thought.linear.x < 0.0);
}

/// A body on a collision course pushes the agent aside.
#[test]
fn oncoming_neighbor_is_avoided() {
    let board = open_board();
    let smell = SmellField::new(board.dimensions());
    let scene = Scene {
        bodies: vec![BodySnapshot {
            id: AgentId(2),
            tag: Tag::Sheep,
            position: Vec2::new(6.0, 4.2),
            velocity: Vec2::new(-1.0, 0.0),
        }],
        wall: None,
    };
    let env = Env::new(&board, &smell, &scene, 0.0, 0.1);

    let mut species = SpeciesConfig::new("sheep", Tag::Sheep);
    species.collision_tags = vec![Tag::Sheep];
    let mut agent = agent_at(Arc::new(species), Vec2::new(4.0, 4.0), 0.0, 0.0);

    let thought = agent.think(&env, &mut StdRng::seed_from_u64(1));
    assert!(thought.linear.y < 0.0);
}

fn wolf() -> Arc<SpeciesConfig> {
    let mut species = SpeciesConfig::new("wolf", Tag::Wolf);
    species.growth = BTreeMap::from([(NeedKind::Food, 0.15)]);
    species.actions = vec![Action::new(
        "Hunt",
        GoalKind::Hunt {
            prey: Tag::Sheep,
            smell: SmellKind::MeatFood,
        },
        BTreeMap::from([(NeedKind::Food, -7.0)]),
        15.0,
    )];
    Arc::new(species)
}

fn hungry_wolf() -> Agent {
    let species = wolf();
    let needs = Insistance::new(
        BTreeMap::from([(NeedKind::Food, 10.0)]),
        species.growth.clone(),
    );
    Agent::with_insistance(
        AgentId(7),
        species,
        Vec2::new(4.0, 4.0),
        needs,
        &mut StdRng::seed_from_u64(3),
    )
}

/// Prey inside the capture radius is caught this tick.
#[test]
fn adjacent_prey_is_captured() {
    let board = open_board();
    let smell = SmellField::new(board.dimensions());
    let scene = Scene {
        bodies: vec![BodySnapshot {
            id: AgentId(9),
            tag: Tag::Sheep,
            position: Vec2::new(4.3, 4.0),
            velocity: Vec2::ZERO,
        }],
        wall: None,
    };
    let env = Env::new(&board, &smell, &scene, 0.0, 0.1);
    let mut wolf = hungry_wolf();

    let thought = wolf.think(&env, &mut StdRng::seed_from_u64(1));

    assert_eq!(thought.capture, Some(AgentId(9)));
    assert!(thought.events.contains(&AgentEvent::Captured {
        hunter: AgentId(7),
        prey: AgentId(9),
    }));
    assert_eq!(wolf.insistance().value(NeedKind::Food), Some(3.0));
    assert!(wolf.decision().is_deciding());
}

/// Distant prey is pursued toward its predicted position.
#[test]
fn distant_prey_is_pursued() {
    let board = open_board();
    let smell = SmellField::new(board.dimensions());
    let scene = Scene {
        bodies: vec![BodySnapshot {
            id: AgentId(9),
            tag: Tag::Sheep,
            position: Vec2::new(7.0, 4.0),
            velocity: Vec2::new(0.0, 1.0),
        }],
        wall: None,
    };
    let env = Env::new(&board, &smell, &scene, 0.0, 0.1);
    let mut wolf = hungry_wolf();

    let thought = wolf.think(&env, &mut StdRng::seed_from_u64(1));

    assert_eq!(thought.capture, None);
    assert!(thought.linear.x > 0.0 && thought.linear.y > 0.0);
    assert_eq!(wolf.decision().goal, Some(0));
}

fn sheep_body(id: u32, x: f32, y: f32) -> BodySnapshot {
    BodySnapshot {
        id: AgentId(id),
        tag: Tag::Sheep,
        position: Vec2::new(x, y),
        velocity: Vec2::ZERO,
    }
}

/// Reachable prey is caught even when a farther one is listed first.
#[test]
fn touching_prey_is_captured_ahead_of_earlier_listed_prey() {
    let board = open_board();
    let smell = SmellField::new(board.dimensions());
    let scene = Scene {
        bodies: vec![sheep_body(1, 9.0, 4.0), sheep_body(2, 4.2, 4.0)],
        wall: None,
    };
    let env = Env::new(&board, &smell, &scene, 0.0, 0.1);
    let mut wolf = hungry_wolf();

    let thought = wolf.think(&env, &mut StdRng::seed_from_u64(1));

    assert_eq!(thought.capture, Some(AgentId(2)));
    assert_eq!(thought.linear, Vec2::ZERO);
    assert!(thought.events.contains(&AgentEvent::Captured {
        hunter: AgentId(7),
        prey: AgentId(2),
    }));
}

/// With several prey in view the closest one is chased.
#[test]
fn nearest_visible_prey_is_pursued() {
    let board = open_board();
    let smell = SmellField::new(board.dimensions());
    let scene = Scene {
        bodies: vec![sheep_body(1, 8.0, 4.0), sheep_body(2, 4.0, 6.0)],
        wall: None,
    };
    let env = Env::new(&board, &smell, &scene, 0.0, 0.1);
    let mut wolf = hungry_wolf();

    let thought = wolf.think(&env, &mut StdRng::seed_from_u64(1));

    assert_eq!(thought.capture, None);
    assert!(thought.linear.y > 0.0);
    assert!(thought.linear.x.abs() < 1e-5);
}

/// No prey in sight: the wolf climbs the prey scent at full acceleration.
#[test]
fn unseen_prey_is_tracked_by_scent() {
    let board = open_board();
    let mut smell = SmellField::new(board.dimensions());
    propagate(
        &mut smell,
        &board,
        &[Cell::new(9, 4)],
        SmellKind::MeatFood,
        Falloff::PathLength {
            impassable: TerrainSet::IMPASSABLE,
        },
    );
    let scene = Scene::default();
    let env = Env::new(&board, &smell, &scene, 0.0, 0.1);
    let mut wolf = hungry_wolf();
    let max_accel = wolf.species().limits.max_accel;

    let thought = wolf.think(&env, &mut StdRng::seed_from_u64(1));

    assert_eq!(thought.capture, None);
    assert_eq!(wolf.decision().goal, Some(0));
    assert!((thought.linear.length() - max_accel).abs() < 1e-4);
    assert!(thought.linear.x > 0.0);
    assert!(thought.linear.y.abs() < 1e-4);
}
