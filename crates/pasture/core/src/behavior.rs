//! Per-tick decision loop.
//!
//! [`think`] picks a goal when the agent has none, runs the goal's steering
//! routine and then layers wall and collision avoidance on top. It never
//! moves the agent; integration happens in [`Agent::advance`].

use std::sync::Arc;

use glam::Vec2;
use rand::Rng;
use steering::{Neighbor, follow_gradient, pursue};

use crate::agent::{Agent, AgentEvent, DecisionState, Thought};
use crate::env::{Env, Tag};
use crate::goal::{GoalKind, GoalSelector};
use crate::grid::Cell;
use crate::smell::SmellKind;
use crate::species::SpeciesConfig;

pub(crate) fn think<R: Rng + ?Sized>(agent: &mut Agent, env: &Env<'_>, rng: &mut R) -> Thought {
    let species = Arc::clone(agent.species_arc());
    let mut thought = Thought::default();
    let cell = agent.cell(env.cell_size());

    let (main, sought) = match agent.formation {
        Some(slot) => (species.arrive().steer(&agent.kinematic, slot.point), None),
        None => {
            if agent.decision.is_deciding() {
                select_goal(agent, &species, &mut thought);
            }
            match agent.decision.goal {
                Some(index) => {
                    let sought = species
                        .actions
                        .get(index)
                        .and_then(|action| action.goal.sought_surface());
                    let main = run_goal(agent, &species, index, cell, env, rng, &mut thought);
                    (main, sought)
                }
                None => (Vec2::ZERO, None),
            }
        }
    };

    let avoid: Vec<Tag> = species
        .avoid_surfaces
        .iter()
        .copied()
        .filter(|tag| Some(*tag) != sought)
        .collect();
    let walls = species
        .walls
        .steer(&agent.kinematic, env.physics, &avoid, species.limits.max_accel);
    let collisions = avoid_collisions(agent, &species, env);

    thought.linear = species.weights.blend(main, walls, collisions);

    let facing = if thought.stop_rotation {
        agent.kinematic.with_rotation(0.0)
    } else {
        agent.kinematic
    };
    thought.angular = species.align().steer(&facing);

    thought
}

fn select_goal(agent: &mut Agent, species: &SpeciesConfig, thought: &mut Thought) {
    let Some(index) = GoalSelector::select(&species.actions, &agent.insistance) else {
        return;
    };
    let Some(action) = species.actions.get(index) else {
        return;
    };

    agent.decision = DecisionState {
        goal: Some(index),
        ..DecisionState::default()
    };
    thought.events.push(AgentEvent::GoalSelected {
        agent: agent.id(),
        action: action.name.clone(),
        cost: action.projected_cost(&agent.insistance),
    });
}

fn run_goal<R: Rng + ?Sized>(
    agent: &mut Agent,
    species: &SpeciesConfig,
    index: usize,
    cell: Cell,
    env: &Env<'_>,
    rng: &mut R,
    thought: &mut Thought,
) -> Vec2 {
    let Some(action) = species.actions.get(index) else {
        tracing::warn!(agent = %agent.id(), index, "goal index out of range; deciding again");
        agent.decision.clear();
        return Vec2::ZERO;
    };
    let max_accel = species.limits.max_accel;

    match action.goal {
        GoalKind::SeekFood { marker, smell } => {
            if agent.decision.target.is_none() {
                agent.decision.target = env.terrain.find_food(cell, species.sight_radius, marker);
            }
            let steering = approach_or_sniff(agent, species, smell, cell, env);
            if agent.decision.target == Some(cell) {
                complete(agent, species, index, thought);
            }
            steering
        }
        GoalKind::SeekTerrain { terrain, smell } => {
            if agent.decision.target.is_none() {
                agent.decision.target = env.terrain.find_terrain(cell, species.sight_radius, terrain);
            }
            let steering = approach_or_sniff(agent, species, smell, cell, env);
            let standing_on = env.terrain.terrain(cell) == Some(terrain);
            if standing_on || agent.decision.target == Some(cell) {
                complete(agent, species, index, thought);
            }
            steering
        }
        GoalKind::Sleep { duration_secs } => {
            thought.stop_rotation = true;
            match agent.decision.started_at {
                None => {
                    agent.decision.started_at = Some(env.clock);
                    thought.events.push(AgentEvent::Resting {
                        agent: agent.id(),
                        resting: true,
                    });
                }
                Some(start) if env.clock - start >= duration_secs => {
                    complete(agent, species, index, thought);
                    thought.events.push(AgentEvent::Resting {
                        agent: agent.id(),
                        resting: false,
                    });
                }
                Some(_) => {}
            }
            -agent.kinematic.velocity
        }
        GoalKind::Wander { duration_secs } => {
            let start = *agent.decision.started_at.get_or_insert(env.clock);
            let kinematic = agent.kinematic;
            let steering = agent.wanderer.steer(&kinematic, max_accel, rng);
            if env.clock - start >= duration_secs {
                complete(agent, species, index, thought);
            }
            steering
        }
        GoalKind::Hunt { prey, smell } => {
            let position = agent.position();
            let bodies = env
                .physics
                .nearby_bodies(position, species.perception_radius, &[prey]);
            let visible: Vec<_> = bodies
                .into_iter()
                .filter(|body| body.id != agent.id())
                .collect();

            if let Some(body) = visible
                .iter()
                .find(|body| position.distance(body.position) < species.capture_radius)
            {
                tracing::debug!(hunter = %agent.id(), prey = %body.id, "prey within reach");
                thought.capture = Some(body.id);
                thought.events.push(AgentEvent::Captured {
                    hunter: agent.id(),
                    prey: body.id,
                });
                complete(agent, species, index, thought);
                return Vec2::ZERO;
            }

            let nearest = visible.iter().min_by(|a, b| {
                position
                    .distance_squared(a.position)
                    .total_cmp(&position.distance_squared(b.position))
            });
            match nearest {
                Some(body) => pursue(&agent.kinematic, body.position, body.velocity, max_accel),
                None => sniff(species, smell, cell, env) * max_accel,
            }
        }
    }
}

/// Arrives at the remembered target, or follows the scent when nothing has
/// been seen yet.
fn approach_or_sniff(
    agent: &Agent,
    species: &SpeciesConfig,
    smell: SmellKind,
    cell: Cell,
    env: &Env<'_>,
) -> Vec2 {
    match agent.decision.target {
        Some(target) => species
            .arrive()
            .steer(&agent.kinematic, target.to_world(env.cell_size())),
        None => sniff(species, smell, cell, env) * species.limits.max_accel,
    }
}

fn sniff(species: &SpeciesConfig, smell: SmellKind, cell: Cell, env: &Env<'_>) -> Vec2 {
    follow_gradient(cell.as_ivec2(), species.smell_radius, |sample| {
        env.smell.intensity(Cell::from(sample), smell)
    })
}

fn avoid_collisions(agent: &Agent, species: &SpeciesConfig, env: &Env<'_>) -> Vec2 {
    if species.collision_tags.is_empty() {
        return Vec2::ZERO;
    }
    let neighbors: Vec<Neighbor> = env
        .physics
        .nearby_bodies(
            agent.position(),
            species.collisions.radius,
            &species.collision_tags,
        )
        .iter()
        .filter(|body| body.id != agent.id())
        .map(|body| body.as_neighbor())
        .collect();

    species
        .collisions
        .steer(&agent.kinematic, &neighbors, species.limits.max_accel)
}

/// Applies the goal's effects and returns the agent to deciding.
fn complete(agent: &mut Agent, species: &SpeciesConfig, index: usize, thought: &mut Thought) {
    if let Some(action) = species.actions.get(index) {
        agent.insistance.apply(action);
        tracing::debug!(agent = %agent.id(), action = %action.name, "goal completed");
        thought.events.push(AgentEvent::GoalCompleted {
            agent: agent.id(),
            action: action.name.clone(),
        });
    }
    agent.decision.clear();
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::agent::AgentId;
    use crate::env::EmptyPhysics;
    use crate::goal::Action;
    use crate::grid::GridDimensions;
    use crate::needs::{Insistance, NeedKind};
    use crate::smell::SmellField;
    use crate::terrain::TerrainMap;

    fn world() -> (TerrainMap, SmellField) {
        let dims = GridDimensions::square(10);
        (TerrainMap::open(dims, 1.0).unwrap(), SmellField::new(dims))
    }

    fn species_with(actions: Vec<Action>) -> Arc<SpeciesConfig> {
        let mut species = SpeciesConfig::new("test", Tag::Sheep);
        species.actions = actions;
        Arc::new(species)
    }

    fn agent(species: Arc<SpeciesConfig>, joy: f32) -> Agent {
        let needs = Insistance::new(
            BTreeMap::from([(NeedKind::Joy, joy)]),
            BTreeMap::from([(NeedKind::Joy, 0.0)]),
        );
        let mut rng = StdRng::seed_from_u64(5);
        Agent::with_insistance(AgentId(1), species, Vec2::new(4.0, 4.0), needs, &mut rng)
    }

    #[test]
    fn no_actions_keeps_deciding_with_zero_steering() {
        let (terrain, smell) = world();
        let env = Env::new(&terrain, &smell, &EmptyPhysics, 0.0, 0.1);
        let mut agent = agent(species_with(Vec::new()), 1.0);

        let thought = think(&mut agent, &env, &mut StdRng::seed_from_u64(1));

        assert!(agent.decision().is_deciding());
        assert_eq!(thought.linear, Vec2::ZERO);
        assert!(thought.events.is_empty());
    }

    #[test]
    fn sleep_brakes_and_completes_after_duration() {
        let (terrain, smell) = world();
        let nap = Action::new(
            "Sleep",
            GoalKind::Sleep { duration_secs: 10.0 },
            BTreeMap::from([(NeedKind::Joy, -2.0)]),
            15.0,
        );
        let mut agent = agent(species_with(vec![nap]), 3.0);
        agent.kinematic_mut().velocity = Vec2::new(0.5, 0.0);
        let mut rng = StdRng::seed_from_u64(1);

        let env = Env::new(&terrain, &smell, &EmptyPhysics, 1.0, 0.1);
        let first = think(&mut agent, &env, &mut rng);
        assert!(first.stop_rotation);
        assert!(first.events.contains(&AgentEvent::Resting {
            agent: AgentId(1),
            resting: true
        }));
        assert_eq!(agent.decision().started_at, Some(1.0));

        let env = Env::new(&terrain, &smell, &EmptyPhysics, 11.0, 0.1);
        let last = think(&mut agent, &env, &mut rng);
        assert!(last.events.contains(&AgentEvent::Resting {
            agent: AgentId(1),
            resting: false
        }));
        assert!(agent.decision().is_deciding());
        assert_eq!(agent.insistance().value(NeedKind::Joy), Some(1.0));
    }

    #[test]
    fn wander_completes_regardless_of_position() {
        let (terrain, smell) = world();
        let stroll = Action::new(
            "Wander",
            GoalKind::Wander { duration_secs: 10.0 },
            BTreeMap::from([(NeedKind::Joy, -5.0)]),
            15.0,
        );
        let mut agent = agent(species_with(vec![stroll]), 6.0);
        let mut rng = StdRng::seed_from_u64(1);

        let env = Env::new(&terrain, &smell, &EmptyPhysics, 0.0, 0.1);
        let thought = think(&mut agent, &env, &mut rng);
        assert_ne!(thought.linear, Vec2::ZERO);
        assert_eq!(agent.decision().goal, Some(0));

        let env = Env::new(&terrain, &smell, &EmptyPhysics, 10.0, 0.1);
        let thought = think(&mut agent, &env, &mut rng);
        assert!(thought.events.iter().any(|e| matches!(e, AgentEvent::GoalCompleted { .. })));
        assert_eq!(agent.insistance().value(NeedKind::Joy), Some(1.0));
    }

    #[test]
    fn formation_members_arrive_at_their_slot() {
        let (terrain, smell) = world();
        let env = Env::new(&terrain, &smell, &EmptyPhysics, 0.0, 0.1);
        let mut agent = agent(species_with(Vec::new()), 1.0);
        agent.join_formation(AgentId(0), Vec2::new(-1.0, 1.0), Vec2::new(8.0, 4.0));

        let thought = think(&mut agent, &env, &mut StdRng::seed_from_u64(1));

        // Slot at (7, 5): pulled toward +x and +y.
        assert!(thought.linear.x > 0.0 && thought.linear.y > 0.0);
        assert!(agent.decision().is_deciding());
    }
}
