//! Single-threaded owner of the world and every agent in it.
//!
//! A tick reads the world through one body snapshot: every agent thinks
//! against the same positions, then all of them move, then captured prey is
//! taken out. Nothing an agent does is visible to the others before the next
//! tick.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use glam::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use pasture_content::{SimConfig, World, WorldGenerator};
use pasture_core::{
    Agent, AgentId, BodySnapshot, Cell, Env, Falloff, GoalKind, Rediffusion, SmellField,
    SpeciesConfig, Tag, TerrainKind, TerrainMap, TerrainSet, Thought,
};

use crate::api::{Result, RuntimeError};
use crate::events::{Event, WorldEvent};
use crate::physics::GridPhysics;
use crate::view::{AgentView, PackView, StepReport, WorldSnapshot};

/// Scent laid by moving bodies, recomputed periodically from their cells.
#[derive(Debug)]
struct MobileScent {
    pass: Rediffusion,
    emitters: Vec<Tag>,
}

/// Builds one scent per smell that some species hunts by.
fn mobile_scents<'a>(species: impl IntoIterator<Item = &'a SpeciesConfig>) -> Vec<MobileScent> {
    let mut scents: Vec<MobileScent> = Vec::new();
    for config in species {
        for action in &config.actions {
            let GoalKind::Hunt { prey, smell } = action.goal else {
                continue;
            };
            match scents.iter_mut().find(|scent| scent.pass.kind() == smell) {
                Some(scent) => {
                    if !scent.emitters.contains(&prey) {
                        scent.emitters.push(prey);
                    }
                }
                None => scents.push(MobileScent {
                    pass: Rediffusion::new(
                        smell,
                        Falloff::PathLength {
                            impassable: TerrainSet::HIGH | TerrainSet::WATER,
                        },
                    ),
                    emitters: vec![prey],
                }),
            }
        }
    }
    scents
}

pub struct Simulation {
    terrain: TerrainMap,
    smell: SmellField,
    species: BTreeMap<String, Arc<SpeciesConfig>>,
    agents: Vec<Agent>,
    /// Anchor id to member ids.
    packs: BTreeMap<AgentId, Vec<AgentId>>,
    scents: Vec<MobileScent>,
    rediffusion_interval: f32,
    next_rediffusion_at: f32,
    rng: StdRng,
    clock: f32,
    tick: u64,
    next_id: u32,
    outbox: Vec<Event>,
}

impl Simulation {
    /// Creates an empty simulation over an already generated world.
    ///
    /// Every species is validated and registered under its name.
    pub fn new(
        world: World,
        species: Vec<SpeciesConfig>,
        seed: u64,
        rediffusion_interval_secs: f32,
    ) -> Result<Self> {
        if !(rediffusion_interval_secs.is_finite() && rediffusion_interval_secs > 0.0) {
            return Err(RuntimeError::InvalidRediffusionInterval(
                rediffusion_interval_secs,
            ));
        }

        let mut registry = BTreeMap::new();
        for config in species {
            config
                .validate()
                .map_err(|source| RuntimeError::InvalidSpecies {
                    name: config.name.clone(),
                    source,
                })?;
            if registry.contains_key(&config.name) {
                return Err(RuntimeError::DuplicateSpecies(config.name));
            }
            registry.insert(config.name.clone(), Arc::new(config));
        }

        let scents = mobile_scents(registry.values().map(|config| config.as_ref()));
        debug!(
            species = registry.len(),
            scents = scents.len(),
            "simulation created"
        );

        Ok(Self {
            terrain: world.terrain,
            smell: world.smell,
            species: registry,
            agents: Vec::new(),
            packs: BTreeMap::new(),
            scents,
            rediffusion_interval: rediffusion_interval_secs,
            next_rediffusion_at: 0.0,
            rng: StdRng::seed_from_u64(seed),
            clock: 0.0,
            tick: 0,
            next_id: 0,
            outbox: Vec::new(),
        })
    }

    /// Generates the world from `config`, then spawns its initial population
    /// on random walkable cells.
    pub fn from_config(config: &SimConfig, species: Vec<SpeciesConfig>) -> Result<Self> {
        let world = WorldGenerator::new(config.generator.clone(), config.seed).generate()?;
        let mut simulation = Self::new(
            world,
            species,
            config.seed,
            config.rediffusion_interval_secs,
        )?;

        for entry in &config.population {
            for _ in 0..entry.count {
                match &entry.members {
                    Some(members) => {
                        simulation.spawn_pack_anywhere(&entry.species, members)?;
                    }
                    None => {
                        simulation.spawn_anywhere(&entry.species)?;
                    }
                }
            }
        }

        info!(
            seed = config.seed,
            agents = simulation.agents.len(),
            packs = simulation.packs.len(),
            "simulation populated"
        );
        Ok(simulation)
    }

    pub fn terrain(&self) -> &TerrainMap {
        &self.terrain
    }

    pub fn smell(&self) -> &SmellField {
        &self.smell
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|agent| agent.id() == id)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|agent| agent.id() == id)
    }

    pub fn species(&self, name: &str) -> Option<&SpeciesConfig> {
        self.species.get(name).map(|config| config.as_ref())
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Events produced since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.outbox)
    }

    fn config(&self, name: &str) -> Result<Arc<SpeciesConfig>> {
        self.species
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownSpecies(name.to_string()))
    }

    fn allocate_id(&mut self) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;
        id
    }

    fn insert(&mut self, config: Arc<SpeciesConfig>, position: Vec2) -> AgentId {
        let id = self.allocate_id();
        let species = config.name.clone();
        self.agents
            .push(Agent::spawn(id, config, position, &mut self.rng));
        info!(agent = %id, %species, x = position.x, y = position.y, "agent spawned");
        self.outbox.push(Event::from(WorldEvent::Spawned {
            agent: id,
            species,
            position,
        }));
        id
    }

    /// Adds one agent of `species` at `position`.
    pub fn spawn(&mut self, species: &str, position: Vec2) -> Result<AgentId> {
        let config = self.config(species)?;
        Ok(self.insert(config, position))
    }

    /// Adds an anchor of `species` at `position` and one `member` per
    /// formation slot, each already standing on its slot.
    pub fn spawn_pack(&mut self, species: &str, member: &str, position: Vec2) -> Result<PackView> {
        let anchor_config = self.config(species)?;
        let member_config = self.config(member)?;
        if !anchor_config.is_formation_anchor() {
            return Err(RuntimeError::NotAFormationAnchor(species.to_string()));
        }

        let anchor = self.insert(Arc::clone(&anchor_config), position);
        let mut members = Vec::with_capacity(anchor_config.formation.len());
        for &offset in &anchor_config.formation {
            let id = self.insert(Arc::clone(&member_config), position + offset);
            if let Some(agent) = self.agent_mut(id) {
                agent.join_formation(anchor, offset, position);
            }
            members.push(id);
        }

        self.packs.insert(anchor, members.clone());
        Ok(PackView { anchor, members })
    }

    /// Spawns `species` on a random low or medium cell.
    pub fn spawn_anywhere(&mut self, species: &str) -> Result<AgentId> {
        let position = self.random_walkable(species)?;
        self.spawn(species, position)
    }

    /// Spawns a pack with its anchor on a random low or medium cell.
    pub fn spawn_pack_anywhere(&mut self, species: &str, member: &str) -> Result<PackView> {
        let position = self.random_walkable(species)?;
        self.spawn_pack(species, member, position)
    }

    fn random_walkable(&mut self, species: &str) -> Result<Vec2> {
        let walkable: Vec<Cell> = self
            .terrain
            .terrain_grid()
            .iter()
            .filter(|(_, kind)| matches!(kind, TerrainKind::Low | TerrainKind::Medium))
            .map(|(cell, _)| cell)
            .collect();
        walkable
            .choose(&mut self.rng)
            .map(|cell| cell.to_world(self.terrain.cell_size()))
            .ok_or_else(|| RuntimeError::NoSpawnRoom(species.to_string()))
    }

    /// Advances the world by `dt` seconds.
    pub fn step(&mut self, dt: f32) -> Result<StepReport> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(RuntimeError::InvalidTickLength(dt));
        }

        self.rediffuse();

        let bodies: Vec<BodySnapshot> = self
            .agents
            .iter()
            .map(|agent| BodySnapshot {
                id: agent.id(),
                tag: agent.species().tag,
                position: agent.position(),
                velocity: agent.kinematic().velocity,
            })
            .collect();
        let physics = GridPhysics::new(&self.terrain, &bodies);
        let env = Env::new(&self.terrain, &self.smell, &physics, self.clock, dt);

        let thoughts: Vec<Thought> = self
            .agents
            .iter_mut()
            .map(|agent| agent.think(&env, &mut self.rng))
            .collect();

        let mut captures = Vec::new();
        for (agent, thought) in self.agents.iter_mut().zip(&thoughts) {
            agent.advance(thought, dt);
            if let Some(prey) = thought.capture {
                captures.push((prey, agent.id()));
            }
        }
        self.outbox.extend(
            thoughts
                .into_iter()
                .flat_map(|thought| thought.events)
                .map(Event::from),
        );

        let removed = self.remove_captured(&captures);
        self.follow_anchors();

        self.clock += dt;
        self.tick += 1;
        self.outbox.push(Event::from(WorldEvent::TickCompleted {
            tick: self.tick,
            clock: self.clock,
            population: self.agents.len(),
        }));

        Ok(StepReport {
            tick: self.tick,
            clock: self.clock,
            population: self.agents.len(),
            captures: removed,
        })
    }

    /// Starts a pass for every mobile scent when the interval has elapsed,
    /// then diffuses one pending source per scent.
    ///
    /// A trigger that finds the previous pass still running is dropped; the
    /// next one comes a full interval later.
    fn rediffuse(&mut self) {
        let cell_size = self.terrain.cell_size();

        if self.clock >= self.next_rediffusion_at {
            self.next_rediffusion_at += self.rediffusion_interval;

            for scent in &mut self.scents {
                let sources: Vec<Cell> = self
                    .agents
                    .iter()
                    .filter(|agent| scent.emitters.contains(&agent.species().tag))
                    .map(|agent| agent.cell(cell_size))
                    .filter(|cell| self.terrain.contains(*cell))
                    .collect();
                let count = sources.len();
                if scent.pass.start(&mut self.smell, sources) {
                    self.outbox.push(Event::from(WorldEvent::RediffusionStarted {
                        kind: scent.pass.kind(),
                        sources: count,
                    }));
                }
            }
        }

        for scent in &mut self.scents {
            scent.pass.step(&mut self.smell, &self.terrain);
        }
    }

    /// Removes every captured body once. Returns how many were removed.
    fn remove_captured(&mut self, captures: &[(AgentId, AgentId)]) -> usize {
        let mut removed = BTreeSet::new();
        for &(prey, hunter) in captures {
            if !removed.insert(prey) {
                continue;
            }
            info!(%prey, %hunter, "prey captured");
            self.outbox.push(Event::from(WorldEvent::Removed {
                agent: prey,
                by: hunter,
            }));
        }
        if removed.is_empty() {
            return 0;
        }

        let before = self.agents.len();
        self.agents.retain(|agent| !removed.contains(&agent.id()));

        for members in self.packs.values_mut() {
            members.retain(|member| !removed.contains(member));
        }
        let orphaned: Vec<AgentId> = self
            .packs
            .keys()
            .copied()
            .filter(|anchor| removed.contains(anchor))
            .collect();
        for anchor in orphaned {
            let members = self.packs.remove(&anchor).unwrap_or_default();
            for &member in &members {
                if let Some(agent) = self.agent_mut(member) {
                    agent.leave_formation();
                }
            }
            info!(%anchor, members = members.len(), "pack dissolved");
            self.outbox
                .push(Event::from(WorldEvent::PackDissolved { anchor, members }));
        }

        before - self.agents.len()
    }

    fn follow_anchors(&mut self) {
        let anchors: HashMap<AgentId, Vec2> = self
            .packs
            .keys()
            .filter_map(|&anchor| self.agent(anchor).map(|agent| (anchor, agent.position())))
            .collect();

        for agent in &mut self.agents {
            let Some(anchor) = agent.formation().map(|slot| slot.anchor) else {
                continue;
            };
            if let Some(&position) = anchors.get(&anchor) {
                agent.follow_anchor(position);
            }
        }
    }

    pub fn inspect(&self, id: AgentId) -> Option<AgentView> {
        self.agent(id).map(AgentView::from)
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick,
            clock: self.clock,
            dimensions: self.terrain.dimensions(),
            cell_size: self.terrain.cell_size(),
            agents: self.agents.iter().map(AgentView::from).collect(),
            packs: self
                .packs
                .iter()
                .map(|(&anchor, members)| PackView {
                    anchor,
                    members: members.clone(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pasture_content::{bake_smells, presets};
    use pasture_core::{GridDimensions, SmellKind};

    use super::*;

    fn open_world(size: u32) -> World {
        let terrain = TerrainMap::open(GridDimensions::square(size), 1.0).unwrap();
        let smell = bake_smells(&terrain);
        World { terrain, smell }
    }

    fn simulation() -> Simulation {
        Simulation::new(open_world(20), presets::all(), 7, 3.0).unwrap()
    }

    #[test]
    fn hunted_smells_become_mobile_scents() {
        let scents = mobile_scents(&presets::all());
        assert_eq!(scents.len(), 1);
        assert_eq!(scents[0].pass.kind(), SmellKind::MeatFood);
        assert_eq!(scents[0].emitters, vec![Tag::Sheep]);
    }

    #[test]
    fn unknown_species_is_rejected() {
        let mut sim = simulation();
        let err = sim.spawn("goat", Vec2::ZERO).unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownSpecies(name) if name == "goat"));
    }

    #[test]
    fn duplicate_species_are_rejected() {
        let err = Simulation::new(
            open_world(4),
            vec![presets::sheep(), presets::sheep()],
            0,
            3.0,
        )
        .err()
        .unwrap();
        assert!(matches!(err, RuntimeError::DuplicateSpecies(_)));
    }

    #[test]
    fn only_anchors_lead_packs() {
        let mut sim = simulation();
        let err = sim
            .spawn_pack(presets::SHEEP, presets::WOLF, Vec2::ZERO)
            .unwrap_err();
        assert!(matches!(err, RuntimeError::NotAFormationAnchor(_)));
    }

    #[test]
    fn pack_members_stand_on_their_slots() {
        let mut sim = simulation();
        let position = Vec2::new(10.0, 10.0);
        let pack = sim
            .spawn_pack(presets::WOLF_PACK, presets::WOLF, position)
            .unwrap();

        assert_eq!(pack.members.len(), 4);
        for (member, offset) in pack.members.iter().zip(&presets::wolf_pack().formation) {
            let agent = sim.agent(*member).unwrap();
            assert_eq!(agent.position(), position + *offset);
            assert_eq!(agent.formation().unwrap().anchor, pack.anchor);
        }
    }

    #[test]
    fn rejects_bad_rediffusion_interval() {
        for interval in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let err = Simulation::new(open_world(4), presets::all(), 0, interval)
                .err()
                .unwrap();
            assert!(matches!(err, RuntimeError::InvalidRediffusionInterval(_)));
        }
    }

    #[test]
    fn step_rejects_bad_tick_length() {
        let mut sim = simulation();
        assert!(matches!(
            sim.step(0.0),
            Err(RuntimeError::InvalidTickLength(_))
        ));
        assert!(sim.step(f32::NAN).is_err());
        assert_eq!(sim.tick(), 0);
    }

    #[test]
    fn meat_scent_follows_sheep() {
        let mut sim = simulation();
        sim.spawn(presets::SHEEP, Vec2::new(5.0, 5.0)).unwrap();
        sim.spawn(presets::SHEEP, Vec2::new(15.0, 15.0)).unwrap();

        sim.step(0.05).unwrap();
        let events = sim.drain_events();
        assert!(events.contains(&Event::from(WorldEvent::RediffusionStarted {
            kind: SmellKind::MeatFood,
            sources: 2,
        })));
        // One source per tick
        assert!(sim.smell().total(SmellKind::MeatFood) > 0.0);
        let after_one = sim.smell().total(SmellKind::MeatFood);
        sim.step(0.05).unwrap();
        assert!(sim.smell().total(SmellKind::MeatFood) > after_one);
    }

    #[test]
    fn steps_advance_clock_and_report_population() {
        let mut sim = simulation();
        sim.spawn(presets::SHEEP, Vec2::new(3.0, 3.0)).unwrap();
        let report = sim.step(0.5).unwrap();

        assert_eq!(report.tick, 1);
        assert_eq!(report.clock, 0.5);
        assert_eq!(report.population, 1);
        assert_eq!(report.captures, 0);
    }

    #[test]
    fn captured_anchor_dissolves_its_pack() {
        let mut sim = simulation();
        let pack = sim
            .spawn_pack(presets::WOLF_PACK, presets::WOLF, Vec2::new(10.0, 10.0))
            .unwrap();
        sim.drain_events();

        let hunter = pack.members[0];
        let removed = sim.remove_captured(&[(pack.anchor, hunter), (pack.anchor, hunter)]);
        assert_eq!(removed, 1);
        assert!(sim.agent(pack.anchor).is_none());
        assert!(sim.agent(hunter).unwrap().formation().is_none());

        let events = sim.drain_events();
        assert_eq!(
            events
                .iter()
                .filter(|event| matches!(event, Event::World(WorldEvent::Removed { .. })))
                .count(),
            1
        );
        assert!(events.iter().any(|event| matches!(
            event,
            Event::World(WorldEvent::PackDissolved { anchor, members }) if *anchor == pack.anchor && members.len() == 4
        )));
        assert!(sim.snapshot().packs.is_empty());
    }
}
