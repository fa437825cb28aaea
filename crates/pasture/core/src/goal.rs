//! Actions and the utility-based goal selector.

use std::collections::BTreeMap;

use crate::env::Tag;
use crate::needs::{Insistance, NeedKind};
use crate::smell::SmellKind;
use crate::terrain::{FoodMarker, TerrainKind};

/// Steering routine an action runs while it is the agent's goal.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GoalKind {
    /// Walk to a visible food object, else follow its scent.
    SeekFood { marker: FoodMarker, smell: SmellKind },
    /// Walk to a visible terrain cell, else follow its scent. Standing on any
    /// cell of that terrain also completes the goal.
    SeekTerrain { terrain: TerrainKind, smell: SmellKind },
    /// Stop in place for a fixed time.
    Sleep { duration_secs: f32 },
    /// Drift randomly for a fixed time.
    Wander { duration_secs: f32 },
    /// Chase and capture a body tagged `prey`, else follow its scent.
    Hunt { prey: Tag, smell: SmellKind },
}

impl GoalKind {
    /// Surface the wall avoider should stop avoiding while this goal runs.
    pub fn sought_surface(&self) -> Option<Tag> {
        match self {
            Self::SeekTerrain { terrain, .. } => terrain.surface_tag(),
            _ => None,
        }
    }
}

/// Something an agent can do, with its fixed effect on needs.
///
/// Configured once per species; never mutated while the simulation runs.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Action {
    pub name: String,
    pub goal: GoalKind,
    /// Signed change applied to each need on completion.
    pub effects: BTreeMap<NeedKind, f32>,
    /// Expected time to complete, used to project need growth.
    pub est_duration_secs: f32,
}

impl Action {
    pub fn new(
        name: impl Into<String>,
        goal: GoalKind,
        effects: BTreeMap<NeedKind, f32>,
        est_duration_secs: f32,
    ) -> Self {
        Self {
            name: name.into(),
            goal,
            effects,
            est_duration_secs,
        }
    }

    /// Cost of `insistance` after performing this action, computed on a copy.
    pub fn projected_cost(&self, insistance: &Insistance) -> f32 {
        let mut projected = insistance.clone();
        projected.project(self, self.est_duration_secs);
        projected.cost()
    }
}

/// Picks the action that minimises projected need cost.
///
/// # Tie-breaking
///
/// Only a strictly lower cost replaces the current best, so the earliest
/// action in the list wins ties. Species files may rely on list order as an
/// implicit priority.
pub struct GoalSelector;

impl GoalSelector {
    /// Index of the best action in `candidates`, or `None` when the list is
    /// empty.
    pub fn select(candidates: &[Action], insistance: &Insistance) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;

        for (index, action) in candidates.iter().enumerate() {
            let cost = action.projected_cost(insistance);
            tracing::debug!(action = %action.name, cost, "evaluated action");

            if best.is_none_or(|(_, best_cost)| cost < best_cost) {
                best = Some((index, cost));
            }
        }

        if let Some((index, cost)) = best {
            tracing::debug!(action = %candidates[index].name, cost, "selected action");
        }
        best.map(|(index, _)| index)
    }

    /// Projected cost of every candidate, in list order.
    pub fn evaluate_all(candidates: &[Action], insistance: &Insistance) -> Vec<(String, f32)> {
        candidates
            .iter()
            .map(|action| (action.name.clone(), action.projected_cost(insistance)))
            .collect()
    }
}
