//! Per-creature-type tunables.

use std::collections::BTreeMap;

use glam::Vec2;
use steering::{Align, Arrive, BlendWeights, CollisionAvoider, MovementLimits, WallAvoider, WanderParams};
use strum::IntoEnumIterator;

use crate::env::Tag;
use crate::error::SpeciesError;
use crate::goal::{Action, GoalKind};
use crate::needs::NeedKind;
use crate::terrain::TerrainKind;

/// One creature type: movement limits, steering radii, avoidance policy,
/// needs and the actions it can choose from.
///
/// Shared by every agent of the species through an `Arc`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeciesConfig {
    pub name: String,
    /// Tag other agents see on bodies of this species.
    pub tag: Tag,
    pub limits: MovementLimits,
    pub arrive_radius: f32,
    pub slow_radius: f32,
    /// Orientation error, in degrees, tolerated without turning.
    pub rotate_arrive_angle: f32,
    /// Orientation error, in degrees, below which turning slows down.
    pub rotate_slow_angle: f32,
    pub wander: WanderParams,
    pub walls: WallAvoider,
    pub collisions: CollisionAvoider,
    pub weights: BlendWeights,
    /// Chebyshev radius, in cells, within which resources are seen.
    pub sight_radius: i32,
    /// Chebyshev radius, in cells, of the scent-gradient neighbourhood.
    pub smell_radius: i32,
    /// World-space radius within which prey is noticed.
    pub perception_radius: f32,
    /// World-space distance at which prey is caught.
    pub capture_radius: f32,
    /// Surfaces the whiskers steer away from.
    pub avoid_surfaces: Vec<Tag>,
    /// Bodies the collision avoider steers around.
    #[cfg_attr(feature = "serde", serde(default))]
    pub collision_tags: Vec<Tag>,
    #[cfg_attr(feature = "serde", serde(default = "all_needs"))]
    pub needs: Vec<NeedKind>,
    pub growth: BTreeMap<NeedKind, f32>,
    /// Upper bound of the random starting need values.
    pub max_start_insistance: f32,
    pub actions: Vec<Action>,
    /// Slot offsets for members when this species anchors a formation.
    #[cfg_attr(feature = "serde", serde(default))]
    pub formation: Vec<Vec2>,
}

fn all_needs() -> Vec<NeedKind> {
    NeedKind::iter().collect()
}

impl SpeciesConfig {
    /// A species with no actions, default radii and unit limits.
    ///
    /// Presets and tests start from here and override what they need.
    pub fn new(name: impl Into<String>, tag: Tag) -> Self {
        Self {
            name: name.into(),
            tag,
            limits: MovementLimits::new(1.0, 1.0, 90.0, 30.0),
            arrive_radius: 0.5,
            slow_radius: 3.0,
            rotate_arrive_angle: 5.0,
            rotate_slow_angle: 45.0,
            wander: WanderParams::default(),
            walls: WallAvoider::default(),
            collisions: CollisionAvoider::default(),
            weights: BlendWeights {
                main: 0.1,
                walls: 0.4,
                collisions: 0.5,
            },
            sight_radius: 3,
            smell_radius: 1,
            perception_radius: 5.0,
            capture_radius: 0.5,
            avoid_surfaces: vec![Tag::HighElevation, Tag::Water],
            collision_tags: Vec::new(),
            needs: all_needs(),
            growth: BTreeMap::new(),
            max_start_insistance: 5.0,
            actions: Vec::new(),
            formation: Vec::new(),
        }
    }

    pub fn arrive(&self) -> Arrive {
        Arrive::new(self.arrive_radius, self.slow_radius, self.limits.max_speed)
    }

    pub fn align(&self) -> Align {
        Align::new(
            self.rotate_arrive_angle,
            self.rotate_slow_angle,
            self.limits.max_rotation,
        )
    }

    pub fn is_formation_anchor(&self) -> bool {
        !self.formation.is_empty()
    }

    /// Checks the configuration for values that would break steering math.
    ///
    /// An empty action list is valid: such agents simply never leave the
    /// deciding state.
    pub fn validate(&self) -> Result<(), SpeciesError> {
        if self.name.trim().is_empty() {
            return Err(SpeciesError::EmptyName);
        }

        let positive = [
            ("max_speed", self.limits.max_speed),
            ("max_accel", self.limits.max_accel),
            ("max_rotation", self.limits.max_rotation),
            ("max_angular_accel", self.limits.max_angular_accel),
            ("slow_radius", self.slow_radius),
            ("rotate_slow_angle", self.rotate_slow_angle),
            ("capture_radius", self.capture_radius),
            ("perception_radius", self.perception_radius),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(self.invalid(field, value));
            }
        }

        let non_negative = [
            ("arrive_radius", self.arrive_radius),
            ("rotate_arrive_angle", self.rotate_arrive_angle),
            ("max_start_insistance", self.max_start_insistance),
            ("sight_radius", self.sight_radius as f32),
            ("smell_radius", self.smell_radius as f32),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(self.invalid(field, value));
            }
        }

        self.weights
            .validate()
            .map_err(|source| SpeciesError::InvalidWeights {
                species: self.name.clone(),
                source,
            })?;

        for (need, rate) in &self.growth {
            if !(rate.is_finite() && *rate >= 0.0) {
                return Err(SpeciesError::NegativeGrowth {
                    species: self.name.clone(),
                    need: *need,
                    rate: *rate,
                });
            }
        }
        for need in &self.needs {
            if !self.growth.contains_key(need) {
                tracing::warn!(species = %self.name, %need, "need has no growth rate and will not grow");
            }
        }

        for action in &self.actions {
            self.validate_action(action)?;
        }
        Ok(())
    }

    fn validate_action(&self, action: &Action) -> Result<(), SpeciesError> {
        let duration = match action.goal {
            GoalKind::Sleep { duration_secs } | GoalKind::Wander { duration_secs } => {
                Some(duration_secs)
            }
            _ => None,
        };
        for value in [Some(action.est_duration_secs), duration].into_iter().flatten() {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SpeciesError::InvalidDuration {
                    species: self.name.clone(),
                    action: action.name.clone(),
                    duration: value,
                });
            }
        }

        let unsupported = |requirement: &'static str| SpeciesError::UnsupportedGoal {
            species: self.name.clone(),
            action: action.name.clone(),
            goal: action.goal,
            requirement,
        };
        match action.goal {
            GoalKind::Hunt { prey, .. } if prey == self.tag => {
                Err(unsupported("a prey tag other than the species' own"))
            }
            GoalKind::SeekTerrain {
                terrain: TerrainKind::High,
                ..
            } => Err(unsupported("a terrain the species can stand on")),
            _ => Ok(()),
        }
    }

    fn invalid(&self, field: &'static str, value: f32) -> SpeciesError {
        SpeciesError::InvalidTunable {
            species: self.name.clone(),
            field,
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smell::SmellKind;

    #[test]
    fn default_species_is_valid() {
        assert_eq!(SpeciesConfig::new("goat", Tag::Sheep).validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_speed_and_bad_weights() {
        let mut species = SpeciesConfig::new("goat", Tag::Sheep);
        species.limits.max_speed = 0.0;
        assert!(matches!(
            species.validate(),
            Err(SpeciesError::InvalidTunable {
                field: "max_speed",
                ..
            })
        ));

        let mut species = SpeciesConfig::new("goat", Tag::Sheep);
        species.weights.main = 0.9;
        assert!(matches!(species.validate(), Err(SpeciesError::InvalidWeights { .. })));
    }

    #[test]
    fn rejects_self_hunting() {
        let mut species = SpeciesConfig::new("wolf", Tag::Wolf);
        species.actions.push(Action::new(
            "Hunt",
            GoalKind::Hunt {
                prey: Tag::Wolf,
                smell: SmellKind::MeatFood,
            },
            BTreeMap::new(),
            15.0,
        ));
        assert!(matches!(species.validate(), Err(SpeciesError::UnsupportedGoal { .. })));
    }

    #[test]
    fn rejects_negative_growth_and_duration() {
        let mut species = SpeciesConfig::new("goat", Tag::Sheep);
        species.growth.insert(NeedKind::Food, -0.1);
        assert!(matches!(species.validate(), Err(SpeciesError::NegativeGrowth { .. })));

        let mut species = SpeciesConfig::new("goat", Tag::Sheep);
        species.actions.push(Action::new(
            "Nap",
            GoalKind::Sleep { duration_secs: -1.0 },
            BTreeMap::new(),
            15.0,
        ));
        assert!(matches!(species.validate(), Err(SpeciesError::InvalidDuration { .. })));
    }
}
