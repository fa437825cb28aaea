//! Stateful random wandering.

use glam::Vec2;
use rand::Rng;

use crate::{Kinematic, seek};

/// Tunables for [`Wanderer`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WanderParams {
    /// Maximum per-tick change of the wander angle, in degrees.
    pub jitter: f32,
    /// Distance of the wander circle's centre ahead of the agent.
    pub distance: f32,
    /// Radius of the wander circle.
    pub radius: f32,
}

impl Default for WanderParams {
    fn default() -> Self {
        Self {
            jitter: 15.0,
            distance: 2.0,
            radius: 1.0,
        }
    }
}

/// Seeks a point on a circle projected ahead of the agent; the point drifts
/// around the circle by a bounded random amount every tick.
///
/// The angle only ever drifts forward from its current value, so a wanderer
/// cannot be rewound to an earlier state.
#[derive(Clone, Debug, PartialEq)]
pub struct Wanderer {
    angle: f32,
    params: WanderParams,
}

impl Wanderer {
    /// Creates a wanderer with a random starting angle in `[0, 360)`.
    pub fn new<R: Rng + ?Sized>(params: WanderParams, rng: &mut R) -> Self {
        Self {
            angle: rng.gen_range(0.0..360.0),
            params,
        }
    }

    /// Current wander angle in degrees.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Point on the wander circle the agent would currently seek.
    pub fn wander_target(&self, own: &Kinematic) -> Vec2 {
        let centre = own.position + own.heading() * self.params.distance;
        let radians = self.angle.to_radians();
        centre + Vec2::new(radians.cos(), radians.sin()) * self.params.radius
    }

    /// Perturbs the angle and seeks the resulting point on the circle.
    pub fn steer<R: Rng + ?Sized>(&mut self, own: &Kinematic, max_accel: f32, rng: &mut R) -> Vec2 {
        let jitter = self.params.jitter.abs();
        if jitter > 0.0 {
            self.angle = (self.angle + rng.gen_range(-jitter..=jitter)).rem_euclid(360.0);
        }
        seek(own.position, self.wander_target(own), max_accel)
    }
}
