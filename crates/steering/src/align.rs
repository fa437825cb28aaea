//! Face-the-direction-of-travel angular steering.

use crate::{Kinematic, wrap_degrees};

/// Speed below which the agent is considered idle and stops turning.
const IDLE_SPEED: f32 = 0.01;

/// Angular counterpart of [`crate::Arrive`].
///
/// The desired orientation is always the heading of the current velocity.
/// Angular error inside `arrive_angle` needs no rotation, error inside
/// `slow_angle` is scaled down linearly, anything larger turns at
/// `max_rotation`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Align {
    /// Degrees of error tolerated without turning.
    pub arrive_angle: f32,
    /// Degrees of error below which rotation is scaled down.
    pub slow_angle: f32,
    /// Maximum rotation in degrees per second.
    pub max_rotation: f32,
}

impl Align {
    pub const fn new(arrive_angle: f32, slow_angle: f32, max_rotation: f32) -> Self {
        Self {
            arrive_angle,
            slow_angle,
            max_rotation,
        }
    }

    /// Desired rotation for an angular error (already wrapped).
    pub fn target_rotation(&self, error: f32) -> f32 {
        let magnitude = error.abs();
        if magnitude < self.arrive_angle {
            0.0
        } else if magnitude < self.slow_angle {
            self.max_rotation * error / self.slow_angle
        } else {
            self.max_rotation.copysign(error)
        }
    }

    /// Angular acceleration that turns `own` toward its velocity.
    ///
    /// An idle agent (speed below 0.01) instead wants the rotation that
    /// cancels its current one, so it never spins in place.
    pub fn steer(&self, own: &Kinematic) -> f32 {
        let desired = if own.speed() < IDLE_SPEED {
            -own.rotation
        } else {
            let desired_orientation = own.velocity.y.atan2(own.velocity.x).to_degrees();
            self.target_rotation(wrap_degrees(desired_orientation - own.orientation))
        };

        desired - own.rotation
    }
}
