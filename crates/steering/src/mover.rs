//! The shared integrator.

use glam::Vec2;

use crate::{Kinematic, wrap_degrees};

/// Per-species movement maxima.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementLimits {
    pub max_speed: f32,
    pub max_accel: f32,
    /// Degrees per second.
    pub max_rotation: f32,
    /// Degrees per second per tick.
    pub max_angular_accel: f32,
}

impl MovementLimits {
    pub const fn new(max_speed: f32, max_accel: f32, max_rotation: f32, max_angular_accel: f32) -> Self {
        Self {
            max_speed,
            max_accel,
            max_rotation,
            max_angular_accel,
        }
    }

    /// Applies one tick of steering to `kinematic`.
    ///
    /// Accelerations are clamped and added to the velocities as a per-tick
    /// impulse; velocities are clamped and then advance position and
    /// orientation by `dt`. Non-finite inputs are treated as zero.
    pub fn apply(&self, kinematic: &mut Kinematic, linear: Vec2, angular: f32, dt: f32) {
        let linear = if linear.is_finite() { linear } else { Vec2::ZERO };
        let angular = if angular.is_finite() { angular } else { 0.0 };

        kinematic.velocity += linear.clamp_length_max(self.max_accel);
        kinematic.velocity = kinematic.velocity.clamp_length_max(self.max_speed);

        kinematic.rotation += angular.clamp(-self.max_angular_accel, self.max_angular_accel);
        kinematic.rotation = kinematic.rotation.clamp(-self.max_rotation, self.max_rotation);

        kinematic.position += kinematic.velocity * dt;
        kinematic.orientation = wrap_degrees(kinematic.orientation + kinematic.rotation * dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheep() -> MovementLimits {
        MovementLimits::new(2.0, 10.0, 179.0, 30.0)
    }

    #[test]
    fn clamps_acceleration_then_speed() {
        let limits = MovementLimits::new(2.0, 1.0, 90.0, 30.0);
        let mut k = Kinematic::at(Vec2::ZERO);

        limits.apply(&mut k, Vec2::new(50.0, 0.0), 0.0, 0.5);
        assert!((k.velocity - Vec2::new(1.0, 0.0)).length() < 1e-6);
        assert!((k.position - Vec2::new(0.5, 0.0)).length() < 1e-6);

        limits.apply(&mut k, Vec2::new(50.0, 0.0), 0.0, 0.5);
        limits.apply(&mut k, Vec2::new(50.0, 0.0), 0.0, 0.5);
        assert!((k.speed() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn clamps_rotation_and_wraps_orientation() {
        let mut k = Kinematic::at(Vec2::ZERO).with_orientation(170.0).with_rotation(170.0);
        sheep().apply(&mut k, Vec2::ZERO, 100.0, 1.0);

        assert_eq!(k.rotation, 179.0);
        assert!((k.orientation - wrap_degrees(349.0)).abs() < 1e-4);
        assert!(k.orientation > -180.0 && k.orientation <= 180.0);
    }

    #[test]
    fn non_finite_steering_is_ignored() {
        let mut k = Kinematic::at(Vec2::ONE);
        sheep().apply(&mut k, Vec2::new(f32::NAN, 1.0), f32::INFINITY, 1.0);
        assert_eq!(k.position, Vec2::ONE);
        assert_eq!(k.rotation, 0.0);
    }
}
