//! Kinematic state shared by every steering primitive.

use glam::Vec2;

/// Position, orientation and their first derivatives for one agent.
///
/// The steering layer reads this value and proposes accelerations; only the
/// integrator ([`crate::MovementLimits::apply`]) writes it.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Kinematic {
    pub position: Vec2,
    /// Facing in degrees, counter-clockwise from +x.
    pub orientation: f32,
    pub velocity: Vec2,
    /// Angular velocity in degrees per second.
    pub rotation: f32,
}

impl Kinematic {
    /// An agent at rest at `position`, facing +x.
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_orientation(mut self, orientation: f32) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Unit vector the agent is facing.
    #[inline]
    pub fn heading(&self) -> Vec2 {
        heading_of(self.orientation)
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// Unit vector at `degrees`, counter-clockwise from +x.
#[inline]
pub fn heading_of(degrees: f32) -> Vec2 {
    let radians = degrees.to_radians();
    Vec2::new(radians.cos(), radians.sin())
}

/// Wraps an angle in degrees into `(-180, 180]`.
#[inline]
pub fn wrap_degrees(degrees: f32) -> f32 {
    180.0 - (180.0 - degrees).rem_euclid(360.0)
}
