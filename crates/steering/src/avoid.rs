//! Reactive avoidance of static walls and moving neighbours.

use glam::Vec2;

use crate::{Kinematic, flee, heading_of};

/// Squared relative speed below which two bodies are treated as co-moving.
const MIN_RELATIVE_SPEED_SQ: f32 = 1e-6;

/// Single-ray physics query supplied by the host.
pub trait RayCaster<T> {
    /// Casts a ray and returns the nearest hit within `max_distance`.
    fn cast_ray(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<RayHit<T>>;
}

/// Result of a successful ray cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit<T> {
    pub point: Vec2,
    pub normal: Vec2,
    pub tag: T,
}

/// Three-whisker wall avoidance.
///
/// One ray is cast straight ahead, two shorter whiskers at
/// `±whisker_angle`. Every hit on an avoided surface contributes a full
/// flee from the hit point; fleeing the point rather than seeking along the
/// wall normal keeps agents out of right-angled corner traps.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WallAvoider {
    pub main_length: f32,
    pub side_length: f32,
    /// Degrees between the forward ray and each side whisker.
    pub whisker_angle: f32,
}

impl Default for WallAvoider {
    fn default() -> Self {
        Self {
            main_length: 2.0,
            side_length: 1.0,
            whisker_angle: 40.0,
        }
    }
}

impl WallAvoider {
    pub const fn new(main_length: f32, side_length: f32) -> Self {
        Self {
            main_length,
            side_length,
            whisker_angle: 40.0,
        }
    }

    /// Sums a flee from every whisker hit whose tag is in `avoid`.
    ///
    /// Returns zero when no whisker touches an avoided surface.
    pub fn steer<T, C>(&self, own: &Kinematic, caster: &C, avoid: &[T], max_accel: f32) -> Vec2
    where
        T: PartialEq,
        C: RayCaster<T> + ?Sized,
    {
        let rays = [
            (own.orientation - self.whisker_angle, self.side_length),
            (own.orientation + self.whisker_angle, self.side_length),
            (own.orientation, self.main_length),
        ];

        rays.into_iter()
            .filter_map(|(angle, length)| caster.cast_ray(own.position, heading_of(angle), length))
            .filter(|hit| avoid.contains(&hit.tag))
            .map(|hit| flee(own.position, hit.point, max_accel))
            .sum()
    }
}

/// Position and velocity of a nearby moving body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Point-of-closest-approach collision avoidance.
///
/// For each neighbour within `radius`, the time of closest approach is
/// `t* = dot(own - other, v_other - v_own) / |v_other - v_own|²`. When the
/// predicted separation at `t*` is under `threshold`, the agent flees the
/// neighbour's projected position at that time.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollisionAvoider {
    pub radius: f32,
    pub threshold: f32,
}

impl Default for CollisionAvoider {
    fn default() -> Self {
        Self {
            radius: 3.0,
            threshold: 0.5,
        }
    }
}

impl CollisionAvoider {
    pub const fn new(radius: f32, threshold: f32) -> Self {
        Self { radius, threshold }
    }

    /// Time until `neighbor` is closest to `own`, or `None` if the two are
    /// not closing in.
    pub fn time_of_closest_approach(own: &Kinematic, neighbor: &Neighbor) -> Option<f32> {
        let relative_position = own.position - neighbor.position;
        let relative_velocity = neighbor.velocity - own.velocity;
        let speed_sq = relative_velocity.length_squared();
        if speed_sq < MIN_RELATIVE_SPEED_SQ {
            return None;
        }

        let time = relative_position.dot(relative_velocity) / speed_sq;
        (time > 0.0).then_some(time)
    }

    pub fn steer<'a, I>(&self, own: &Kinematic, neighbors: I, max_accel: f32) -> Vec2
    where
        I: IntoIterator<Item = &'a Neighbor>,
    {
        let mut steering = Vec2::ZERO;

        for neighbor in neighbors {
            if own.position.distance(neighbor.position) > self.radius {
                continue;
            }
            let Some(time) = Self::time_of_closest_approach(own, neighbor) else {
                continue;
            };

            let own_future = own.position + own.velocity * time;
            let other_future = neighbor.position + neighbor.velocity * time;
            if own_future.distance(other_future) < self.threshold {
                steering += flee(own.position, other_future, max_accel);
            }
        }

        steering
    }
}
