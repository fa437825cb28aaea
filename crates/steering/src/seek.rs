//! Point-targeted linear steering: seek, flee, arrive and pursue.

use glam::Vec2;

use crate::Kinematic;

/// Speed below which a pursuer is treated as stationary.
const PURSUE_MIN_SPEED: f32 = 0.001;

/// Look-ahead used when the pursuer has no speed to divide by.
const PURSUE_FALLBACK_SECONDS: f32 = 2.0;

/// Full acceleration toward `target`.
///
/// Returns zero when `position` and `target` coincide.
#[inline]
pub fn seek(position: Vec2, target: Vec2, max_accel: f32) -> Vec2 {
    (target - position).normalize_or_zero() * max_accel
}

/// Full acceleration away from `target`.
#[inline]
pub fn flee(position: Vec2, target: Vec2, max_accel: f32) -> Vec2 {
    -seek(position, target, max_accel)
}

/// Seeks the point a moving target will occupy by the time the pursuer
/// covers the current gap at its own speed.
///
/// The look-ahead divides by the pursuer's absolute speed rather than the
/// closing speed. A stationary pursuer looks two seconds ahead.
pub fn pursue(
    own: &Kinematic,
    target_position: Vec2,
    target_velocity: Vec2,
    max_accel: f32,
) -> Vec2 {
    let speed = own.speed();
    let time_to_target = if speed < PURSUE_MIN_SPEED {
        PURSUE_FALLBACK_SECONDS
    } else {
        own.position.distance(target_position) / speed
    };

    let predicted = target_position + target_velocity * time_to_target;
    seek(own.position, predicted, max_accel)
}

/// Decelerating approach toward a point.
///
/// Three zones by distance to the target:
///
/// | distance | target speed |
/// |---|---|
/// | `> slow_radius` | `max_speed` |
/// | `(arrive_radius, slow_radius]` | `distance / slow_radius * max_speed` |
/// | `<= arrive_radius` | `0` |
///
/// The returned acceleration is `desired_velocity - current_velocity`, so an
/// agent inside the arrive radius is braked to a stop.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Arrive {
    pub arrive_radius: f32,
    pub slow_radius: f32,
    pub max_speed: f32,
}

impl Arrive {
    pub const fn new(arrive_radius: f32, slow_radius: f32, max_speed: f32) -> Self {
        Self {
            arrive_radius,
            slow_radius,
            max_speed,
        }
    }

    /// Desired speed at `distance` from the target.
    pub fn target_speed(&self, distance: f32) -> f32 {
        if distance > self.slow_radius {
            self.max_speed
        } else if distance > self.arrive_radius {
            distance / self.slow_radius * self.max_speed
        } else {
            0.0
        }
    }

    /// Acceleration that brings `own` to rest at `target`.
    pub fn steer(&self, own: &Kinematic, target: Vec2) -> Vec2 {
        let offset = target - own.position;
        let desired = offset.normalize_or_zero() * self.target_speed(offset.length());
        desired - own.velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn seek_scales_to_max_accel() {
        let steering = seek(Vec2::ZERO, Vec2::new(3.0, 4.0), 10.0);
        assert!(close(steering, Vec2::new(6.0, 8.0)));
    }

    #[test]
    fn seek_on_target_is_zero() {
        assert_eq!(seek(Vec2::ONE, Vec2::ONE, 10.0), Vec2::ZERO);
    }

    #[test]
    fn flee_is_negated_seek() {
        let target = Vec2::new(-2.0, 1.0);
        assert!(close(
            flee(Vec2::ZERO, target, 3.0),
            -seek(Vec2::ZERO, target, 3.0)
        ));
    }

    #[test]
    fn arrive_beyond_slow_radius_uses_max_speed() {
        let arrive = Arrive::new(0.5, 3.0, 2.0);
        assert_eq!(arrive.target_speed(3.5), 2.0);
        assert_eq!(arrive.target_speed(100.0), 2.0);

        let own = Kinematic::at(Vec2::ZERO);
        let steering = arrive.steer(&own, Vec2::new(10.0, 0.0));
        assert!(close(steering, Vec2::new(2.0, 0.0)));
    }

    #[test]
    fn arrive_inside_arrive_radius_stops() {
        let arrive = Arrive::new(0.5, 3.0, 2.0);
        assert_eq!(arrive.target_speed(0.4), 0.0);
        assert_eq!(arrive.target_speed(0.0), 0.0);

        let own = Kinematic::at(Vec2::ZERO).with_velocity(Vec2::new(1.0, -1.0));
        let steering = arrive.steer(&own, Vec2::new(0.2, 0.0));
        assert!(close(steering, Vec2::new(-1.0, 1.0)));
    }

    #[test]
    fn arrive_speed_is_monotonic_up_to_slow_radius() {
        let arrive = Arrive::new(0.5, 3.0, 2.0);
        let mut previous = 0.0;
        for step in 0..=300 {
            let distance = step as f32 * 0.01;
            let speed = arrive.target_speed(distance);
            assert!(speed >= previous, "speed dropped at {distance}");
            previous = speed;
        }
        assert!((arrive.target_speed(1.5) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn pursue_stationary_pursuer_uses_fallback_lookahead() {
        let own = Kinematic::at(Vec2::ZERO);
        let steering = pursue(&own, Vec2::new(10.0, 0.0), Vec2::new(0.0, 5.0), 1.0);
        // Predicted point is (10, 10).
        assert!(close(steering, Vec2::new(1.0, 1.0).normalize()));
    }

    #[test]
    fn pursue_divides_by_own_speed() {
        let own = Kinematic::at(Vec2::ZERO).with_velocity(Vec2::new(5.0, 0.0));
        // Gap of 10 at own speed 5 => 2s; target moving (0, -5) => (10, -10).
        let steering = pursue(&own, Vec2::new(10.0, 0.0), Vec2::new(0.0, -5.0), 2.0);
        assert!(close(steering, Vec2::new(1.0, -1.0).normalize() * 2.0));
        assert!(steering.is_finite());
    }
}
