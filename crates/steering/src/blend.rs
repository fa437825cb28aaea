//! Weighted composition of goal steering with reactive avoidance.

use glam::Vec2;

/// Magnitude under which an avoidance term counts as silent.
pub const AVOIDANCE_EPSILON: f32 = 0.001;

/// Allowed deviation of the weight sum from 1.0.
const WEIGHT_SUM_TOLERANCE: f32 = 1e-3;

/// Per-species blend of main, wall and collision steering.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlendWeights {
    pub main: f32,
    pub walls: f32,
    pub collisions: f32,
}

/// Rejected weight configuration.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum BlendError {
    #[error(
        "blend weights must be non-negative (main {main}, walls {walls}, collisions {collisions})"
    )]
    Negative { main: f32, walls: f32, collisions: f32 },
    #[error("blend weights must sum to 1.0, got {sum}")]
    BadSum { sum: f32 },
}

impl BlendWeights {
    /// Builds validated weights.
    pub fn new(main: f32, walls: f32, collisions: f32) -> Result<Self, BlendError> {
        let weights = Self {
            main,
            walls,
            collisions,
        };
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> Result<(), BlendError> {
        let all = [self.main, self.walls, self.collisions];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(BlendError::Negative {
                main: self.main,
                walls: self.walls,
                collisions: self.collisions,
            });
        }

        let sum: f32 = all.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(BlendError::BadSum { sum });
        }
        Ok(())
    }

    /// Combines the three steering terms.
    ///
    /// When neither avoidance term reaches [`AVOIDANCE_EPSILON`], `main`
    /// passes through at full strength.
    pub fn blend(&self, main: Vec2, walls: Vec2, collisions: Vec2) -> Vec2 {
        if walls.length() < AVOIDANCE_EPSILON && collisions.length() < AVOIDANCE_EPSILON {
            return main;
        }
        main * self.main + walls * self.walls + collisions * self.collisions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_weights_not_summing_to_one() {
        assert_eq!(
            BlendWeights::new(0.5, 0.5, 0.5),
            Err(BlendError::BadSum { sum: 1.5 })
        );
        assert!(BlendWeights::new(0.1, 0.4, 0.5).is_ok());
        assert!(BlendWeights::new(0.2, 0.8, 0.0).is_ok());
    }

    #[test]
    fn errors_describe_the_rejected_weights() {
        assert_eq!(
            BlendError::BadSum { sum: 1.5 }.to_string(),
            "blend weights must sum to 1.0, got 1.5"
        );
        let err: Box<dyn std::error::Error> =
            Box::new(BlendWeights::new(1.5, -0.5, 0.0).unwrap_err());
        assert!(err.to_string().contains("walls -0.5"));
    }

    #[test]
    fn rejects_negative_weights() {
        assert!(matches!(
            BlendWeights::new(1.5, -0.5, 0.0),
            Err(BlendError::Negative { .. })
        ));
    }

    #[test]
    fn quiet_avoidance_leaves_main_undiluted() {
        let weights = BlendWeights::new(0.1, 0.4, 0.5).unwrap();
        let main = Vec2::new(3.0, -1.0);
        assert_eq!(weights.blend(main, Vec2::ZERO, Vec2::splat(1e-4)), main);
    }

    #[test]
    fn active_avoidance_mixes_by_weight() {
        let weights = BlendWeights::new(0.1, 0.4, 0.5).unwrap();
        let blended = weights.blend(Vec2::X * 10.0, Vec2::Y, Vec2::ZERO);
        assert!((blended - Vec2::new(1.0, 0.4)).length() < 1e-5);
    }
}
