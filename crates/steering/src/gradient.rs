//! Smell-gradient following over a discrete scalar field.

use glam::{IVec2, Vec2};

/// Direction in which a sampled field increases the most around `cell`.
///
/// Every cell of the `(2 * radius + 1)²` square contributes its offset
/// weighted by its intensity. `sample` returns `None` for cells outside the
/// field, which are skipped. The resultant is normalised; a flat or empty
/// neighbourhood yields [`Vec2::ZERO`].
pub fn follow_gradient<F>(cell: IVec2, radius: i32, sample: F) -> Vec2
where
    F: Fn(IVec2) -> Option<f32>,
{
    let mut direction = Vec2::ZERO;

    for dx in -radius..=radius {
        for dy in -radius..=radius {
            let offset = IVec2::new(dx, dy);
            if let Some(intensity) = sample(cell + offset) {
                direction += offset.as_vec2() * intensity;
            }
        }
    }

    direction.normalize_or_zero()
}
