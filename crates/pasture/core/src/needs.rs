//! Need ("insistance") model.
//!
//! Every agent tracks a small set of needs. Each need grows at a fixed rate
//! per second and is reduced by completing actions. The agent's implicit
//! objective is to keep [`Insistance::cost`], the sum of squared values, as
//! low as possible.

use std::collections::BTreeMap;

use rand::Rng;

use crate::goal::Action;

/// Need category.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NeedKind {
    Food,
    Water,
    Sleep,
    Joy,
}

/// Current need values plus their growth rates.
///
/// Values never drop below zero. `Clone` is the deep copy used for
/// decision-time projection, so the live vector is never touched
/// speculatively.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Insistance {
    values: BTreeMap<NeedKind, f32>,
    growth: BTreeMap<NeedKind, f32>,
}

impl Insistance {
    /// Tracks every key of `values`. Negative starting values are clamped to
    /// zero.
    pub fn new(values: BTreeMap<NeedKind, f32>, growth: BTreeMap<NeedKind, f32>) -> Self {
        let values = values
            .into_iter()
            .map(|(kind, value)| (kind, value.max(0.0)))
            .collect();
        Self { values, growth }
    }

    /// Tracks `kinds`, each starting uniformly in `[0, max_start)`.
    pub fn randomized<R: Rng + ?Sized>(
        kinds: impl IntoIterator<Item = NeedKind>,
        growth: BTreeMap<NeedKind, f32>,
        max_start: f32,
        rng: &mut R,
    ) -> Self {
        let values = kinds
            .into_iter()
            .map(|kind| {
                let value = if max_start > 0.0 {
                    rng.gen_range(0.0..max_start)
                } else {
                    0.0
                };
                (kind, value)
            })
            .collect();
        Self::new(values, growth)
    }

    pub fn value(&self, kind: NeedKind) -> Option<f32> {
        self.values.get(&kind).copied()
    }

    pub fn growth_rate(&self, kind: NeedKind) -> Option<f32> {
        self.growth.get(&kind).copied()
    }

    pub fn is_tracked(&self, kind: NeedKind) -> bool {
        self.values.contains_key(&kind)
    }

    pub fn tracked(&self) -> impl Iterator<Item = NeedKind> + '_ {
        self.values.keys().copied()
    }

    pub fn values(&self) -> &BTreeMap<NeedKind, f32> {
        &self.values
    }

    /// Advances every tracked need by `rate * secs`.
    ///
    /// A tracked need without a growth rate is reported and left unchanged.
    pub fn grow(&mut self, secs: f32) {
        for (kind, value) in self.values.iter_mut() {
            match self.growth.get(kind) {
                Some(rate) => *value += rate * secs,
                None => tracing::warn!(need = %kind, "tracked need has no growth rate"),
            }
        }
    }

    /// Applies the effects of `action`.
    ///
    /// Returns the needs the action affects but this vector does not track;
    /// those effects are reported and skipped.
    pub fn apply(&mut self, action: &Action) -> Vec<NeedKind> {
        let mut skipped = Vec::new();
        for (kind, delta) in &action.effects {
            match self.values.get_mut(kind) {
                Some(value) => *value = (*value + delta).max(0.0),
                None => {
                    tracing::warn!(
                        action = %action.name,
                        need = %kind,
                        "action affects an untracked need"
                    );
                    skipped.push(*kind);
                }
            }
        }
        skipped
    }

    /// Grows by `secs`, then applies `action`. Meant for disposable copies.
    pub fn project(&mut self, action: &Action, secs: f32) -> Vec<NeedKind> {
        self.grow(secs);
        self.apply(action)
    }

    /// Sum of squared values.
    pub fn cost(&self) -> f32 {
        self.values.values().map(|v| v * v).sum()
    }
}
