//! Move distributions extracted from visit counts.
//!
//! Formula: P(a) ∝ N(a)^(1/τ) where τ is temperature
//!
//! - τ = 0 (or so small that the power overflows): one-hot on the most
//!   visited action, first in node order on ties
//! - all counts zero: uniform over the node's actions
//! - τ = ∞: uniform

use rand::Rng;
use thiserror::Error;
use zero_core::{Game, Policy};

/// Errors raised when shaping a distribution.
#[derive(Debug, Error, PartialEq)]
pub enum DistributionError {
    #[error("Temperature must be a non-negative number, got {0}")]
    InvalidTemperature(f32),
}

/// Probability per action, in the node's fixed action order.
#[derive(Clone, Debug, PartialEq)]
pub struct Distribution<A> {
    entries: Vec<(A, f32)>,
}

impl<A: Copy + Eq> Distribution<A> {
    /// Shape visit counts into a distribution.
    ///
    /// # Errors
    /// Returns `DistributionError::InvalidTemperature` for a NaN or negative
    /// temperature.
    pub fn from_visit_counts(counts: &[(A, u32)], temperature: f32) -> Result<Self, DistributionError> {
        if temperature.is_nan() || temperature < 0.0 {
            return Err(DistributionError::InvalidTemperature(temperature));
        }
        if counts.is_empty() {
            return Ok(Self { entries: Vec::new() });
        }

        let mut raised = raise(counts, temperature).unwrap_or_else(|| one_hot(counts));

        let mut total: f64 = raised.iter().sum();
        // Expanded but never selected through: no evidence, fall back to uniform.
        if total == 0.0 {
            raised.iter_mut().for_each(|r| *r = 1.0);
            total = raised.len() as f64;
        }

        let entries = counts
            .iter()
            .zip(raised)
            .map(|((action, _), r)| (*action, (r / total) as f32))
            .collect();
        Ok(Self { entries })
    }

    /// `(action, probability)` pairs in node order.
    pub fn entries(&self) -> &[(A, f32)] {
        &self.entries
    }

    /// Iterate over `(action, probability)` pairs in node order.
    pub fn iter(&self) -> impl Iterator<Item = &(A, f32)> {
        self.entries.iter()
    }

    /// Probabilities in node order.
    pub fn probabilities(&self) -> Vec<f32> {
        self.entries.iter().map(|(_, p)| *p).collect()
    }

    /// Probability of `action`; 0 for actions not in the distribution.
    pub fn probability(&self, action: A) -> f32 {
        self.entries
            .iter()
            .find(|(a, _)| *a == action)
            .map_or(0.0, |(_, p)| *p)
    }

    /// Number of actions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True for the distribution of a node without actions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most probable action, first in node order on ties.
    pub fn best(&self) -> Option<A> {
        let mut best: Option<(A, f32)> = None;
        for &(action, p) in &self.entries {
            if best.map_or(true, |(_, bp)| p > bp) {
                best = Some((action, p));
            }
        }
        best.map(|(action, _)| action)
    }

    /// Sample an action proportionally to its probability.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Option<A> {
        let threshold: f32 = rng.gen::<f32>();
        let mut cumulative = 0.0;

        for &(action, p) in &self.entries {
            cumulative += p;
            if p > 0.0 && cumulative >= threshold {
                return Some(action);
            }
        }

        // Rounding left the cumulative sum just short of the threshold.
        self.best()
    }

    /// Expand to a policy over the full action space of `game`, e.g. as a
    /// training target. Actions outside the distribution get probability 0.
    pub fn to_policy<G: Game<Action = A>>(&self, game: &G) -> zero_core::Result<Policy> {
        let mut policy = vec![0.0; game.num_actions()];
        for &(action, p) in &self.entries {
            if let Some(slot) = policy.get_mut(game.action_to_index(action)) {
                *slot = p;
            }
        }
        Policy::from_unnormalized(policy)
    }
}

/// `N^(1/τ)` per action, or `None` when the exponent or any power is not finite.
fn raise<A>(counts: &[(A, u32)], temperature: f32) -> Option<Vec<f64>> {
    let exponent = 1.0 / f64::from(temperature);
    if !exponent.is_finite() {
        return None;
    }
    let raised: Vec<f64> = counts
        .iter()
        .map(|(_, n)| f64::from(*n).powf(exponent))
        .collect();
    raised.iter().all(|r| r.is_finite()).then_some(raised)
}

/// One-hot on the first maximum count.
fn one_hot<A>(counts: &[(A, u32)]) -> Vec<f64> {
    let mut best = 0;
    for (i, (_, n)) in counts.iter().enumerate() {
        if *n > counts[best].1 {
            best = i;
        }
    }
    let mut raised = vec![0.0; counts.len()];
    raised[best] = 1.0;
    raised
}
