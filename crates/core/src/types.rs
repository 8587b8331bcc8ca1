//! Domain types shared by games, oracles and the search.
//!
//! - Outcome: how a finished game ended
//! - Resolver: whose perspective a backed-up search value is expressed in
//! - Policy: full-space training target built from a search distribution
//! - Value: oracle value estimate clamped to [-1, 1]

use crate::{CoreError, Result};

/// Result of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome<P> {
    /// The given player won.
    Win(P),
    /// Nobody won.
    Tie,
}

impl<P: Copy> Outcome<P> {
    /// The winner, if the game was decisive.
    pub fn winner(self) -> Option<P> {
        match self {
            Outcome::Win(player) => Some(player),
            Outcome::Tie => None,
        }
    }
}

/// The identity a search value is expressed for.
///
/// A value travels up the search path unchanged together with its resolver.
/// Each ancestor credits the value to itself when the resolver is the player
/// to move there, and the negated value otherwise. The resolver is a winner,
/// the tie marker, or the player who expanded a new leaf. The tie marker is
/// never equal to any player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resolver<P> {
    Player(P),
    Tie,
}

impl<P: Copy + Eq> Resolver<P> {
    /// Value as seen by `current`, the player to move at an ancestor.
    pub fn credit(self, value: f32, current: P) -> f32 {
        match self {
            Resolver::Player(player) if player == current => value,
            _ => -value,
        }
    }
}

impl<P> From<Outcome<P>> for Resolver<P> {
    fn from(outcome: Outcome<P>) -> Self {
        match outcome {
            Outcome::Win(player) => Resolver::Player(player),
            Outcome::Tie => Resolver::Tie,
        }
    }
}

/// A probability distribution over the full action space of a game.
///
/// Invariant: All values are non-negative and sum to 1.0.
#[derive(Clone, Debug, PartialEq)]
pub struct Policy(Vec<f32>);

impl Policy {
    /// Create a policy from raw weights, normalizing them to sum to 1.0.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidPolicy` if the vector is empty, any weight
    /// is negative or NaN, or the weights do not have a positive finite sum.
    pub fn from_unnormalized(values: Vec<f32>) -> Result<Self> {
        if values.is_empty() {
            return Err(CoreError::InvalidPolicy(
                "policy cannot be empty".to_string(),
            ));
        }

        if values.iter().any(|v| !(*v >= 0.0)) {
            return Err(CoreError::InvalidPolicy(
                "policy contains negative values".to_string(),
            ));
        }

        let sum: f32 = values.iter().sum();
        if sum <= 0.0 || !sum.is_finite() {
            return Err(CoreError::InvalidPolicy(format!(
                "cannot normalize weights summing to {}",
                sum
            )));
        }

        Ok(Self(values.into_iter().map(|v| v / sum).collect()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed policy.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Probabilities indexed by full-space action index.
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

/// A game value estimate in [-1, 1], from the perspective of the player to
/// move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Value(f32);

impl Value {
    /// Create a value by clamping to [-1, 1]. NaN maps to a draw.
    pub fn clamped(value: f32) -> Self {
        if value.is_nan() {
            Self(0.0)
        } else {
            Self(value.clamp(-1.0, 1.0))
        }
    }

    pub fn get(self) -> f32 {
        self.0
    }
}
