//! Policy/value oracle abstraction for MCTS.
//!
//! The `Oracle` trait is the search's only window onto move priors and
//! position values:
//! - `UniformOracle`: uniform priors and a neutral value (testing baseline)
//! - `RolloutOracle`: uniform priors and a random playout for the value
//! - `ModelOracle`: wraps a model producing full-action-space logits and
//!   restricts them to the legal actions

use rand::Rng;
use std::cell::RefCell;
use thiserror::Error;
use zero_core::{Game, LegalActions, Outcome, Value};

/// Errors that can occur during evaluation.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Oracle returned {got} priors for {expected} legal actions")]
    PriorLength { expected: usize, got: usize },

    #[error("Model returned {got} logits for an action space of {expected}")]
    LogitLength { expected: usize, got: usize },

    #[error("Model error: {0}")]
    Model(String),
}

/// Evaluation result: priors over the legal actions + value estimate.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// Prior probability for each legal action, aligned with the
    /// `LegalActions` the oracle was given. Sums to ~1.0.
    pub priors: Vec<f32>,

    /// Value estimate from the perspective of the player to move, in [-1, 1].
    pub value: f32,
}

/// Trait for evaluating game positions.
///
/// The search calls `evaluate` exactly once per distinct non-terminal state,
/// when it expands that state.
pub trait Oracle<G: Game> {
    /// Evaluate a non-terminal position.
    ///
    /// `legal` lists the legal actions of `state` in node order; the returned
    /// priors must have one entry per legal action in that order.
    fn evaluate(
        &self,
        game: &G,
        state: &G::State,
        legal: &LegalActions<G::Action>,
    ) -> Result<Evaluation, OracleError>;
}

impl<G: Game, O: Oracle<G> + ?Sized> Oracle<G> for &O {
    fn evaluate(
        &self,
        game: &G,
        state: &G::State,
        legal: &LegalActions<G::Action>,
    ) -> Result<Evaluation, OracleError> {
        (**self).evaluate(game, state, legal)
    }
}

fn uniform_priors(len: usize) -> Vec<f32> {
    if len == 0 {
        Vec::new()
    } else {
        vec![1.0 / len as f32; len]
    }
}

/// Uniform oracle: equal priors over legal actions, value 0 (neutral).
#[derive(Debug, Clone, Default)]
pub struct UniformOracle;

impl UniformOracle {
    pub fn new() -> Self {
        Self
    }
}

impl<G: Game> Oracle<G> for UniformOracle {
    fn evaluate(
        &self,
        _game: &G,
        _state: &G::State,
        legal: &LegalActions<G::Action>,
    ) -> Result<Evaluation, OracleError> {
        Ok(Evaluation {
            priors: uniform_priors(legal.len()),
            value: 0.0,
        })
    }
}

/// Oracle using uniform priors and random rollouts.
///
/// - Priors: uniform distribution over legal actions
/// - Value: result of a random playout from the position
pub struct RolloutOracle<R: Rng> {
    /// Random number generator (wrapped in RefCell for interior mutability).
    rng: RefCell<R>,

    /// Maximum moves in one playout. Longer playouts count as a draw.
    max_rollout_depth: usize,
}

impl<R: Rng> RolloutOracle<R> {
    /// Create a new rollout oracle.
    pub fn new(rng: R, max_rollout_depth: usize) -> Self {
        Self {
            rng: RefCell::new(rng),
            max_rollout_depth,
        }
    }

    /// Play random moves from `initial_state`.
    ///
    /// Returns +1 if the player to move at the start wins, -1 if anyone else
    /// wins, 0 for a tie or when the depth limit cuts the playout short.
    fn rollout<G: Game>(&self, game: &G, initial_state: &G::State) -> f32 {
        let me = game.player_to_move(initial_state);
        let mut state = initial_state.clone();

        for _ in 0..=self.max_rollout_depth {
            if let Some(outcome) = game.terminal_result(&state) {
                return match outcome {
                    Outcome::Win(winner) if winner == me => 1.0,
                    Outcome::Win(_) => -1.0,
                    Outcome::Tie => 0.0,
                };
            }

            let actions = game.legal_actions(&state);
            if actions.is_empty() {
                break;
            }
            let idx = self.rng.borrow_mut().gen_range(0..actions.len());
            state = game.apply_action(&state, actions[idx]);
        }

        0.0
    }
}

impl<G: Game, R: Rng> Oracle<G> for RolloutOracle<R> {
    fn evaluate(
        &self,
        game: &G,
        state: &G::State,
        legal: &LegalActions<G::Action>,
    ) -> Result<Evaluation, OracleError> {
        Ok(Evaluation {
            priors: uniform_priors(legal.len()),
            value: self.rollout(game, state),
        })
    }
}

/// Raw output of a policy/value model.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    /// One logit per index of the full action space.
    pub logits: Vec<f32>,

    /// Unbounded value estimate for the player to move.
    pub value: f32,
}

/// A trained model (or anything shaped like one) scoring a position over the
/// full action space.
pub trait PolicyValueModel<G: Game> {
    fn predict(&self, game: &G, state: &G::State) -> Result<Prediction, OracleError>;
}

/// Oracle adapter over a [`PolicyValueModel`].
///
/// Masks the model's logits to the legal actions and renormalizes them with a
/// softmax, so illegal actions never receive prior mass. The value is clamped
/// to [-1, 1].
pub struct ModelOracle<M> {
    model: M,
}

impl<M> ModelOracle<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// The wrapped model.
    pub fn model(&self) -> &M {
        &self.model
    }
}

/// Softmax over the logits at the given indices.
///
/// Fails with `LogitLength` when an index falls outside `logits`.
fn masked_softmax(
    logits: &[f32],
    indices: impl Iterator<Item = usize>,
) -> Result<Vec<f32>, OracleError> {
    let selected = indices
        .map(|i| {
            logits.get(i).copied().ok_or(OracleError::LogitLength {
                expected: i + 1,
                got: logits.len(),
            })
        })
        .collect::<Result<Vec<f32>, _>>()?;

    let max = selected.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = selected.iter().map(|l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();

    if !max.is_finite() || !(sum > 0.0) || !sum.is_finite() {
        return Ok(uniform_priors(exps.len()));
    }
    Ok(exps.into_iter().map(|e| e / sum).collect())
}

impl<G: Game, M: PolicyValueModel<G>> Oracle<G> for ModelOracle<M> {
    fn evaluate(
        &self,
        game: &G,
        state: &G::State,
        legal: &LegalActions<G::Action>,
    ) -> Result<Evaluation, OracleError> {
        let prediction = self.model.predict(game, state)?;
        if prediction.logits.len() != game.num_actions() {
            return Err(OracleError::LogitLength {
                expected: game.num_actions(),
                got: prediction.logits.len(),
            });
        }

        let priors = masked_softmax(&prediction.logits, legal.iter().map(|entry| entry.index))?;

        Ok(Evaluation {
            priors,
            value: Value::clamped(prediction.value).get(),
        })
    }
}
