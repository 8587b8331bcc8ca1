//! Zero Core - Game abstractions and common types
//!
//! This crate provides the [`Game`] trait that a rules engine implements to be
//! searchable by `zero-mcts`, along with the vocabulary the search shares with
//! its callers.
//!
//! # Types
//!
//! - [`Game`] - Trait for game implementations (the game adapter)
//! - [`LegalActions`] - Legal actions of one state, in ascending index order
//! - [`Outcome`] / [`Resolver`] - Terminal results and the identity a search value is expressed for
//! - [`Fingerprint`] - Exact identity key of a state
//! - [`Policy`] - Probability distribution over the full action space
//! - [`Value`] - Clamped value estimate in [-1, 1]

mod error;
mod fingerprint;
mod game;
mod types;

pub use error::{CoreError, Result};
pub use fingerprint::{fingerprint, Fingerprint};
pub use game::{Game, LegalAction, LegalActions};
pub use types::{Outcome, Policy, Resolver, Value};
