//! Monte Carlo Tree Search guided by a policy/value oracle.
//!
//! This crate provides the AlphaZero-style search core that can be used with
//! any game implementing the `zero_core::Game` trait.
//!
//! # Features
//!
//! - **Generic**: Works with any `Game` implementation and any number of players
//! - **PUCT Selection**: Prior-weighted exploration with a zero-visit floor
//! - **Explicit tree**: The [`TreeStore`] is a value owned by the caller, keyed
//!   by state fingerprint, so transpositions share statistics
//! - **Oracle Abstraction**: Uniform, rollout and model-backed oracles
//! - **Temperature Shaping**: Visit counts to move distributions, greedy at τ = 0
//!
//! # Example
//!
//! ```
//! use zero_core::Game;
//! use zero_mcts::{games::TicTacToe, Mcts, MctsConfig, TreeStore, UniformOracle};
//!
//! let game = TicTacToe;
//! let state = game.initial_state();
//!
//! let mcts = Mcts::new(MctsConfig::with_simulations(200), UniformOracle::new());
//! let mut tree = TreeStore::new();
//!
//! let result = mcts.search(&game, &mut tree, &state, 1.0).unwrap();
//! println!("Best action: {:?}", result.best_action);
//!
//! // Any expanded state can be queried afterwards.
//! let greedy = mcts.distribution(&tree, &state, 0.0).unwrap();
//! assert_eq!(greedy.best(), Some(result.best_action));
//! ```

pub mod config;
pub mod distribution;
pub mod games;
pub mod node;
pub mod oracle;
pub mod search;
pub mod tree;

pub use config::{ConfigError, MctsConfig};
pub use distribution::{Distribution, DistributionError};
pub use node::{ActionStat, TreeNode};
pub use oracle::{
    Evaluation, ModelOracle, Oracle, OracleError, PolicyValueModel, Prediction, RolloutOracle,
    UniformOracle,
};
pub use search::{Mcts, SearchError, SearchResult, Simulation};
pub use tree::{TreeError, TreeStore};
