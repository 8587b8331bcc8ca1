//! Monte Carlo Tree Search implementation.
//!
//! One simulation walks down the tree with PUCT selection until it reaches a
//! state without a node, resolves that state (terminal result or oracle
//! expansion), then backs the resulting value up the recorded path.
//!
//! The value is not negated level by level. It travels up unchanged together
//! with its [`Resolver`], and each ancestor credits it to the chosen action
//! from the perspective of its own player to move. This works for any number
//! of players.

use crate::{
    config::{ConfigError, MctsConfig},
    distribution::{Distribution, DistributionError},
    node::TreeNode,
    oracle::{Oracle, OracleError},
    tree::{TreeError, TreeStore},
};
use std::marker::PhantomData;
use thiserror::Error;
use tracing::{debug, trace};
use zero_core::{fingerprint, CoreError, Fingerprint, Game, LegalActions, Resolver};

/// Errors that can occur during search.
///
/// All of them are programming faults on the caller's or an adapter's side;
/// the search never retries.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("No tree node for state {0}; it has not been expanded")]
    UnknownState(Fingerprint),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("Simulation exceeded the maximum depth of {0} selections")]
    DepthExceeded(usize),

    #[error("Non-terminal state {0} has no legal actions")]
    NoLegalActions(Fingerprint),

    #[error("Cannot search from terminal state {0}")]
    TerminalState(Fingerprint),

    #[error(transparent)]
    Distribution(#[from] DistributionError),

    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Outcome of one simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Simulation<P> {
    /// 1 for a decisive terminal result, 0 for a tie, or the oracle's value
    /// estimate for a newly expanded state.
    pub value: f32,

    /// Whose perspective `value` is expressed in.
    pub resolver: Resolver<P>,
}

/// Result of a full search from a root state.
#[derive(Clone, Debug)]
pub struct SearchResult<A> {
    /// Root move distribution at the requested temperature.
    pub distribution: Distribution<A>,

    /// Visit count for each action at root, in node order.
    pub visit_counts: Vec<(A, u32)>,

    /// Most visited action, first in node order on ties.
    pub best_action: A,

    /// Visit-weighted mean value of the root's actions, from the perspective
    /// of the player to move at root. 0 if no action was visited.
    pub root_value: f32,
}

/// One selection on the way down: which node, which slot, whose turn.
struct Step<P> {
    key: Fingerprint,
    slot: usize,
    player: P,
}

/// Monte Carlo Tree Search with PUCT selection.
///
/// Generic over:
/// - `G`: The game being played
/// - `O`: The policy/value oracle
///
/// The search holds no tree. Every call takes the caller's [`TreeStore`], and
/// one call to [`Mcts::simulate`] must finish before another touches the same
/// store.
pub struct Mcts<G: Game, O: Oracle<G>> {
    config: MctsConfig,
    oracle: O,
    _game: PhantomData<fn(&G)>,
}

impl<G, O> Mcts<G, O>
where
    G: Game,
    O: Oracle<G>,
{
    /// Create a new MCTS instance.
    ///
    /// The config is used as given. Callers holding a config that was not
    /// loaded through [`MctsConfig::from_json_str`] or
    /// [`MctsConfig::from_path`] should go through [`Mcts::try_new`]: a NaN
    /// `cpuct` or `epsilon` makes every score incomparable and selection
    /// degenerates to the first action.
    pub fn new(config: MctsConfig, oracle: O) -> Self {
        Self {
            config,
            oracle,
            _game: PhantomData,
        }
    }

    /// Create a new MCTS instance after validating `config`.
    pub fn try_new(config: MctsConfig, oracle: O) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config, oracle))
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Run one simulation from `state`, growing `tree`.
    ///
    /// Descends through expanded states, then either reports a terminal
    /// result or expands the first unexpanded state with the oracle, and
    /// finally credits every action chosen on the way down.
    ///
    /// # Errors
    /// - `DepthExceeded` if `max_depth` is configured and the descent is
    ///   longer; the tree is left unchanged in that case
    /// - `NoLegalActions` if the game reports a non-terminal state without moves
    /// - `Oracle` if the oracle fails or returns misaligned priors
    pub fn simulate(
        &self,
        game: &G,
        tree: &mut TreeStore<G::Action>,
        state: &G::State,
    ) -> Result<Simulation<G::Player>, SearchError> {
        let mut path: Vec<Step<G::Player>> = Vec::new();
        let mut current = state.clone();
        let mut key = fingerprint(&current)?;

        // SELECT: follow PUCT until we leave the tree
        while let Some(node) = tree.lookup(&key) {
            if let Some(limit) = self.config.max_depth {
                if path.len() >= limit {
                    return Err(SearchError::DepthExceeded(limit));
                }
            }

            let slot = node
                .select(self.config.cpuct, self.config.epsilon)
                .ok_or_else(|| SearchError::NoLegalActions(key.clone()))?;
            let action = node.stats()[slot].action;
            let player = game.player_to_move(&current);

            current = game.apply_action(&current, action);
            let next_key = fingerprint(&current)?;
            path.push(Step { key, slot, player });
            key = next_key;
        }

        // EXPAND (or stop at a terminal state)
        let outcome = self.resolve_leaf(game, tree, &current, key)?;

        // BACKUP: each level credits the value from its own perspective
        backup(tree, &path, outcome)?;

        trace!(
            depth = path.len(),
            value = outcome.value,
            resolver = ?outcome.resolver,
            "MCTS simulation complete"
        );

        Ok(outcome)
    }

    /// Terminal check, then oracle expansion.
    ///
    /// Terminal states are never stored, so reaching one again re-reads the
    /// rules engine.
    fn resolve_leaf(
        &self,
        game: &G,
        tree: &mut TreeStore<G::Action>,
        state: &G::State,
        key: Fingerprint,
    ) -> Result<Simulation<G::Player>, SearchError> {
        if let Some(outcome) = game.terminal_result(state) {
            let value = if outcome.winner().is_some() { 1.0 } else { 0.0 };
            trace!(state = %key, ?outcome, "Reached terminal state");
            return Ok(Simulation {
                value,
                resolver: Resolver::from(outcome),
            });
        }

        let legal = LegalActions::of(game, state);
        if legal.is_empty() {
            return Err(SearchError::NoLegalActions(key));
        }

        let evaluation = self.oracle.evaluate(game, state, &legal)?;
        if evaluation.priors.len() != legal.len() {
            return Err(OracleError::PriorLength {
                expected: legal.len(),
                got: evaluation.priors.len(),
            }
            .into());
        }

        let player = game.player_to_move(state);
        debug!(
            state = %key,
            actions = legal.len(),
            value = evaluation.value,
            "Expanded node"
        );
        tree.insert(key, TreeNode::new(&legal, &evaluation.priors))?;

        Ok(Simulation {
            value: evaluation.value,
            resolver: Resolver::Player(player),
        })
    }

    /// Move distribution at `state` from its visit counts.
    ///
    /// # Errors
    /// - `UnknownState` if `state` has not been expanded in `tree`
    /// - `Distribution` for a NaN or negative temperature
    pub fn distribution(
        &self,
        tree: &TreeStore<G::Action>,
        state: &G::State,
        temperature: f32,
    ) -> Result<Distribution<G::Action>, SearchError> {
        let key = fingerprint(state)?;
        let node = tree.lookup(&key).ok_or(SearchError::UnknownState(key))?;
        Ok(Distribution::from_visit_counts(
            &node.visit_counts(),
            temperature,
        )?)
    }

    /// Run `num_simulations` simulations from `state` and summarize the root.
    ///
    /// `tree` may already hold statistics from earlier searches; they are
    /// kept and extended.
    pub fn search(
        &self,
        game: &G,
        tree: &mut TreeStore<G::Action>,
        state: &G::State,
        temperature: f32,
    ) -> Result<SearchResult<G::Action>, SearchError> {
        if game.is_terminal(state) {
            return Err(SearchError::TerminalState(fingerprint(state)?));
        }

        for _ in 0..self.config.num_simulations {
            self.simulate(game, tree, state)?;
        }

        // The first simulation always expands a non-terminal root.
        let key = fingerprint(state)?;
        let root = tree.lookup(&key).ok_or(SearchError::UnknownState(key))?;
        let visit_counts = root.visit_counts();
        let distribution = Distribution::from_visit_counts(&visit_counts, temperature)?;

        // Best action is highest visit count
        let mut best = 0;
        for (i, (_, count)) in visit_counts.iter().enumerate() {
            if *count > visit_counts[best].1 {
                best = i;
            }
        }
        let best_action = root.stats()[best].action;

        let total_visits = root.total_visits();
        let root_value = if total_visits > 0 {
            root.stats()
                .iter()
                .map(|stat| stat.mean_value * stat.visit_count as f32)
                .sum::<f32>()
                / total_visits as f32
        } else {
            0.0
        };

        debug!(
            simulations = self.config.num_simulations,
            nodes = tree.len(),
            root_visits = total_visits,
            root_value,
            "Search complete"
        );

        Ok(SearchResult {
            distribution,
            visit_counts,
            best_action,
            root_value,
        })
    }
}

/// Credit `outcome` to every step of `path`, deepest first.
fn backup<A: Copy + Eq, P: Copy + Eq>(
    tree: &mut TreeStore<A>,
    path: &[Step<P>],
    outcome: Simulation<P>,
) -> Result<(), SearchError> {
    for step in path.iter().rev() {
        let stat = tree
            .lookup_mut(&step.key)
            .and_then(|node| node.stat_mut(step.slot))
            .ok_or_else(|| SearchError::UnknownState(step.key.clone()))?;
        stat.credit(outcome.resolver.credit(outcome.value, step.player));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{TicTacToe, TicTacToeAction, TicTacToeState};
    use crate::oracle::{Evaluation, RolloutOracle, UniformOracle};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use serde::Serialize;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use zero_core::Outcome;

    // Simple test game: race to 5
    // Players take turns adding 1 or 2. First to reach exactly 5 wins.
    // First player can always win with optimal play.
    #[derive(Clone)]
    struct RaceToFive;

    #[derive(Clone, PartialEq, Eq, Debug, Serialize)]
    struct RaceState {
        count: u8,
        current_player: u8,
    }

    impl Game for RaceToFive {
        type State = RaceState;
        type Action = u8; // 1 or 2
        type Player = u8;

        fn initial_state(&self) -> Self::State {
            RaceState {
                count: 0,
                current_player: 0,
            }
        }

        fn player_to_move(&self, state: &Self::State) -> Self::Player {
            state.current_player
        }

        fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action> {
            if state.count >= 5 {
                Vec::new()
            } else {
                let mut actions = vec![1];
                if state.count + 2 <= 5 {
                    actions.push(2);
                }
                actions
            }
        }

        fn apply_action(&self, state: &Self::State, action: Self::Action) -> Self::State {
            RaceState {
                count: state.count + action,
                current_player: 1 - state.current_player,
            }
        }

        fn terminal_result(&self, state: &Self::State) -> Option<Outcome<Self::Player>> {
            // Player who just moved reached 5 and wins
            (state.count >= 5).then_some(Outcome::Win(1 - state.current_player))
        }

        fn action_to_index(&self, action: Self::Action) -> usize {
            (action - 1) as usize
        }

        fn index_to_action(&self, index: usize) -> Option<Self::Action> {
            (index < 2).then_some(index as u8 + 1)
        }

        fn num_actions(&self) -> usize {
            2
        }
    }

    fn state(count: u8, current_player: u8) -> RaceState {
        RaceState {
            count,
            current_player,
        }
    }

    /// Uniform oracle that records how often each state was evaluated.
    #[derive(Default)]
    struct CountingOracle {
        calls: RefCell<HashMap<Fingerprint, usize>>,
    }

    impl Oracle<RaceToFive> for CountingOracle {
        fn evaluate(
            &self,
            game: &RaceToFive,
            state: &RaceState,
            legal: &LegalActions<u8>,
        ) -> Result<Evaluation, OracleError> {
            *self
                .calls
                .borrow_mut()
                .entry(fingerprint(state).unwrap())
                .or_insert(0) += 1;
            UniformOracle.evaluate(game, state, legal)
        }
    }

    struct ShortPriors;

    impl Oracle<RaceToFive> for ShortPriors {
        fn evaluate(
            &self,
            _game: &RaceToFive,
            _state: &RaceState,
            _legal: &LegalActions<u8>,
        ) -> Result<Evaluation, OracleError> {
            Ok(Evaluation {
                priors: vec![1.0],
                value: 0.0,
            })
        }
    }

    fn uniform_mcts() -> Mcts<RaceToFive, UniformOracle> {
        Mcts::new(MctsConfig::default(), UniformOracle::new())
    }

    fn root_stats(tree: &TreeStore<u8>, s: &RaceState) -> Vec<(u32, f32)> {
        tree.lookup(&fingerprint(s).unwrap())
            .unwrap()
            .stats()
            .iter()
            .map(|stat| (stat.visit_count, stat.mean_value))
            .collect()
    }

    #[test]
    fn test_first_simulation_expands_root() {
        let mcts = uniform_mcts();
        let game = RaceToFive;
        let root = game.initial_state();
        let mut tree = TreeStore::new();

        let sim = mcts.simulate(&game, &mut tree, &root).unwrap();

        assert_eq!(sim, Simulation { value: 0.0, resolver: Resolver::Player(0) });
        assert_eq!(tree.len(), 1);
        assert_eq!(root_stats(&tree, &root), vec![(0, 0.0), (0, 0.0)]);
    }

    #[test]
    fn test_visit_conservation() {
        let mcts = uniform_mcts();
        let game = RaceToFive;
        let root = game.initial_state();
        let mut tree = TreeStore::new();

        for _ in 0..30 {
            mcts.simulate(&game, &mut tree, &root).unwrap();
        }
        let key = fingerprint(&root).unwrap();
        // The first simulation only expands the root.
        assert_eq!(tree.lookup(&key).unwrap().total_visits(), 29);

        for _ in 0..10 {
            mcts.simulate(&game, &mut tree, &root).unwrap();
        }
        assert_eq!(tree.lookup(&key).unwrap().total_visits(), 39);
    }

    #[test]
    fn test_immediate_win_is_credited_to_mover() {
        // Count 4: the only move reaches 5 and wins for the player to move.
        let mcts = uniform_mcts();
        let game = RaceToFive;
        let root = state(4, 1);
        let mut tree = TreeStore::new();

        mcts.simulate(&game, &mut tree, &root).unwrap();
        let sim = mcts.simulate(&game, &mut tree, &root).unwrap();

        assert_eq!(sim, Simulation { value: 1.0, resolver: Resolver::Player(1) });
        assert_eq!(root_stats(&tree, &root), vec![(1, 1.0)]);
    }

    #[test]
    fn test_first_selections_follow_node_order_then_prior() {
        // Count 3, player 0: action 1 hands a forced win to player 1,
        // action 2 wins at once.
        let mcts = uniform_mcts();
        let game = RaceToFive;
        let root = state(3, 0);
        let mut tree = TreeStore::new();

        for _ in 0..3 {
            mcts.simulate(&game, &mut tree, &root).unwrap();
        }

        // Sim 2 ties on every score and takes the first action; its child is
        // expanded with value 0 for player 1, credited as -0 at root.
        // Sim 3 then prefers the unvisited action and wins.
        assert_eq!(root_stats(&tree, &root), vec![(1, 0.0), (1, 1.0)]);
    }

    #[test]
    fn test_opponent_win_is_negated_at_ancestor() {
        let mcts = uniform_mcts();
        let game = RaceToFive;
        let root = state(3, 0);
        let mut tree = TreeStore::new();

        for _ in 0..40 {
            mcts.simulate(&game, &mut tree, &root).unwrap();
        }

        let stats = root_stats(&tree, &root);
        assert_eq!(stats[1].1, 1.0);
        assert!(stats[0].0 >= 2);
        assert!(stats[0].1 < 0.0, "losing action has Q {}", stats[0].1);

        // From player 1's side the forced win is worth +1.
        let child = root_stats(&tree, &state(4, 1));
        assert_eq!(child[0].1, 1.0);

        let greedy = mcts.distribution(&tree, &root, 0.0).unwrap();
        assert_eq!(greedy.best(), Some(2));
    }

    #[test]
    fn test_terminal_state_is_idempotent_and_not_stored() {
        let mcts = uniform_mcts();
        let game = RaceToFive;
        let terminal = state(5, 1);
        let mut tree = TreeStore::new();

        let first = mcts.simulate(&game, &mut tree, &terminal).unwrap();
        let second = mcts.simulate(&game, &mut tree, &terminal).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, Simulation { value: 1.0, resolver: Resolver::Player(0) });
        assert!(tree.is_empty());
    }

    #[test]
    fn test_each_state_evaluated_once() {
        // 1+2 and 2+1 both reach count 3 with player 0 to move.
        let mcts = Mcts::new(MctsConfig::default(), CountingOracle::default());
        let game = RaceToFive;
        let root = game.initial_state();
        let mut tree = TreeStore::new();

        for _ in 0..200 {
            mcts.simulate(&game, &mut tree, &root).unwrap();
        }

        let calls = mcts.oracle().calls.borrow();
        assert_eq!(calls.len(), tree.len());
        assert!(calls.values().all(|&n| n == 1));
        assert!(calls.contains_key(&fingerprint(&state(3, 0)).unwrap()));
    }

    #[test]
    fn test_distribution_unknown_state() {
        let mcts = uniform_mcts();
        let tree = TreeStore::new();
        let err = mcts.distribution(&tree, &state(0, 0), 1.0).unwrap_err();
        assert!(matches!(err, SearchError::UnknownState(_)));
    }

    #[test]
    fn test_distribution_of_unvisited_node_is_uniform() {
        let mcts = uniform_mcts();
        let game = RaceToFive;
        let root = game.initial_state();
        let mut tree = TreeStore::new();
        mcts.simulate(&game, &mut tree, &root).unwrap();

        let dist = mcts.distribution(&tree, &root, 1.0).unwrap();
        assert_eq!(dist.probabilities(), vec![0.5, 0.5]);
    }

    #[test]
    fn test_depth_guard_leaves_tree_untouched() {
        let config = MctsConfig {
            max_depth: Some(1),
            ..Default::default()
        };
        let mcts = Mcts::new(config, UniformOracle::new());
        let game = RaceToFive;
        let root = game.initial_state();
        let mut tree = TreeStore::new();

        // Expand root, then one child on each action.
        for _ in 0..3 {
            mcts.simulate(&game, &mut tree, &root).unwrap();
        }
        let before = root_stats(&tree, &root);
        let nodes = tree.len();

        let err = mcts.simulate(&game, &mut tree, &root).unwrap_err();
        assert!(matches!(err, SearchError::DepthExceeded(1)));
        assert_eq!(root_stats(&tree, &root), before);
        assert_eq!(tree.len(), nodes);
    }

    #[test]
    fn test_misaligned_priors_are_rejected() {
        let mcts = Mcts::new(MctsConfig::default(), ShortPriors);
        let game = RaceToFive;
        let mut tree = TreeStore::new();

        let err = mcts.simulate(&game, &mut tree, &game.initial_state()).unwrap_err();
        assert!(matches!(
            err,
            SearchError::Oracle(OracleError::PriorLength { expected: 2, got: 1 })
        ));
        assert!(tree.is_empty());
    }

    /// A game that is never over but has no moves.
    struct Stalled;

    impl Game for Stalled {
        type State = u8;
        type Action = u8;
        type Player = u8;

        fn initial_state(&self) -> u8 {
            0
        }

        fn player_to_move(&self, _state: &u8) -> u8 {
            0
        }

        fn legal_actions(&self, _state: &u8) -> Vec<u8> {
            Vec::new()
        }

        fn apply_action(&self, state: &u8, _action: u8) -> u8 {
            *state
        }

        fn terminal_result(&self, _state: &u8) -> Option<Outcome<u8>> {
            None
        }

        fn action_to_index(&self, action: u8) -> usize {
            action as usize
        }

        fn index_to_action(&self, index: usize) -> Option<u8> {
            u8::try_from(index).ok()
        }

        fn num_actions(&self) -> usize {
            1
        }
    }

    #[test]
    fn test_stalled_state_is_an_error() {
        let mcts: Mcts<Stalled, UniformOracle> = Mcts::new(MctsConfig::default(), UniformOracle::new());
        let mut tree = TreeStore::new();

        let err = mcts.simulate(&Stalled, &mut tree, &0).unwrap_err();
        assert!(matches!(err, SearchError::NoLegalActions(_)));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_tie_credits_zero_along_path() {
        // X O X
        // X . O
        // O X .
        // O to move; every continuation ends in a tie.
        let game = TicTacToe;
        let root = TicTacToeState::from_cells("XOXX.OOX.").unwrap();
        let mcts = Mcts::new(MctsConfig::default(), UniformOracle::new());
        let mut tree = TreeStore::new();

        // Expand the root, then each of its two children.
        for _ in 0..3 {
            mcts.simulate(&game, &mut tree, &root).unwrap();
        }
        let child = game.apply_action(&root, TicTacToeAction(4));
        let stats = |tree: &TreeStore<TicTacToeAction>, s: &TicTacToeState| -> Vec<(u32, f32)> {
            tree.lookup(&fingerprint(s).unwrap())
                .unwrap()
                .stats()
                .iter()
                .map(|stat| (stat.visit_count, stat.mean_value))
                .collect()
        };
        assert_eq!(stats(&tree, &root), vec![(1, 0.0), (1, 0.0)]);
        assert_eq!(stats(&tree, &child), vec![(0, 0.0)]);
        let nodes = tree.len();

        // Through the first child to the full board.
        let sim = mcts.simulate(&game, &mut tree, &root).unwrap();

        assert_eq!(sim, Simulation { value: 0.0, resolver: Resolver::Tie });
        assert_eq!(stats(&tree, &root), vec![(2, 0.0), (1, 0.0)]);
        assert_eq!(stats(&tree, &child), vec![(1, 0.0)]);
        assert_eq!(tree.len(), nodes);
    }

    #[test]
    fn test_backup_through_missing_node_is_an_error() {
        let mut tree: TreeStore<u8> = TreeStore::new();
        let key = fingerprint(&state(1, 1)).unwrap();
        let path = vec![Step { key: key.clone(), slot: 0, player: 1u8 }];
        let outcome = Simulation { value: 1.0, resolver: Resolver::Player(1u8) };

        let err = backup(&mut tree, &path, outcome).unwrap_err();
        assert!(matches!(err, SearchError::UnknownState(k) if k == key));
    }

    #[test]
    fn test_backup_through_missing_slot_is_an_error() {
        let mcts = uniform_mcts();
        let game = RaceToFive;
        let root = state(4, 1);
        let mut tree = TreeStore::new();
        mcts.simulate(&game, &mut tree, &root).unwrap();

        // Count 4 has a single action.
        let path = vec![Step { key: fingerprint(&root).unwrap(), slot: 1, player: 1u8 }];
        let outcome = Simulation { value: 1.0, resolver: Resolver::Player(1u8) };

        assert!(matches!(
            backup(&mut tree, &path, outcome),
            Err(SearchError::UnknownState(_))
        ));
        assert_eq!(root_stats(&tree, &root), vec![(0, 0.0)]);
    }

    #[test]
    fn test_try_new_rejects_unusable_config() {
        let nan_cpuct = MctsConfig {
            cpuct: f32::NAN,
            ..Default::default()
        };
        let negative_epsilon = MctsConfig {
            epsilon: -1.0,
            ..Default::default()
        };

        assert!(Mcts::<RaceToFive, _>::try_new(nan_cpuct, UniformOracle::new()).is_err());
        assert!(Mcts::<RaceToFive, _>::try_new(negative_epsilon, UniformOracle::new()).is_err());
        assert!(Mcts::<RaceToFive, _>::try_new(MctsConfig::default(), UniformOracle::new()).is_ok());
    }

    #[test]
    fn test_search_from_terminal_fails() {
        let mcts = uniform_mcts();
        let mut tree = TreeStore::new();
        let err = mcts.search(&RaceToFive, &mut tree, &state(5, 0), 1.0).unwrap_err();
        assert!(matches!(err, SearchError::TerminalState(_)));
    }

    #[test]
    fn test_mcts_basic() {
        let config = MctsConfig::with_simulations(100);
        let rng = ChaCha8Rng::seed_from_u64(42);
        let mcts = Mcts::new(config, RolloutOracle::new(rng, 20));

        let game = RaceToFive;
        let root = game.initial_state();
        let mut tree = TreeStore::new();

        let result = mcts.search(&game, &mut tree, &root, 1.0).unwrap();

        let policy_sum: f32 = result.distribution.probabilities().iter().sum();
        assert!((policy_sum - 1.0).abs() < 1e-5);

        let total_visits: u32 = result.visit_counts.iter().map(|(_, c)| *c).sum();
        assert_eq!(total_visits, 99);
        assert!((-1.0..=1.0).contains(&result.root_value));
    }

    #[test]
    fn test_mcts_deterministic() {
        let run_search = |seed: u64| {
            let rng = ChaCha8Rng::seed_from_u64(seed);
            let mcts = Mcts::new(MctsConfig::with_simulations(50), RolloutOracle::new(rng, 20));
            let game = RaceToFive;
            let mut tree = TreeStore::new();
            mcts.search(&game, &mut tree, &game.initial_state(), 1.0).unwrap()
        };

        let result1 = run_search(12345);
        let result2 = run_search(12345);

        assert_eq!(result1.best_action, result2.best_action);
        assert_eq!(result1.visit_counts, result2.visit_counts);
        assert_eq!(result1.distribution, result2.distribution);
    }
}
