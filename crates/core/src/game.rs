use crate::types::Outcome;
use serde::Serialize;
use std::fmt::Debug;

/// A game abstraction for guided tree search.
///
/// This trait is the game adapter the search consumes: legality, state
/// transition, terminal detection and player-to-move all come from here.
/// It supports any number of players; the search only ever compares player
/// identities for equality.
///
/// The game graph must be finite from every reachable state. The search
/// recurses until it reaches a terminal position, so a game that can cycle
/// forever will never finish a simulation unless a depth guard is configured.
pub trait Game {
    /// The game state. Serialization must cover everything that identifies the
    /// position, including the player to move, because it defines the state's
    /// fingerprint.
    type State: Clone + Serialize;

    /// A game action (e.g. a board coordinate).
    type Action: Copy + Eq + Debug;

    /// Player identity.
    type Player: Copy + Eq + Debug;

    /// Returns the initial game state
    fn initial_state(&self) -> Self::State;

    /// Returns the player whose turn it is
    fn player_to_move(&self, state: &Self::State) -> Self::Player;

    /// Returns all legal actions from the given state
    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Applies an action, returning a new state (immutable operation).
    ///
    /// The action must be legal in `state`.
    fn apply_action(&self, state: &Self::State, action: Self::Action) -> Self::State;

    /// Returns the result if the game has ended, `None` otherwise
    fn terminal_result(&self, state: &Self::State) -> Option<Outcome<Self::Player>>;

    /// Maps an action to a flat index in the full action space
    fn action_to_index(&self, action: Self::Action) -> usize;

    /// Maps a flat index back to an action, returning None if invalid
    fn index_to_action(&self, index: usize) -> Option<Self::Action>;

    /// Total number of possible action indices (size of the action space)
    fn num_actions(&self) -> usize;

    /// Boolean legality mask over the full action space.
    fn legal_action_mask(&self, state: &Self::State) -> Vec<bool> {
        let mut mask = vec![false; self.num_actions()];
        for action in self.legal_actions(state) {
            mask[self.action_to_index(action)] = true;
        }
        mask
    }

    /// Returns true if the game has ended
    fn is_terminal(&self, state: &Self::State) -> bool {
        self.terminal_result(state).is_some()
    }
}

/// A legal action paired with its index in the full action space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LegalAction<A> {
    pub index: usize,
    pub action: A,
}

/// The legal actions of one state, sorted by ascending action index.
///
/// This order is the fixed action order of a search node: it decides
/// tie-breaks during selection and the order of extracted distributions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegalActions<A> {
    entries: Vec<LegalAction<A>>,
}

impl<A: Copy + Eq> LegalActions<A> {
    /// Collect the legal actions of `state` from the game.
    pub fn of<G: Game<Action = A> + ?Sized>(game: &G, state: &G::State) -> Self {
        let entries = game
            .legal_actions(state)
            .into_iter()
            .map(|action| LegalAction {
                index: game.action_to_index(action),
                action,
            })
            .collect();
        Self::from_entries(entries)
    }

    /// Build the list from a full-space legality mask.
    ///
    /// Indices the game cannot map back to an action are skipped.
    pub fn from_mask<G: Game<Action = A> + ?Sized>(game: &G, mask: &[bool]) -> Self {
        let entries = mask
            .iter()
            .enumerate()
            .filter(|(_, legal)| **legal)
            .filter_map(|(index, _)| {
                game.index_to_action(index)
                    .map(|action| LegalAction { index, action })
            })
            .collect();
        Self::from_entries(entries)
    }

    fn from_entries(mut entries: Vec<LegalAction<A>>) -> Self {
        entries.sort_by_key(|entry| entry.index);
        entries.dedup_by_key(|entry| entry.index);
        Self { entries }
    }

    /// Number of legal actions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no action is legal.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = &LegalAction<A>> {
        self.entries.iter()
    }

    /// Iterate over the actions in index order.
    pub fn actions(&self) -> impl Iterator<Item = A> + '_ {
        self.entries.iter().map(|entry| entry.action)
    }

    /// Position of `action` in this list, if legal.
    pub fn position(&self, action: A) -> Option<usize> {
        self.entries.iter().position(|entry| entry.action == action)
    }

    /// Rebuild the boolean mask over a full action space of `num_actions`.
    pub fn mask(&self, num_actions: usize) -> Vec<bool> {
        let mut mask = vec![false; num_actions];
        for entry in &self.entries {
            if entry.index < num_actions {
                mask[entry.index] = true;
            }
        }
        mask
    }
}

impl<A> std::ops::Index<usize> for LegalActions<A> {
    type Output = LegalAction<A>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.entries[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    // Pick any subset of four slots; the state is the set of taken slots.
    struct Slots;

    #[derive(Clone, Serialize)]
    struct SlotState {
        taken: [bool; 4],
    }

    impl Game for Slots {
        type State = SlotState;
        type Action = u8;
        type Player = u8;

        fn initial_state(&self) -> Self::State {
            SlotState { taken: [false; 4] }
        }

        fn player_to_move(&self, state: &Self::State) -> Self::Player {
            (state.taken.iter().filter(|t| **t).count() % 2) as u8
        }

        fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action> {
            // Deliberately reversed to check that LegalActions sorts.
            (0..4u8).rev().filter(|i| !state.taken[*i as usize]).collect()
        }

        fn apply_action(&self, state: &Self::State, action: Self::Action) -> Self::State {
            let mut next = state.clone();
            next.taken[action as usize] = true;
            next
        }

        fn terminal_result(&self, state: &Self::State) -> Option<Outcome<Self::Player>> {
            state.taken.iter().all(|t| *t).then_some(Outcome::Tie)
        }

        fn action_to_index(&self, action: Self::Action) -> usize {
            action as usize
        }

        fn index_to_action(&self, index: usize) -> Option<Self::Action> {
            (index < 4).then_some(index as u8)
        }

        fn num_actions(&self) -> usize {
            4
        }
    }

    #[test]
    fn test_legal_actions_sorted_by_index() {
        let game = Slots;
        let state = game.apply_action(&game.initial_state(), 1);
        let legal = LegalActions::of(&game, &state);

        assert_eq!(legal.actions().collect::<Vec<_>>(), vec![0, 2, 3]);
        assert_eq!(legal[1].index, 2);
        assert_eq!(legal.position(3), Some(2));
        assert_eq!(legal.position(1), None);
    }

    #[test]
    fn test_default_mask_matches_legal_actions() {
        let game = Slots;
        let state = game.apply_action(&game.initial_state(), 2);
        let mask = game.legal_action_mask(&state);

        assert_eq!(mask, vec![true, true, false, true]);
        assert_eq!(LegalActions::of(&game, &state).mask(4), mask);
    }

    #[test]
    fn test_from_mask() {
        let game = Slots;
        let legal = LegalActions::from_mask(&game, &[false, true, true, false]);
        assert_eq!(legal.actions().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_terminal_has_no_legal_actions() {
        let game = Slots;
        let mut state = game.initial_state();
        for action in 0..4 {
            state = game.apply_action(&state, action);
        }
        assert!(game.is_terminal(&state));
        assert!(LegalActions::of(&game, &state).is_empty());
    }
}
