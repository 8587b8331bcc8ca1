//! Fingerprint-keyed tree store.
//!
//! The store maps a state's fingerprint to its search node. It is an explicit
//! value owned by the caller's search episode, so independent episodes never
//! share statistics unless the caller hands the same store to both.
//!
//! Terminal states are never stored. The store only grows: a node is inserted
//! at most once per state and is never removed except by [`TreeStore::clear`].

use crate::node::TreeNode;
use std::collections::HashMap;
use thiserror::Error;
use zero_core::Fingerprint;

/// Errors raised by the tree store.
#[derive(Debug, Error)]
pub enum TreeError {
    /// A node for this state already exists. Overwriting it would discard
    /// accumulated statistics.
    #[error("Node already expanded for state {0}")]
    DuplicateExpansion(Fingerprint),
}

/// Mapping from state fingerprint to search node.
#[derive(Debug)]
pub struct TreeStore<A> {
    nodes: HashMap<Fingerprint, TreeNode<A>>,
}

impl<A> TreeStore<A> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }

    /// Look up the node of a state.
    pub fn lookup(&self, key: &Fingerprint) -> Option<&TreeNode<A>> {
        self.nodes.get(key)
    }

    /// Mutable access to a node, used during backup.
    pub fn lookup_mut(&mut self, key: &Fingerprint) -> Option<&mut TreeNode<A>> {
        self.nodes.get_mut(key)
    }

    /// True if the state has been expanded.
    pub fn contains(&self, key: &Fingerprint) -> bool {
        self.nodes.contains_key(key)
    }

    /// Insert the node of a newly expanded state.
    ///
    /// # Errors
    /// Returns `TreeError::DuplicateExpansion` if the key is already present.
    /// The existing node is left untouched.
    pub fn insert(&mut self, key: Fingerprint, node: TreeNode<A>) -> Result<(), TreeError> {
        use std::collections::hash_map::Entry;

        match self.nodes.entry(key) {
            Entry::Occupied(entry) => Err(TreeError::DuplicateExpansion(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(node);
                Ok(())
            }
        }
    }

    /// Drop every node, e.g. between episodes when the tree is not reused.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Number of expanded states.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True before the first expansion.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<A> Default for TreeStore<A> {
    fn default() -> Self {
        Self::new()
    }
}
