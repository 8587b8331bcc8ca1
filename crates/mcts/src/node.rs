//! Per-state search statistics.
//!
//! A node holds one record per legal action of its state. Records are created
//! once at expansion and never removed; only their visit counts and mean
//! values change afterwards.

use zero_core::LegalActions;

/// Statistics for one legal action of a node.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionStat<A> {
    /// The action.
    pub action: A,

    /// Index of the action in the full action space.
    pub index: usize,

    /// Number of simulations that chose this action.
    pub visit_count: u32,

    /// Running average of the values credited to this action.
    /// 0.0 until the first credit.
    pub mean_value: f32,

    /// Prior probability from the oracle, fixed at expansion.
    pub prior: f32,
}

impl<A> ActionStat<A> {
    /// Create an unvisited record.
    pub fn new(action: A, index: usize, prior: f32) -> Self {
        Self {
            action,
            index,
            visit_count: 0,
            mean_value: 0.0,
            prior,
        }
    }

    /// Fold one backed-up value into the running average.
    pub fn credit(&mut self, value: f32) {
        let n = self.visit_count as f32;
        self.mean_value = (n * self.mean_value + value) / (n + 1.0);
        self.visit_count += 1;
    }

    /// Exploration bonus given the square root term of the parent.
    fn exploration(&self, cpuct: f32, sqrt_total: f32) -> f32 {
        cpuct * self.prior * sqrt_total / (1.0 + self.visit_count as f32)
    }
}

/// Search node for one expanded state.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode<A> {
    stats: Vec<ActionStat<A>>,
}

impl<A: Copy + Eq> TreeNode<A> {
    /// Build a node with one unvisited record per legal action.
    ///
    /// `priors` must be aligned with `legal`.
    pub fn new(legal: &LegalActions<A>, priors: &[f32]) -> Self {
        let stats = legal
            .iter()
            .zip(priors)
            .map(|(entry, prior)| ActionStat::new(entry.action, entry.index, *prior))
            .collect();
        Self { stats }
    }

    /// Records in the node's fixed action order.
    pub fn stats(&self) -> &[ActionStat<A>] {
        &self.stats
    }

    /// Mutable access to the record at `slot`.
    pub fn stat_mut(&mut self, slot: usize) -> Option<&mut ActionStat<A>> {
        self.stats.get_mut(slot)
    }

    /// Number of legal actions.
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    /// True for a node without legal actions.
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Sum of visit counts, i.e. how many simulations selected through here.
    pub fn total_visits(&self) -> u32 {
        self.stats.iter().map(|s| s.visit_count).sum()
    }

    /// Visit counts in node order.
    pub fn visit_counts(&self) -> Vec<(A, u32)> {
        self.stats.iter().map(|s| (s.action, s.visit_count)).collect()
    }

    /// Slot of `action`, if it is one of this node's actions.
    pub fn position(&self, action: A) -> Option<usize> {
        self.stats.iter().position(|s| s.action == action)
    }

    /// Pick the slot with the highest PUCT score.
    ///
    /// score(a) = Q(a) + cpuct * P(a) * sqrt(sum(N) + epsilon) / (1 + N(a))
    ///
    /// The first slot reaching the maximum wins ties. Returns `None` on an
    /// empty node.
    pub fn select(&self, cpuct: f32, epsilon: f32) -> Option<usize> {
        let sqrt_total = (self.total_visits() as f32 + epsilon).sqrt();

        let mut best = None;
        let mut best_score = f32::NEG_INFINITY;
        for (slot, stat) in self.stats.iter().enumerate() {
            let score = stat.mean_value + stat.exploration(cpuct, sqrt_total);
            if best.is_none() || score > best_score {
                best = Some(slot);
                best_score = score;
            }
        }
        best
    }
}
