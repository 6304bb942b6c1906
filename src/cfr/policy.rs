//! Tabular policy representation.
//!
//! A policy maps an information-set key to a probability distribution over
//! the legal actions at that information set. The solver exposes two policies
//! derived from its tables: the per-iteration current policy (regret
//! matching) and the average policy (normalized strategy sums), both
//! materialized as `TabularPolicy` snapshots.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A policy backed by a hash table of action distributions.
///
/// Lookups for information sets that are not in the table fall back to the
/// uniform distribution over the supplied legal-action count. This makes a
/// freshly constructed (or insufficiently trained) policy usable everywhere,
/// with the documented caveat that it carries no learned information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TabularPolicy {
    /// Action probabilities: info_key -> [probability per legal action]
    table: FxHashMap<String, Vec<f64>>,
}

impl TabularPolicy {
    /// Create a new empty policy.
    pub fn new() -> Self {
        Self {
            table: FxHashMap::default(),
        }
    }

    /// Get the action distribution for an information set.
    ///
    /// # Arguments
    /// * `info_key` - The information set key
    /// * `num_actions` - Number of legal actions at this information set
    ///
    /// # Returns
    /// A vector of probabilities summing to 1.0; uniform if the information
    /// set is not in the table.
    pub fn strategy(&self, info_key: &str, num_actions: usize) -> Vec<f64> {
        match self.table.get(info_key) {
            Some(probs) => probs.clone(),
            None => uniform(num_actions),
        }
    }

    /// Store the action distribution for an information set.
    pub fn insert(&mut self, info_key: String, probs: Vec<f64>) {
        self.table.insert(info_key, probs);
    }

    /// Check whether an information set is present in the table.
    pub fn contains(&self, info_key: &str) -> bool {
        self.table.contains_key(info_key)
    }

    /// Number of information sets stored.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Iterate over stored (info_key, distribution) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<f64>)> {
        self.table.iter()
    }
}

/// Uniform distribution over `num_actions` actions.
pub(crate) fn uniform(num_actions: usize) -> Vec<f64> {
    vec![1.0 / num_actions as f64; num_actions]
}

/// Normalize a non-negative vector into a distribution.
///
/// Falls back to uniform when the total mass is zero (or effectively zero),
/// which is the regret-matching degeneracy rule.
pub(crate) fn normalized_or_uniform(values: &[f64]) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        values.iter().map(|&v| v / total).collect()
    } else {
        uniform(values.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_key_is_uniform() {
        let policy = TabularPolicy::new();
        let probs = policy.strategy("missing", 4);
        assert_eq!(probs, vec![0.25; 4]);
    }

    #[test]
    fn test_stored_distribution_is_returned() {
        let mut policy = TabularPolicy::new();
        policy.insert("k".to_string(), vec![0.7, 0.3]);
        assert_eq!(policy.strategy("k", 2), vec![0.7, 0.3]);
        assert!(policy.contains("k"));
        assert_eq!(policy.len(), 1);
    }

    #[test]
    fn test_normalized_or_uniform() {
        assert_eq!(normalized_or_uniform(&[1.0, 3.0]), vec![0.25, 0.75]);
        assert_eq!(normalized_or_uniform(&[0.0, 0.0]), vec![0.5, 0.5]);
    }

    #[test]
    fn test_policy_serde_round_trip() {
        let mut policy = TabularPolicy::new();
        policy.insert("0:pb".to_string(), vec![0.5, 0.5]);
        let json = serde_json::to_string(&policy).unwrap();
        let restored: TabularPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.strategy("0:pb", 2), vec![0.5, 0.5]);
    }
}
