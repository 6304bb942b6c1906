//! Storage for cumulative regrets and strategy sums.
//!
//! This is the mutable heart of the solver: one entry per information set,
//! holding the per-action cumulative regret vector and the parallel
//! cumulative strategy-sum vector. Entries are created lazily on first visit
//! and never removed, so memory grows monotonically up to the game's
//! information-set count.
//!
//! The storage is exclusively owned by the solver driver and mutated only
//! between its `&mut self` calls; there is no interior mutability and no
//! locking because the traversal is single-threaded by design.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cfr::error::SolverError;
use crate::cfr::policy::{normalized_or_uniform, uniform, TabularPolicy};

/// Tables of cumulative regrets and strategy sums, keyed by info-set key.
#[derive(Debug, Clone, Default)]
pub struct RegretStorage {
    /// Cumulative regrets: info_key -> [regret per action]
    regrets: FxHashMap<String, Vec<f64>>,

    /// Cumulative strategy sums: info_key -> [strategy weight per action]
    strategy_sums: FxHashMap<String, Vec<f64>>,

    /// Legal-action counts per info set, used to detect key collisions.
    action_counts: FxHashMap<String, usize>,
}

impl RegretStorage {
    /// Create new empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage with pre-allocated capacity.
    ///
    /// Use this when you have an estimate of how many info sets the game has
    /// to avoid reallocations during training.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            regrets: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            strategy_sums: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            action_counts: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Get the current strategy for an info set using regret matching.
    ///
    /// The strategy is proportional to positive cumulative regrets. If all
    /// regrets are non-positive, or the info set has never been visited,
    /// returns the uniform strategy.
    pub fn current_strategy(&self, info_key: &str, num_actions: usize) -> Vec<f64> {
        match self.regrets.get(info_key) {
            Some(r) => {
                let positive: Vec<f64> = r.iter().map(|&x| x.max(0.0)).collect();
                normalized_or_uniform(&positive)
            }
            None => uniform(num_actions),
        }
    }

    /// Get the average strategy for an info set.
    ///
    /// The average strategy is the normalized cumulative strategy sum, which
    /// is the quantity that converges to equilibrium. Unvisited info sets
    /// yield the uniform strategy.
    pub fn average_strategy(&self, info_key: &str, num_actions: usize) -> Vec<f64> {
        match self.strategy_sums.get(info_key) {
            Some(sums) => normalized_or_uniform(sums),
            None => uniform(num_actions),
        }
    }

    /// Record the legal-action count for an info set, creating its entries.
    ///
    /// Fails if the key was previously seen with a different action count,
    /// which means the game's info-set keys collide across distinguishable
    /// states.
    pub fn observe(&mut self, info_key: &str, num_actions: usize) -> Result<(), SolverError> {
        match self.action_counts.get(info_key) {
            Some(&stored) if stored != num_actions => Err(SolverError::ActionCountMismatch {
                info_key: info_key.to_string(),
                expected: stored,
                found: num_actions,
            }),
            Some(_) => Ok(()),
            None => {
                self.action_counts.insert(info_key.to_string(), num_actions);
                self.regrets
                    .insert(info_key.to_string(), vec![0.0; num_actions]);
                self.strategy_sums
                    .insert(info_key.to_string(), vec![0.0; num_actions]);
                Ok(())
            }
        }
    }

    /// Add per-action regret deltas to an info set's cumulative regrets.
    ///
    /// The entry must have been created with [`observe`](Self::observe).
    pub fn add_regrets(&mut self, info_key: &str, deltas: &[f64]) {
        if let Some(entry) = self.regrets.get_mut(info_key) {
            for (r, &d) in entry.iter_mut().zip(deltas.iter()) {
                *r += d;
            }
        }
    }

    /// Add a weighted strategy to an info set's cumulative strategy sum.
    ///
    /// The weight is typically the player's own reach probability, times the
    /// iteration index when linear averaging is enabled.
    pub fn add_strategy_sum(&mut self, info_key: &str, strategy: &[f64], weight: f64) {
        if let Some(entry) = self.strategy_sums.get_mut(info_key) {
            for (s, &p) in entry.iter_mut().zip(strategy.iter()) {
                *s += p * weight;
            }
        }
    }

    /// Materialize the current (regret-matching) policy for all visited
    /// info sets.
    pub fn current_policy(&self) -> TabularPolicy {
        let mut policy = TabularPolicy::new();
        for (key, r) in &self.regrets {
            let positive: Vec<f64> = r.iter().map(|&x| x.max(0.0)).collect();
            policy.insert(key.clone(), normalized_or_uniform(&positive));
        }
        policy
    }

    /// Materialize the average policy for all visited info sets.
    pub fn average_policy(&self) -> TabularPolicy {
        let mut policy = TabularPolicy::new();
        for (key, sums) in &self.strategy_sums {
            policy.insert(key.clone(), normalized_or_uniform(sums));
        }
        policy
    }

    /// Get the number of information sets stored.
    pub fn num_info_sets(&self) -> usize {
        self.regrets.len()
    }

    /// Check if an info set exists in storage.
    pub fn contains(&self, info_key: &str) -> bool {
        self.regrets.contains_key(info_key)
    }

    /// Get read access to the regret table (for analysis/tests).
    pub fn regrets(&self) -> &FxHashMap<String, Vec<f64>> {
        &self.regrets
    }

    /// Get read access to the strategy-sum table (for analysis/tests).
    pub fn strategy_sums(&self) -> &FxHashMap<String, Vec<f64>> {
        &self.strategy_sums
    }

    /// Clear all stored data.
    pub fn clear(&mut self) {
        self.regrets.clear();
        self.strategy_sums.clear();
        self.action_counts.clear();
    }

    /// Export storage to a serializable format.
    pub fn export(&self) -> StorageExport {
        StorageExport {
            regrets: self.regrets.clone(),
            strategy_sums: self.strategy_sums.clone(),
        }
    }

    /// Import storage from a serialized format.
    pub fn import(&mut self, data: StorageExport) {
        self.action_counts.clear();
        for (key, values) in &data.regrets {
            self.action_counts.insert(key.clone(), values.len());
        }
        self.regrets = data.regrets;
        self.strategy_sums = data.strategy_sums;
    }
}

/// Serializable export format for storage (checkpointing).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageExport {
    /// Cumulative regrets
    pub regrets: FxHashMap<String, Vec<f64>>,
    /// Cumulative strategy sums
    pub strategy_sums: FxHashMap<String, Vec<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regret_matching_proportional_to_positive_regret() {
        let mut storage = RegretStorage::new();
        storage.observe("k", 3).unwrap();
        storage.add_regrets("k", &[3.0, 1.0, -5.0]);

        let strategy = storage.current_strategy("k", 3);
        assert!((strategy[0] - 0.75).abs() < 1e-12);
        assert!((strategy[1] - 0.25).abs() < 1e-12);
        assert_eq!(strategy[2], 0.0);
    }

    #[test]
    fn test_all_nonpositive_regret_falls_back_to_uniform() {
        let mut storage = RegretStorage::new();
        storage.observe("k", 2).unwrap();
        storage.add_regrets("k", &[-1.0, -2.0]);
        assert_eq!(storage.current_strategy("k", 2), vec![0.5, 0.5]);
    }

    #[test]
    fn test_average_strategy_normalizes_sums() {
        let mut storage = RegretStorage::new();
        storage.observe("k", 2).unwrap();
        storage.add_strategy_sum("k", &[0.25, 0.75], 2.0);
        storage.add_strategy_sum("k", &[0.75, 0.25], 2.0);
        assert_eq!(storage.average_strategy("k", 2), vec![0.5, 0.5]);
    }

    #[test]
    fn test_action_count_mismatch_is_an_error() {
        let mut storage = RegretStorage::new();
        storage.observe("k", 2).unwrap();
        let err = storage.observe("k", 3).unwrap_err();
        assert_eq!(
            err,
            SolverError::ActionCountMismatch {
                info_key: "k".to_string(),
                expected: 2,
                found: 3,
            }
        );
    }

    #[test]
    fn test_entries_are_never_deleted() {
        let mut storage = RegretStorage::new();
        storage.observe("a", 2).unwrap();
        storage.observe("b", 2).unwrap();
        storage.add_regrets("a", &[-1.0, -1.0]);
        assert_eq!(storage.num_info_sets(), 2);
        assert!(storage.contains("a"));
        assert!(storage.contains("b"));
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut storage = RegretStorage::new();
        storage.observe("k", 2).unwrap();
        storage.add_regrets("k", &[1.0, -1.0]);
        storage.add_strategy_sum("k", &[0.5, 0.5], 1.0);

        let json = serde_json::to_string(&storage.export()).unwrap();
        let mut restored = RegretStorage::new();
        restored.import(serde_json::from_str(&json).unwrap());

        assert_eq!(restored.num_info_sets(), 1);
        assert_eq!(restored.current_strategy("k", 2), vec![1.0, 0.0]);
        assert_eq!(restored.average_strategy("k", 2), vec![0.5, 0.5]);
        // Action counts are rebuilt, so collisions are still caught.
        assert!(restored.observe("k", 3).is_err());
    }
}
