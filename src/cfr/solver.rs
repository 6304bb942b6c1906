//! CFR-BR solver: regret matching against a best-responding opponent.
//!
//! Each call to [`CfrBrSolver::evaluate_and_update_policy`] walks the full
//! game tree once per updated player. The updated player plays its current
//! regret-matching policy and accumulates regrets and strategy sums; every
//! other player plays a pure best response to the current policy, computed
//! per information set before the walk. Averaging the updated players'
//! strategy sums over iterations converges to a Nash equilibrium in
//! two-player zero-sum games.
//!
//! The traversal is exact and deterministic: chance outcomes are enumerated
//! with their probabilities and nothing is sampled.

use std::time::Instant;

use indicatif::ProgressBar;
use log::{debug, info, trace};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cfr::best_response::BestResponse;
use crate::cfr::config::{SolverConfig, SolverStats};
use crate::cfr::error::SolverError;
use crate::cfr::eval;
use crate::cfr::game::{Game, InfoState};
use crate::cfr::policy::TabularPolicy;
use crate::cfr::storage::{RegretStorage, StorageExport};

/// Pure best-response policies, one map of info-set key to action index per
/// player, recomputed at the start of every iteration.
type Responders = Vec<FxHashMap<String, usize>>;

/// The CFR-BR solver.
///
/// Generic over any game implementing the [`Game`] trait. The solver
/// exclusively owns its regret and strategy-sum tables; evaluation runs on
/// policy snapshots and never touches solver state.
///
/// Convergence is guaranteed for two-player zero-sum games. The traversal
/// itself handles n-player trees, but with more than two players the
/// algorithm is best effort only.
///
/// # Example
/// ```ignore
/// use cfr_br::cfr::{CfrBrSolver, SolverConfig};
///
/// let game = MyGame::new();
/// let mut solver = CfrBrSolver::new(game, SolverConfig::default());
///
/// for _ in 0..300 {
///     solver.evaluate_and_update_policy()?;
/// }
/// let policy = solver.average_policy();
/// ```
pub struct CfrBrSolver<G: Game> {
    /// The game being solved.
    game: G,

    /// Configuration for the solver.
    config: SolverConfig,

    /// Cumulative regrets and strategy sums.
    storage: RegretStorage,

    /// Iterations completed so far. Instance state, so independent solvers
    /// can coexist.
    iteration: u64,

    /// Statistics tracking.
    stats: SolverStats,
}

impl<G: Game> CfrBrSolver<G> {
    /// Create a new solver for the given game.
    pub fn new(game: G, config: SolverConfig) -> Self {
        Self {
            game,
            config,
            storage: RegretStorage::new(),
            iteration: 0,
            stats: SolverStats::new(),
        }
    }

    /// Create a solver with pre-allocated table capacity.
    ///
    /// Use this when you have an estimate of the game's information-set
    /// count to avoid reallocations during training.
    pub fn with_capacity(game: G, config: SolverConfig, capacity: usize) -> Self {
        Self {
            game,
            config,
            storage: RegretStorage::with_capacity(capacity),
            iteration: 0,
            stats: SolverStats::new(),
        }
    }

    /// Advance the solver by one iteration.
    ///
    /// Snapshots the current regret-matching policy, computes each player's
    /// pure best response against it, then walks the tree once per updated
    /// player: the updated player regret-matches while everyone else plays
    /// their best response.
    ///
    /// Errors from game-model contract violations propagate; the tables are
    /// only guaranteed consistent after this returns `Ok`.
    pub fn evaluate_and_update_policy(&mut self) -> Result<(), SolverError> {
        self.iteration += 1;
        trace!("iteration {}", self.iteration);

        // Pure best responses are computed once per iteration, against the
        // policy in effect when the iteration starts.
        let current = self.storage.current_policy();
        let mut responders: Responders = Vec::with_capacity(self.game.num_players());
        for player in 0..self.game.num_players() {
            let mut responder = BestResponse::new(&self.game, player, &current)?;
            responders.push(responder.pure_policy()?);
        }

        for player in 0..self.game.num_players() {
            // Regret matching takes effect between player updates, so each
            // updated player walks with a fresh policy snapshot.
            let snapshot = self.storage.current_policy();
            let root = self.game.initial_state();
            let reach = vec![1.0; self.game.num_players()];
            self.walk(&root, player, &snapshot, &responders, reach, 1.0)?;
        }
        Ok(())
    }

    /// Recursive tree walk updating regrets and strategy sums for `updated`.
    ///
    /// `reach` holds each player's probability of playing to this node under
    /// the profile in effect (current policy for `updated`, pure best
    /// response for everyone else); `chance_reach` is chance's contribution.
    /// Returns the node's expected value for the updated player.
    fn walk(
        &mut self,
        state: &G::State,
        updated: usize,
        current: &TabularPolicy,
        responders: &Responders,
        reach: Vec<f64>,
        chance_reach: f64,
    ) -> Result<f64, SolverError> {
        if self.game.is_terminal(state) {
            return Ok(self.game.returns(state)[updated]);
        }

        if self.game.is_chance(state) {
            let outcomes = self.game.chance_outcomes(state);
            if outcomes.is_empty() {
                return Err(SolverError::NoChanceOutcomes);
            }
            let mut value = 0.0;
            for (child, prob) in outcomes {
                value += prob
                    * self.walk(
                        &child,
                        updated,
                        current,
                        responders,
                        reach.clone(),
                        chance_reach * prob,
                    )?;
            }
            return Ok(value);
        }

        let actions = self.game.available_actions(state);
        let info_key = self.game.info_state(state).key();
        if actions.is_empty() {
            return Err(SolverError::NoLegalActions { info_key });
        }
        let acting = match self.game.current_player(state) {
            Some(player) => player,
            None => return Err(SolverError::NoLegalActions { info_key }),
        };

        if acting != updated {
            // Best-response mode: a pure strategy for this iteration. The
            // chosen action has probability 1, so the actor's reach is
            // unchanged; no regret or strategy sum is accumulated.
            let best = responders[acting].get(&info_key).copied().unwrap_or(0);
            let child = self.game.apply_action(state, &actions[best]);
            return self.walk(&child, updated, current, responders, reach, chance_reach);
        }

        // Regret-matching mode: value every action recursively under the
        // current mixed policy.
        self.storage.observe(&info_key, actions.len())?;
        let strategy = current.strategy(&info_key, actions.len());

        let mut action_values = vec![0.0; actions.len()];
        for (i, action) in actions.iter().enumerate() {
            let child = self.game.apply_action(state, action);
            let mut child_reach = reach.clone();
            child_reach[updated] *= strategy[i];
            action_values[i] =
                self.walk(&child, updated, current, responders, child_reach, chance_reach)?;
        }

        let node_value: f64 = strategy
            .iter()
            .zip(action_values.iter())
            .map(|(&p, &v)| p * v)
            .sum();

        // Counterfactual reach: chance times everyone except the updated
        // player.
        let cf_reach: f64 = chance_reach
            * reach
                .iter()
                .enumerate()
                .filter(|&(player, _)| player != updated)
                .map(|(_, &r)| r)
                .product::<f64>();

        let deltas: Vec<f64> = action_values
            .iter()
            .map(|&v| cf_reach * (v - node_value))
            .collect();
        self.storage.add_regrets(&info_key, &deltas);

        let weight = if self.config.linear_averaging {
            self.iteration as f64
        } else {
            1.0
        };
        self.storage
            .add_strategy_sum(&info_key, &strategy, reach[updated] * weight);

        Ok(node_value)
    }

    /// Run `iterations` update steps and refresh statistics.
    pub fn train(&mut self, iterations: u64) -> Result<&SolverStats, SolverError> {
        let start_time = Instant::now();

        for _ in 0..iterations {
            self.evaluate_and_update_policy()?;
        }

        self.stats.iterations = self.iteration;
        self.stats.info_sets = self.storage.num_info_sets();
        self.stats.elapsed_seconds += start_time.elapsed().as_secs_f64();
        self.stats.update_rate();
        info!(
            "trained {} iterations, {} info sets",
            self.stats.iterations, self.stats.info_sets
        );

        Ok(&self.stats)
    }

    /// Like [`train`](Self::train), with a progress bar.
    pub fn train_with_progress(&mut self, iterations: u64) -> Result<&SolverStats, SolverError> {
        let start_time = Instant::now();
        let bar = ProgressBar::new(iterations);

        for _ in 0..iterations {
            self.evaluate_and_update_policy()?;
            bar.inc(1);
        }
        bar.finish();

        self.stats.iterations = self.iteration;
        self.stats.info_sets = self.storage.num_info_sets();
        self.stats.elapsed_seconds += start_time.elapsed().as_secs_f64();
        self.stats.update_rate();

        Ok(&self.stats)
    }

    /// Compute NashConv of the current average policy and record it in the
    /// solver's statistics.
    pub fn measure_nash_conv(&mut self) -> Result<f64, SolverError> {
        let policy = self.average_policy();
        let conv = eval::nash_conv(&self.game, &policy)?;
        self.stats.record_nash_conv(self.iteration, conv);
        debug!("iteration {}: nash_conv = {}", self.iteration, conv);
        Ok(conv)
    }

    /// Snapshot of the average policy (normalized strategy sums).
    ///
    /// This is the policy that converges to equilibrium. A pure read with no
    /// side effects, valid after any number of iterations; before the first
    /// iteration it is empty and all lookups fall back to uniform, carrying
    /// no learned information.
    pub fn average_policy(&self) -> TabularPolicy {
        self.storage.average_policy()
    }

    /// Snapshot of the current regret-matching policy.
    ///
    /// Unlike the average policy, this does not converge on its own; it is
    /// exposed for diagnostics.
    pub fn current_policy(&self) -> TabularPolicy {
        self.storage.current_policy()
    }

    /// Get the current iteration count.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Get the number of information sets discovered so far.
    pub fn num_info_sets(&self) -> usize {
        self.storage.num_info_sets()
    }

    /// Get current statistics.
    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }

    /// Get reference to the storage for analysis.
    pub fn storage(&self) -> &RegretStorage {
        &self.storage
    }

    /// Get reference to the game.
    pub fn game(&self) -> &G {
        &self.game
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Export solver state for checkpointing.
    pub fn export_state(&self) -> SolverState {
        SolverState {
            iteration: self.iteration,
            storage: self.storage.export(),
            stats: self.stats.clone(),
        }
    }

    /// Import solver state from a checkpoint.
    pub fn import_state(&mut self, state: SolverState) {
        self.iteration = state.iteration;
        self.storage.import(state.storage);
        self.stats = state.stats;
    }

    /// Reset the solver to its initial state.
    pub fn reset(&mut self) {
        self.storage.clear();
        self.iteration = 0;
        self.stats = SolverStats::new();
    }
}

/// Serializable solver state for checkpointing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverState {
    /// Current iteration.
    pub iteration: u64,
    /// Storage export.
    pub storage: StorageExport,
    /// Statistics.
    pub stats: SolverStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfr::eval::{expected_returns, exploitability};
    use crate::games::kuhn::KuhnPoker;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_kuhn_cfr_br_convergence() {
        let _ = env_logger::builder().is_test(true).try_init();

        let game = KuhnPoker::new();
        let mut solver = CfrBrSolver::new(game.clone(), SolverConfig::default());

        for _ in 0..300 {
            solver.evaluate_and_update_policy().unwrap();
        }

        let policy = solver.average_policy();
        let values = expected_returns(&game, &policy).unwrap();

        // 1/18 is the Nash value of Kuhn poker for the second player.
        assert!(
            (values[0] + 1.0 / 18.0).abs() < 1e-3,
            "player 0 value {} should be near -1/18",
            values[0]
        );
        assert!(
            (values[1] - 1.0 / 18.0).abs() < 1e-3,
            "player 1 value {} should be near +1/18",
            values[1]
        );
        assert!((values[0] + values[1]).abs() < EPS, "values must be zero-sum");

        let expl = exploitability(&game, &policy).unwrap();
        assert!(expl >= -EPS, "exploitability {} must be non-negative", expl);
        assert!(expl <= 0.05, "exploitability {} should be small", expl);
    }

    #[test]
    fn test_determinism_across_solver_instances() {
        let game = KuhnPoker::new();
        let mut a = CfrBrSolver::new(game.clone(), SolverConfig::default());
        let mut b = CfrBrSolver::new(game, SolverConfig::default());

        a.train(50).unwrap();
        b.train(50).unwrap();

        let pa = a.average_policy();
        let pb = b.average_policy();
        assert_eq!(pa.len(), pb.len());
        for (key, probs) in pa.iter() {
            assert_eq!(probs, &pb.strategy(key, probs.len()), "mismatch at {}", key);
        }
    }

    #[test]
    fn test_info_set_growth_is_monotonic_and_bounded() {
        let game = KuhnPoker::new();
        let mut solver = CfrBrSolver::new(game, SolverConfig::default());

        let mut previous = 0;
        for _ in 0..20 {
            solver.evaluate_and_update_policy().unwrap();
            let count = solver.num_info_sets();
            assert!(count >= previous, "info set count must not shrink");
            previous = count;
        }
        // Kuhn poker has exactly 12 information sets.
        assert_eq!(solver.num_info_sets(), 12);
    }

    #[test]
    fn test_policies_are_valid_distributions() {
        let game = KuhnPoker::new();
        let mut solver = CfrBrSolver::new(game, SolverConfig::default());
        solver.train(25).unwrap();

        for policy in [solver.current_policy(), solver.average_policy()] {
            for (key, probs) in policy.iter() {
                let total: f64 = probs.iter().sum();
                assert!(
                    (total - 1.0).abs() < EPS,
                    "distribution at {} sums to {}",
                    key,
                    total
                );
                assert!(probs.iter().all(|&p| p >= 0.0));
            }
        }
    }

    #[test]
    fn test_average_policy_before_training_is_uniform() {
        let game = KuhnPoker::new();
        let solver = CfrBrSolver::new(game, SolverConfig::default());

        let policy = solver.average_policy();
        assert!(policy.is_empty());
        assert_eq!(policy.strategy("0:", 2), vec![0.5, 0.5]);
    }

    #[test]
    fn test_checkpoint_round_trip_preserves_trajectory() {
        let game = KuhnPoker::new();
        let mut original = CfrBrSolver::new(game.clone(), SolverConfig::default());
        original.train(10).unwrap();

        let json = serde_json::to_string(&original.export_state()).unwrap();
        let mut restored = CfrBrSolver::new(game, SolverConfig::default());
        restored.import_state(serde_json::from_str(&json).unwrap());
        assert_eq!(restored.iteration(), 10);

        original.train(10).unwrap();
        restored.train(10).unwrap();

        let pa = original.average_policy();
        let pb = restored.average_policy();
        for (key, probs) in pa.iter() {
            assert_eq!(probs, &pb.strategy(key, probs.len()));
        }
    }

    #[test]
    fn test_linear_averaging_also_converges() {
        let game = KuhnPoker::new();
        let config = SolverConfig::default().with_linear_averaging(true);
        let mut solver = CfrBrSolver::new(game.clone(), config);
        solver.train(300).unwrap();

        let expl = exploitability(&game, &solver.average_policy()).unwrap();
        assert!(expl >= -EPS);
        assert!(expl <= 0.05, "exploitability {} should be small", expl);
    }

    #[test]
    fn test_measure_nash_conv_records_history() {
        let game = KuhnPoker::new();
        let mut solver = CfrBrSolver::new(game, SolverConfig::default());
        solver.train(20).unwrap();

        let conv = solver.measure_nash_conv().unwrap();
        assert!(conv.is_finite());
        assert_eq!(solver.stats().nash_conv, Some(conv));
        assert_eq!(solver.stats().nash_conv_history.len(), 1);
    }
}
