//! Best-response computation against a fixed policy profile.
//!
//! A best response must be chosen per information set, not per state: the
//! responder cannot condition on information it does not have. This module
//! therefore works in two passes. A collection pass walks the full tree and
//! gathers, for every information set of the responder, its member states
//! together with the reach probability contributed by chance and the other
//! players. An evaluation pass then picks, lazily and with memoization, the
//! action maximizing the counterfactual value summed over those members
//! (ties broken by the first maximal action in action order).
//!
//! The solver uses the resulting pure policy for the best-responder role of
//! each iteration; the evaluation utilities use the root value.

use log::debug;
use rustc_hash::FxHashMap;

use crate::cfr::error::SolverError;
use crate::cfr::game::{Game, InfoState};
use crate::cfr::policy::TabularPolicy;

/// Best response for one player against a fixed policy for everyone else.
pub struct BestResponse<'a, G: Game> {
    game: &'a G,
    player: usize,
    policy: &'a TabularPolicy,

    /// Member states of each responder info set, with the counterfactual
    /// (chance times opponents) reach probability of each member.
    info_sets: FxHashMap<String, Vec<(G::State, f64)>>,

    /// Memoized best action index per responder info set.
    best_actions: FxHashMap<String, usize>,
}

impl<'a, G: Game> BestResponse<'a, G> {
    /// Build the responder for `player` against `policy`.
    ///
    /// Walks the full game tree once to collect the responder's information
    /// sets. Fails on game-model contract violations.
    pub fn new(game: &'a G, player: usize, policy: &'a TabularPolicy) -> Result<Self, SolverError> {
        let mut responder = Self {
            game,
            player,
            policy,
            info_sets: FxHashMap::default(),
            best_actions: FxHashMap::default(),
        };
        let root = game.initial_state();
        responder.collect(&root, 1.0)?;
        debug!(
            "best response for player {}: {} info sets collected",
            player,
            responder.info_sets.len()
        );
        Ok(responder)
    }

    /// Collection pass: record every responder info set member with its
    /// counterfactual reach. The responder's own actions do not scale the
    /// counterfactual reach; opponent actions and chance do.
    fn collect(&mut self, state: &G::State, cf_reach: f64) -> Result<(), SolverError> {
        if self.game.is_terminal(state) {
            return Ok(());
        }

        if self.game.is_chance(state) {
            let outcomes = self.game.chance_outcomes(state);
            if outcomes.is_empty() {
                return Err(SolverError::NoChanceOutcomes);
            }
            for (child, prob) in outcomes {
                self.collect(&child, cf_reach * prob)?;
            }
            return Ok(());
        }

        let actions = self.game.available_actions(state);
        let info_key = self.game.info_state(state).key();
        if actions.is_empty() {
            return Err(SolverError::NoLegalActions { info_key });
        }

        let acting = self.game.current_player(state);
        if acting == Some(self.player) {
            self.info_sets
                .entry(info_key)
                .or_default()
                .push((state.clone(), cf_reach));
            for action in &actions {
                let child = self.game.apply_action(state, action);
                self.collect(&child, cf_reach)?;
            }
        } else {
            let strategy = self.policy.strategy(&info_key, actions.len());
            for (action, &prob) in actions.iter().zip(strategy.iter()) {
                let child = self.game.apply_action(state, action);
                self.collect(&child, cf_reach * prob)?;
            }
        }
        Ok(())
    }

    /// Value of the best response from the root of the game.
    pub fn value(&mut self) -> Result<f64, SolverError> {
        let root = self.game.initial_state();
        self.state_value(&root)
    }

    /// Best action index for every responder info set discovered in the
    /// collection pass.
    ///
    /// Info sets the fixed opponents never reach still get an action (the
    /// argmax over zero-weighted values degenerates to the first action),
    /// so the returned map is total over the responder's info sets.
    pub fn pure_policy(&mut self) -> Result<FxHashMap<String, usize>, SolverError> {
        let keys: Vec<String> = self.info_sets.keys().cloned().collect();
        for key in &keys {
            self.best_action(key)?;
        }
        Ok(self.best_actions.clone())
    }

    /// Expected value for the responder, with the responder playing its
    /// best response and everyone else playing the fixed policy.
    fn state_value(&mut self, state: &G::State) -> Result<f64, SolverError> {
        if self.game.is_terminal(state) {
            return Ok(self.game.returns(state)[self.player]);
        }

        if self.game.is_chance(state) {
            let outcomes = self.game.chance_outcomes(state);
            if outcomes.is_empty() {
                return Err(SolverError::NoChanceOutcomes);
            }
            let mut value = 0.0;
            for (child, prob) in outcomes {
                value += prob * self.state_value(&child)?;
            }
            return Ok(value);
        }

        let actions = self.game.available_actions(state);
        let info_key = self.game.info_state(state).key();
        if actions.is_empty() {
            return Err(SolverError::NoLegalActions { info_key });
        }

        if self.game.current_player(state) == Some(self.player) {
            let best = self.best_action(&info_key)?;
            let child = self.game.apply_action(state, &actions[best]);
            self.state_value(&child)
        } else {
            let strategy = self.policy.strategy(&info_key, actions.len());
            let mut value = 0.0;
            for (action, &prob) in actions.iter().zip(strategy.iter()) {
                if prob == 0.0 {
                    continue;
                }
                let child = self.game.apply_action(state, action);
                value += prob * self.state_value(&child)?;
            }
            Ok(value)
        }
    }

    /// Argmax over counterfactual action values summed across the info
    /// set's member states. Memoized; first maximal action wins ties.
    fn best_action(&mut self, info_key: &str) -> Result<usize, SolverError> {
        if let Some(&action) = self.best_actions.get(info_key) {
            return Ok(action);
        }

        let members = self
            .info_sets
            .get(info_key)
            .cloned()
            .unwrap_or_default();

        let mut best = 0;
        let mut best_value = f64::NEG_INFINITY;
        if let Some((first, _)) = members.first() {
            let actions = self.game.available_actions(first);
            for (i, _) in actions.iter().enumerate() {
                let mut value = 0.0;
                for (member, cf_reach) in &members {
                    let member_actions = self.game.available_actions(member);
                    if member_actions.len() != actions.len() {
                        return Err(SolverError::ActionCountMismatch {
                            info_key: info_key.to_string(),
                            expected: actions.len(),
                            found: member_actions.len(),
                        });
                    }
                    let child = self.game.apply_action(member, &member_actions[i]);
                    value += cf_reach * self.state_value(&child)?;
                }
                if value > best_value {
                    best_value = value;
                    best = i;
                }
            }
        }

        self.best_actions.insert(info_key.to_string(), best);
        Ok(best)
    }
}
