//! Evaluation utilities: expected returns, best-response values,
//! exploitability, and NashConv.
//!
//! These are free functions over `(game, policy)` snapshots. They never
//! mutate solver state, so they can safely run between update calls.

use crate::cfr::best_response::BestResponse;
use crate::cfr::error::SolverError;
use crate::cfr::game::{Game, InfoState};
use crate::cfr::policy::TabularPolicy;

/// Expected payoff vector for all players when everyone plays `policy`.
///
/// Deterministic: the full tree is walked, chance nodes are weighted by
/// their exact outcome probabilities, and decision nodes are weighted by
/// the policy's action distribution.
pub fn expected_returns<G: Game>(
    game: &G,
    policy: &TabularPolicy,
) -> Result<Vec<f64>, SolverError> {
    let root = game.initial_state();
    returns_walk(game, policy, &root)
}

/// Expected payoff for a single player when everyone plays `policy`.
pub fn expected_return<G: Game>(
    game: &G,
    policy: &TabularPolicy,
    player: usize,
) -> Result<f64, SolverError> {
    debug_assert!(player < game.num_players(), "player index out of range");
    Ok(expected_returns(game, policy)?[player])
}

fn returns_walk<G: Game>(
    game: &G,
    policy: &TabularPolicy,
    state: &G::State,
) -> Result<Vec<f64>, SolverError> {
    if game.is_terminal(state) {
        return Ok(game.returns(state));
    }

    if game.is_chance(state) {
        let outcomes = game.chance_outcomes(state);
        if outcomes.is_empty() {
            return Err(SolverError::NoChanceOutcomes);
        }
        let mut values = vec![0.0; game.num_players()];
        for (child, prob) in outcomes {
            let child_values = returns_walk(game, policy, &child)?;
            for (v, c) in values.iter_mut().zip(child_values.iter()) {
                *v += prob * c;
            }
        }
        return Ok(values);
    }

    let actions = game.available_actions(state);
    let info_key = game.info_state(state).key();
    if actions.is_empty() {
        return Err(SolverError::NoLegalActions { info_key });
    }

    let strategy = policy.strategy(&info_key, actions.len());
    let mut values = vec![0.0; game.num_players()];
    for (action, &prob) in actions.iter().zip(strategy.iter()) {
        if prob == 0.0 {
            continue;
        }
        let child = game.apply_action(state, action);
        let child_values = returns_walk(game, policy, &child)?;
        for (v, c) in values.iter_mut().zip(child_values.iter()) {
            *v += prob * c;
        }
    }
    Ok(values)
}

/// Maximum value `player` can achieve when all other players and chance
/// are fixed to `policy`.
pub fn best_response_value<G: Game>(
    game: &G,
    policy: &TabularPolicy,
    player: usize,
) -> Result<f64, SolverError> {
    BestResponse::new(game, player, policy)?.value()
}

/// Sum over players of the best-response gap against `policy`.
///
/// `NashConv = Σ_p (BestResponseValue(p) − value of p under policy)`.
/// Zero exactly at a Nash equilibrium; defined for any player count.
pub fn nash_conv<G: Game>(game: &G, policy: &TabularPolicy) -> Result<f64, SolverError> {
    let values = expected_returns(game, policy)?;
    let mut total = 0.0;
    for player in 0..game.num_players() {
        total += best_response_value(game, policy, player)? - values[player];
    }
    Ok(total)
}

/// Distance of `policy` from equilibrium in a two-player zero-sum game.
///
/// Equal to `NashConv / 2`. Non-negative (up to floating error) for any
/// policy; zero only at a Nash equilibrium.
///
/// # Errors
/// Returns [`SolverError::InvalidPlayerCount`] if the game does not have
/// exactly two players; the zero-sum formula would produce a misleading
/// number otherwise.
pub fn exploitability<G: Game>(game: &G, policy: &TabularPolicy) -> Result<f64, SolverError> {
    if game.num_players() != 2 {
        return Err(SolverError::InvalidPlayerCount {
            expected: 2,
            found: game.num_players(),
        });
    }
    Ok(nash_conv(game, policy)? / 2.0)
}
