//! CFR-BR solver module.
//!
//! This module provides an exact, tabular implementation of CFR-BR
//! (Counterfactual Regret Minimization against a Best Responder) for
//! extensive-form games with imperfect information.
//!
//! # Overview
//!
//! CFR-BR is an iterative equilibrium-finding algorithm:
//! 1. Each iteration, one player's strategy is updated with regret matching
//!    while every other player plays a pure best response to the current
//!    policy; the roles rotate over the players within the iteration.
//! 2. Counterfactual regrets and strategy sums accumulate per information
//!    set during an exact, unsampled walk of the full game tree.
//! 3. The average policy (normalized strategy sums) converges to a Nash
//!    equilibrium in two-player zero-sum games.
//!
//! # Usage
//!
//! 1. Implement the [`Game`] trait for your game
//! 2. Create a [`CfrBrSolver`] with the game and a [`SolverConfig`]
//! 3. Call [`CfrBrSolver::evaluate_and_update_policy`] repeatedly (or
//!    [`CfrBrSolver::train`])
//! 4. Read the result with [`CfrBrSolver::average_policy`] and measure it
//!    with [`exploitability`] / [`nash_conv`]
//!
//! # Theory
//!
//! **Regret matching**: strategy proportional to positive cumulative regret.
//! ```text
//! Strategy(a) = max(0, CumulativeRegret(a)) / Σ max(0, CumulativeRegret(a'))
//! ```
//! falling back to uniform when every cumulative regret is non-positive.
//!
//! **Convergence**: average regret decreases as O(1/sqrt(T)); training
//! against a best responder bounds the average policy's exploitability
//! directly, because each iteration already faces the worst case.
//!
//! # References
//!
//! - Zinkevich, M., et al. "Regret Minimization in Games with Incomplete
//!   Information" (2007)
//! - Johanson, M., et al. "Finding Optimal Abstract Strategies in
//!   Extensive-Form Games" (2012) — CFR-BR

pub mod best_response;
pub mod config;
pub mod error;
pub mod eval;
pub mod game;
pub mod policy;
pub mod solver;
pub mod storage;

// Re-export main types for convenient access
pub use best_response::BestResponse;
pub use config::{NashConvPoint, SolverConfig, SolverStats};
pub use error::SolverError;
pub use eval::{best_response_value, expected_return, expected_returns, exploitability, nash_conv};
pub use game::{Action, Game, GameState, InfoState};
pub use policy::TabularPolicy;
pub use solver::{CfrBrSolver, SolverState};
pub use storage::{RegretStorage, StorageExport};
