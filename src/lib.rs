//! # cfr-br
//!
//! An exact, tabular CFR-BR (Counterfactual Regret Minimization against a
//! Best Responder) solver for two-player zero-sum extensive-form games with
//! imperfect information.
//!
//! ## Features
//!
//! - **Generic engine**: works with any game implementing the [`cfr::Game`]
//!   trait; the tree is walked on demand and never materialized
//! - **Exact traversal**: chance outcomes are enumerated with their
//!   probabilities, nothing is sampled, results are deterministic
//! - **Diagnostics**: expected returns, best-response values,
//!   exploitability and NashConv
//! - **Checkpointing**: serializable solver state
//!
//! ## Quick Start
//!
//! ```
//! use cfr_br::cfr::{exploitability, CfrBrSolver, SolverConfig};
//! use cfr_br::games::kuhn::KuhnPoker;
//!
//! let game = KuhnPoker::new();
//! let mut solver = CfrBrSolver::new(game.clone(), SolverConfig::default());
//!
//! for _ in 0..300 {
//!     solver.evaluate_and_update_policy().unwrap();
//! }
//!
//! let policy = solver.average_policy();
//! let expl = exploitability(&game, &policy).unwrap();
//! assert!(expl < 0.1);
//! ```
//!
//! ## Modules
//!
//! - [`cfr`]: the solver, the game-model boundary, and evaluation utilities
//! - [`games`]: validation games (Kuhn poker, Leduc poker)

#![warn(missing_docs)]

pub mod cfr;

/// Game implementations module.
///
/// Contains the validation games (Kuhn poker, Leduc poker) used to test the
/// solver against known equilibrium values.
pub mod games;

// Re-export commonly used types at crate root for convenience
pub use cfr::{
    Action, CfrBrSolver, Game, GameState, InfoState, SolverConfig, SolverError, SolverStats,
    TabularPolicy,
};
