//! Validation games for the CFR-BR solver.
//!
//! Both games have small trees and well-studied equilibrium values, which
//! makes them the standard correctness checks for CFR-family solvers.

pub mod kuhn;
pub mod leduc;
