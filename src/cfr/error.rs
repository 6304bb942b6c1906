//! Error types for the CFR-BR solver.

/// Errors surfaced by the solver and the evaluation utilities.
///
/// Contract violations by the game model are fatal: the solver refuses to
/// proceed with undefined distributions rather than silently producing
/// garbage. Numeric degeneracy (all-nonpositive regret) is handled locally
/// by the uniform fallback and is never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    /// A non-terminal, non-chance decision state reported no legal actions.
    NoLegalActions {
        /// Key of the offending information set.
        info_key: String,
    },

    /// An information-set key was observed with two different legal-action
    /// counts. This means the key collides across states that are
    /// distinguishable to the acting player.
    ActionCountMismatch {
        /// Key of the offending information set.
        info_key: String,
        /// Action count recorded on first visit.
        expected: usize,
        /// Action count observed now.
        found: usize,
    },

    /// A chance node reported an empty outcome distribution.
    NoChanceOutcomes,

    /// An operation that requires a two-player zero-sum game was invoked on
    /// a game with a different player count.
    InvalidPlayerCount {
        /// Number of players the operation supports.
        expected: usize,
        /// Number of players the game reported.
        found: usize,
    },
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::NoLegalActions { info_key } => {
                write!(f, "no legal actions at decision info set {:?}", info_key)
            }
            SolverError::ActionCountMismatch {
                info_key,
                expected,
                found,
            } => write!(
                f,
                "info set key {:?} seen with {} legal actions, previously {} \
                 (key collision across distinguishable states)",
                info_key, found, expected
            ),
            SolverError::NoChanceOutcomes => {
                write!(f, "chance node reported an empty outcome distribution")
            }
            SolverError::InvalidPlayerCount { expected, found } => write!(
                f,
                "operation requires a {}-player game, got {} players",
                expected, found
            ),
        }
    }
}

impl std::error::Error for SolverError {}
