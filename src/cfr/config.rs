//! Configuration options and statistics for the CFR-BR solver.

use serde::{Deserialize, Serialize};

/// Configuration for the CFR-BR solver.
///
/// CFR-BR has far fewer knobs than sampled CFR variants: the traversal is
/// exact and deterministic, so the only real choice is how strategy sums
/// are weighted when forming the average policy.
///
/// # Example
/// ```
/// use cfr_br::cfr::SolverConfig;
///
/// let config = SolverConfig::default();
/// assert!(!config.linear_averaging); // unweighted averaging by default
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Weight iteration `t`'s strategy-sum contribution by `t`.
    ///
    /// Linear averaging discounts early, noisy iterations and often speeds
    /// up convergence of the average policy. Disabled by default, matching
    /// the canonical algorithm.
    pub linear_averaging: bool,
}

impl SolverConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set whether to use linear averaging.
    pub fn with_linear_averaging(mut self, enable: bool) -> Self {
        self.linear_averaging = enable;
        self
    }
}

/// Statistics tracked across solver iterations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolverStats {
    /// Total number of iterations completed.
    pub iterations: u64,

    /// Number of unique information sets discovered.
    pub info_sets: usize,

    /// Total time spent training (in seconds).
    pub elapsed_seconds: f64,

    /// Iterations per second.
    pub iterations_per_second: f64,

    /// Most recent NashConv measurement (if recorded).
    pub nash_conv: Option<f64>,

    /// History of NashConv measurements.
    pub nash_conv_history: Vec<NashConvPoint>,
}

/// A single NashConv measurement at a specific iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NashConvPoint {
    /// Iteration number when this measurement was taken.
    pub iteration: u64,
    /// NashConv value (sum of best-response gaps over players).
    pub nash_conv: f64,
}

impl SolverStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update iterations per second based on elapsed time.
    pub fn update_rate(&mut self) {
        if self.elapsed_seconds > 0.0 {
            self.iterations_per_second = self.iterations as f64 / self.elapsed_seconds;
        }
    }

    /// Record a NashConv measurement.
    pub fn record_nash_conv(&mut self, iteration: u64, nash_conv: f64) {
        self.nash_conv = Some(nash_conv);
        self.nash_conv_history.push(NashConvPoint {
            iteration,
            nash_conv,
        });
    }
}
