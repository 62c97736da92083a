use serde::Serialize;

use crate::options::OptionPair;

/// Outcome of one benchmark.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkResult {
    pub description: String,
    pub scene: String,
    pub options: Vec<OptionPair>,
    pub frames: u64,
    pub elapsed_secs: f64,
    pub average_fps: f64,
    /// `average_fps` truncated to an integer; what this benchmark adds to the
    /// run's score.
    pub score: u32,
    /// False when the run was cancelled while this benchmark was in flight.
    pub completed: bool,
    pub timestamp_ms: u64,
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub results: Vec<BenchmarkResult>,
    pub score: u32,
    pub cancelled: bool,
}

impl RunSummary {
    pub fn push(&mut self, result: BenchmarkResult) {
        self.score = self.score.saturating_add(result.score);
        self.results.push(result);
    }
}

/// Truncate an average FPS to its score contribution. Negative and NaN
/// values count as zero.
pub fn fps_score(average_fps: f64) -> u32 {
    // `as` truncates toward zero and saturates; NaN becomes 0.
    average_fps as u32
}
