use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::benchmark::{Benchmark, OptionPolicy};
use crate::clock::unix_timestamp_ms;
use crate::display::{Display, Event};
use crate::error::Result;
use crate::registry::SceneRegistry;
use crate::result::{BenchmarkResult, RunSummary, fps_score};

const RULE: &str = "=======================================================";

/// Shared "stop now" flag for a run.
///
/// Set by the runner when the display reports a quit request, or by anything
/// else holding a clone. Checked once per frame, before drawing.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BenchRunner {
    policy: OptionPolicy,
    cancel: CancelToken,
}

impl BenchRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: OptionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn policy(&self) -> OptionPolicy {
        self.policy
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Run `benchmarks` in order and write a human-readable report to `out`.
    ///
    /// Stops at the first benchmark that fails to set up, returning its error.
    /// A quit request stops the run after tearing down the benchmark in flight;
    /// the returned summary then has `cancelled` set.
    pub fn run(
        &self,
        benchmarks: &[Benchmark],
        registry: &mut SceneRegistry,
        display: &mut dyn Display,
        out: &mut dyn Write,
    ) -> Result<RunSummary> {
        writeln!(out, "{RULE}")?;
        writeln!(out, "    scenemark {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(out, "{RULE}")?;
        writeln!(out, "{}", display.info())?;
        writeln!(out, "{RULE}")?;

        let mut summary = RunSummary::default();
        let mut events = Vec::new();

        for bench in benchmarks {
            if self.cancel.is_cancelled() {
                break;
            }
            let result = self.run_one(bench, registry, display, &mut events, out)?;
            summary.push(result);
        }
        summary.cancelled = self.cancel.is_cancelled();

        writeln!(out, "{RULE}")?;
        writeln!(out, "                                  scenemark Score: {} ", summary.score)?;
        writeln!(out, "{RULE}")?;
        out.flush()?;

        tracing::info!(
            score = summary.score,
            benchmarks = summary.results.len(),
            cancelled = summary.cancelled,
            "run finished"
        );
        Ok(summary)
    }

    fn run_one(
        &self,
        bench: &Benchmark,
        registry: &mut SceneRegistry,
        display: &mut dyn Display,
        events: &mut Vec<Event>,
        out: &mut dyn Write,
    ) -> Result<BenchmarkResult> {
        let mut scene = bench.setup_scene_with(registry, self.policy)?;
        write!(out, "{}", scene.info_string())?;
        out.flush()?;

        while scene.is_running() && self.keep_running(display, events) {
            display.clear();
            scene.draw(display.target());
            scene.update();
            display.present();
        }

        let average_fps = scene.average_fps();
        writeln!(out, " FPS: {average_fps:.2}")?;

        let result = BenchmarkResult {
            description: bench.description(),
            scene: bench.scene_name().to_string(),
            options: bench.options().to_vec(),
            frames: scene.frames(),
            elapsed_secs: scene.elapsed_secs(),
            average_fps,
            score: fps_score(average_fps),
            completed: !self.cancel.is_cancelled(),
            timestamp_ms: unix_timestamp_ms(),
        };
        bench.teardown_scene(scene);

        tracing::info!(
            benchmark = %result.description,
            frames = result.frames,
            fps = result.average_fps,
            completed = result.completed,
            "benchmark finished"
        );
        Ok(result)
    }

    /// Drain pending input, cancelling the run on a quit request.
    fn keep_running(&self, display: &mut dyn Display, events: &mut Vec<Event>) -> bool {
        events.clear();
        display.poll_events(events);

        if let Some(event) = events.iter().find(|e| e.is_termination()) {
            tracing::debug!(?event, "termination requested");
            self.cancel.cancel();
        }
        !self.cancel.is_cancelled()
    }
}
