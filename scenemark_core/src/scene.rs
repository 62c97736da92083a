//! The scene contract and the frame accounting shared by scene types.
//!
//! A scene is split into:
//! - configuration: named options applied before a run ([`Scene::apply_option`]),
//! - a **start** step that builds option-dependent state and resets timing,
//! - a **draw/update** pair called once per frame by the runner.
//!
//! Most scenes only implement [`Scene::core`], [`Scene::core_mut`] and
//! [`Scene::draw`] and let [`SceneCore`] do the bookkeeping.

use std::fmt::Write as _;
use std::rc::Rc;

use crate::clock::Clock;
use crate::error::OptionError;
use crate::options::SceneOptions;
use crate::surface::RenderTarget;

pub const DURATION_OPTION: &str = "duration";
pub const FRAMES_OPTION: &str = "frames";

pub trait Scene {
    fn core(&self) -> &SceneCore;
    fn core_mut(&mut self) -> &mut SceneCore;

    /// Render one frame.
    fn draw(&mut self, target: &mut dyn RenderTarget);

    fn name(&self) -> &str {
        self.core().name()
    }

    fn options(&self) -> &SceneOptions {
        self.core().options()
    }

    fn apply_option(&mut self, name: &str, value: &str) -> Result<(), OptionError> {
        self.core_mut().options_mut().set(name, value)
    }

    fn reset_options(&mut self) {
        self.core_mut().options_mut().reset();
    }

    /// Build whatever state depends on the applied options. Called by
    /// [`Scene::start`] before timing begins.
    fn prepare(&mut self) {}

    /// Drop state built by [`Scene::prepare`].
    fn release(&mut self) {}

    fn start(&mut self) {
        self.prepare();
        self.core_mut().start();
    }

    fn is_running(&self) -> bool {
        self.core().is_running()
    }

    /// Advance time and frame statistics; may mark the scene finished.
    fn update(&mut self) {
        self.core_mut().update();
    }

    fn average_fps(&self) -> f64 {
        self.core().average_fps()
    }

    fn frames(&self) -> u64 {
        self.core().frames()
    }

    fn elapsed_secs(&self) -> f64 {
        self.core().elapsed_secs()
    }

    /// One-line summary of what is about to run.
    fn info_string(&self) -> String {
        self.core().info_string()
    }

    fn teardown(&mut self) {
        self.core_mut().stop();
        self.release();
    }
}

/// Options and frame statistics for one scene.
pub struct SceneCore {
    name: &'static str,
    options: SceneOptions,
    clock: Rc<dyn Clock>,
    running: bool,
    start_time: f64,
    last_update: f64,
    frames: u64,
    duration: f64,
    frame_budget: u64,
}

impl SceneCore {
    /// Create the core with the options every scene shares already declared.
    pub fn new(name: &'static str, clock: Rc<dyn Clock>) -> Self {
        let mut options = SceneOptions::new();
        options.declare_number(DURATION_OPTION, "10.0", "The duration of each benchmark in seconds");
        options.declare_count(
            FRAMES_OPTION,
            "0",
            "Stop after this many frames (0 means no frame limit)",
        );

        Self {
            name,
            options,
            clock,
            running: false,
            start_time: 0.0,
            last_update: 0.0,
            frames: 0,
            duration: 0.0,
            frame_budget: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn options(&self) -> &SceneOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut SceneOptions {
        &mut self.options
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Seconds between start and the most recent update.
    pub fn elapsed_secs(&self) -> f64 {
        (self.last_update - self.start_time).max(0.0)
    }

    /// Reset the accumulator and mark the scene running.
    pub fn start(&mut self) {
        self.duration = self.options.value_f64(DURATION_OPTION);
        self.frame_budget = self.options.value_u64(FRAMES_OPTION);
        self.start_time = self.clock.now_secs();
        self.last_update = self.start_time;
        self.frames = 0;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn update(&mut self) {
        let now = self.clock.now_secs();
        self.frames += 1;
        self.last_update = now;

        let out_of_time = now - self.start_time >= self.duration;
        let out_of_frames = self.frame_budget > 0 && self.frames >= self.frame_budget;
        if out_of_time || out_of_frames {
            self.running = false;
        }
    }

    pub fn average_fps(&self) -> f64 {
        let elapsed = self.elapsed_secs();
        if elapsed > 0.0 {
            self.frames as f64 / elapsed
        } else {
            0.0
        }
    }

    /// `[name] opt=value:opt=value` for every option that differs from its
    /// default, `[name] <default>` when none do.
    pub fn info_string(&self) -> String {
        let mut info = format!("[{}] ", self.name);
        let changed: Vec<_> = self
            .options
            .sorted()
            .into_iter()
            .filter(|o| !o.is_default())
            .collect();

        if changed.is_empty() {
            info.push_str("<default>");
        }
        for (i, option) in changed.iter().enumerate() {
            if i > 0 {
                info.push(':');
            }
            let _ = write!(info, "{}={}", option.name, option.value);
        }
        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn core_with_clock() -> (SceneCore, Rc<ManualClock>) {
        let clock = Rc::new(ManualClock::new());
        (SceneCore::new("probe", clock.clone()), clock)
    }

    #[test]
    fn runs_until_duration_elapses() {
        let (mut core, clock) = core_with_clock();
        core.options_mut().set(DURATION_OPTION, "1.0").unwrap();
        core.start();

        for _ in 0..3 {
            clock.advance(0.25);
            core.update();
            assert!(core.is_running());
        }
        clock.advance(0.25);
        core.update();
        assert!(!core.is_running());
        assert_eq!(core.frames(), 4);
        assert_eq!(core.average_fps(), 4.0);
    }

    #[test]
    fn frame_budget_stops_early() {
        let (mut core, clock) = core_with_clock();
        core.options_mut().set(FRAMES_OPTION, "2").unwrap();
        core.start();
        clock.advance(0.1);
        core.update();
        assert!(core.is_running());
        clock.advance(0.1);
        core.update();
        assert!(!core.is_running());
    }

    #[test]
    fn unbounded_durations_are_refused() {
        let (mut core, clock) = core_with_clock();
        for value in ["inf", "NaN", "-2"] {
            let err = core.options_mut().set(DURATION_OPTION, value).unwrap_err();
            assert!(matches!(
                err,
                OptionError::Invalid { ref option, .. } if option == DURATION_OPTION
            ));
        }
        core.options_mut().set(DURATION_OPTION, "1").unwrap();
        core.options_mut().set(DURATION_OPTION, "inf").unwrap_err();

        core.start();
        clock.advance(1e6);
        core.update();
        assert!(!core.is_running());
        assert_eq!(core.frames(), 1);
    }

    #[test]
    fn start_resets_the_accumulator() {
        let (mut core, clock) = core_with_clock();
        core.start();
        clock.advance(1.0);
        core.update();
        core.stop();

        core.start();
        assert_eq!(core.frames(), 0);
        assert_eq!(core.average_fps(), 0.0);
        assert!(core.is_running());
    }

    #[test]
    fn info_string_lists_changed_options() {
        let (mut core, _) = core_with_clock();
        assert_eq!(core.info_string(), "[probe] <default>");
        core.options_mut().set(FRAMES_OPTION, "5").unwrap();
        core.options_mut().set(DURATION_OPTION, "2").unwrap();
        assert_eq!(core.info_string(), "[probe] duration=2:frames=5");
    }
}
