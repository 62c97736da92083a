#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use scenemark_core::display::{NoEvents, ScriptedEvents};
use scenemark_core::surface::RenderTarget;
use scenemark_core::{
    ManualClock, OptionError, Scene, SceneCore, SceneRegistry, SoftwareDisplay,
};

pub type Log = Rc<RefCell<Vec<String>>>;

/// A scene that runs for a fixed number of frames and reports a fixed FPS.
///
/// Both can be overridden per benchmark through the `frames` and `fps`
/// options. Every lifecycle call is appended to a shared log as
/// `"<scene> <call>"`.
pub struct StubScene {
    core: SceneCore,
    log: Log,
    default_frames: u64,
    frames_to_run: u64,
    updates: u64,
    running: bool,
}

impl StubScene {
    pub fn new(name: &'static str, frames: u64, fps: f64, log: &Log) -> Self {
        let mut core = SceneCore::new(name, Rc::new(ManualClock::new()));
        core.options_mut()
            .declare("fps", &fps.to_string(), "Reported average FPS");
        core.options_mut()
            .declare("texture-filter", "nearest", "Any string is accepted");

        Self {
            core,
            log: Rc::clone(log),
            default_frames: frames,
            frames_to_run: 0,
            updates: 0,
            running: false,
        }
    }

    fn record(&self, call: impl AsRef<str>) {
        self.log
            .borrow_mut()
            .push(format!("{} {}", self.core.name(), call.as_ref()));
    }
}

impl Scene for StubScene {
    fn core(&self) -> &SceneCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SceneCore {
        &mut self.core
    }

    fn apply_option(&mut self, name: &str, value: &str) -> Result<(), OptionError> {
        self.record(format!("option {name}={value}"));
        self.core.options_mut().set(name, value)
    }

    fn start(&mut self) {
        let frames = self.core.options().value_u64("frames");
        self.frames_to_run = if frames > 0 { frames } else { self.default_frames };
        self.updates = 0;
        self.running = self.frames_to_run > 0;
        self.record("start");
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn draw(&mut self, _target: &mut dyn RenderTarget) {
        self.record("draw");
    }

    fn update(&mut self) {
        self.updates += 1;
        if self.updates >= self.frames_to_run {
            self.running = false;
        }
        self.record("update");
    }

    fn average_fps(&self) -> f64 {
        self.core.options().value_f64("fps")
    }

    fn frames(&self) -> u64 {
        self.updates
    }

    fn teardown(&mut self) {
        self.running = false;
        self.record("teardown");
    }
}

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// Number of log entries equal to `entry`.
pub fn count(log: &Log, entry: &str) -> usize {
    log.borrow().iter().filter(|e| *e == entry).count()
}

pub fn registry_with(stubs: Vec<StubScene>) -> SceneRegistry {
    let mut registry = SceneRegistry::new();
    for stub in stubs {
        registry.register_scene(Box::new(stub));
    }
    registry
}

pub fn quiet_display() -> SoftwareDisplay {
    SoftwareDisplay::new(8, 8, Box::new(NoEvents)).unwrap()
}

pub fn scripted_display(events: ScriptedEvents) -> SoftwareDisplay {
    SoftwareDisplay::new(8, 8, Box::new(events)).unwrap()
}
