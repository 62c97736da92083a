//! The display surface the runner presents frames to, and the input events
//! it polls between frames.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use crate::error::{BenchError, Result};
use crate::surface::{Framebuffer, RenderTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Char(char),
    Other,
}

/// Input observed between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The user asked the whole program to stop.
    Quit,
    KeyDown(Key),
}

impl Event {
    /// Whether this event requests that the run stop.
    pub fn is_termination(&self) -> bool {
        matches!(self, Event::Quit | Event::KeyDown(Key::Escape))
    }
}

/// Where a display gets its input from.
pub trait EventSource {
    /// Append every pending event to `events`.
    fn poll(&mut self, events: &mut Vec<Event>);
}

/// An event source that never reports anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEvents;

impl EventSource for NoEvents {
    fn poll(&mut self, _events: &mut Vec<Event>) {}
}

/// Delivers preset events on specific polls. Poll indices count from zero.
#[derive(Debug, Default)]
pub struct ScriptedEvents {
    script: VecDeque<(u64, Event)>,
    polls: u64,
}

impl ScriptedEvents {
    pub fn new(mut script: Vec<(u64, Event)>) -> Self {
        script.sort_by_key(|(at, _)| *at);
        Self {
            script: script.into(),
            polls: 0,
        }
    }

    /// Report [`Event::Quit`] on poll `n`, i.e. after `n` quiet polls.
    pub fn quit_after(n: u64) -> Self {
        Self::new(vec![(n, Event::Quit)])
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }
}

impl EventSource for ScriptedEvents {
    fn poll(&mut self, events: &mut Vec<Event>) {
        while let Some(&(at, event)) = self.script.front() {
            if at > self.polls {
                break;
            }
            events.push(event);
            self.script.pop_front();
        }
        self.polls += 1;
    }
}

/// Reports [`Event::Quit`] once a shared interrupt flag has been raised,
/// e.g. from a Ctrl-C handler on another thread.
#[derive(Debug, Clone, Default)]
pub struct InterruptEvents {
    flag: Arc<AtomicBool>,
}

impl InterruptEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to raise from whatever observes the interrupt.
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

impl EventSource for InterruptEvents {
    fn poll(&mut self, events: &mut Vec<Event>) {
        if self.flag.load(Ordering::Relaxed) {
            events.push(Event::Quit);
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DisplayInfo {
    pub backend: &'static str,
    pub width: u16,
    pub height: u16,
}

impl fmt::Display for DisplayInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "    Backend: {}", self.backend)?;
        write!(f, "    Surface: {}x{}", self.width, self.height)
    }
}

/// Frame clear/present cycle plus input polling.
pub trait Display {
    fn clear(&mut self);
    fn present(&mut self);
    fn target(&mut self) -> &mut dyn RenderTarget;
    fn poll_events(&mut self, events: &mut Vec<Event>);
    fn info(&self) -> DisplayInfo;
}

const CLEAR_COLOR: [f32; 3] = [0.0, 0.0, 0.0];

/// A display that renders into memory.
pub struct SoftwareDisplay {
    framebuffer: Framebuffer,
    events: Box<dyn EventSource>,
    presented: u64,
}

impl SoftwareDisplay {
    pub fn new(width: u16, height: u16, events: Box<dyn EventSource>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(BenchError::Display(format!(
                "surface size {width}x{height} has no pixels"
            )));
        }

        Ok(Self {
            framebuffer: Framebuffer::new(width, height),
            events,
            presented: 0,
        })
    }

    /// Number of frames presented so far.
    pub fn presented(&self) -> u64 {
        self.presented
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }
}

impl Display for SoftwareDisplay {
    fn clear(&mut self) {
        self.framebuffer.fill(CLEAR_COLOR);
    }

    fn present(&mut self) {
        self.presented += 1;
        std::hint::black_box(self.framebuffer.pixels());
    }

    fn target(&mut self) -> &mut dyn RenderTarget {
        &mut self.framebuffer
    }

    fn poll_events(&mut self, events: &mut Vec<Event>) {
        self.events.poll(events);
    }

    fn info(&self) -> DisplayInfo {
        DisplayInfo {
            backend: "software",
            width: self.framebuffer.width(),
            height: self.framebuffer.height(),
        }
    }
}
