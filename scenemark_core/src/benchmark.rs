//! A benchmark is a scene name plus the options to run it with.
//!
//! [`Benchmark::setup_scene`] resolves the scene in a [`SceneRegistry`],
//! configures and starts it, and hands back a [`BoundScene`] that mutably
//! borrows the registry until [`Benchmark::teardown_scene`] releases it. The
//! borrow is what keeps two benchmarks from driving the same scene at once.

use std::ops::{Deref, DerefMut};

use smallvec::SmallVec;

use crate::error::{BenchError, Result};
use crate::options::OptionPair;
use crate::registry::SceneRegistry;
use crate::scene::Scene;

/// What setup does when a scene rejects one of the benchmark's options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OptionPolicy {
    /// Log the rejected option and keep going.
    #[default]
    Lenient,
    /// Fail setup, leaving the scene at its defaults.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Benchmark {
    scene_name: String,
    options: SmallVec<[OptionPair; 4]>,
}

impl Benchmark {
    pub fn new(scene_name: impl Into<String>, options: impl IntoIterator<Item = OptionPair>) -> Self {
        Self {
            scene_name: scene_name.into(),
            options: options.into_iter().collect(),
        }
    }

    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push(OptionPair::new(name, value));
        self
    }

    /// Parse `scene[:option=value]*`, e.g. `texture:texture-filter=linear`.
    pub fn from_description(description: &str) -> Result<Self> {
        let invalid = |reason| BenchError::InvalidDescription {
            description: description.to_string(),
            reason,
        };

        let mut parts = description.split(':');
        let scene_name = parts.next().unwrap_or_default().trim();
        if scene_name.is_empty() {
            return Err(invalid("missing scene name"));
        }

        let mut options = SmallVec::new();
        for part in parts {
            let (name, value) = part
                .split_once('=')
                .ok_or_else(|| invalid("option without '='"))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(invalid("empty option name"));
            }
            options.push(OptionPair::new(name, value.trim()));
        }

        Ok(Self {
            scene_name: scene_name.to_string(),
            options,
        })
    }

    /// Render as `scene:option=value:...`.
    ///
    /// [`Benchmark::from_description`] parses this back to an equal benchmark
    /// as long as no name or value contains `:` or `=`, or has surrounding
    /// whitespace.
    pub fn description(&self) -> String {
        let mut description = self.scene_name.clone();
        for option in &self.options {
            description.push(':');
            description.push_str(&option.name);
            description.push('=');
            description.push_str(&option.value);
        }
        description
    }

    pub fn scene_name(&self) -> &str {
        &self.scene_name
    }

    pub fn options(&self) -> &[OptionPair] {
        &self.options
    }

    /// Resolve, configure and start the scene, ignoring rejected options.
    pub fn setup_scene<'r>(&self, registry: &'r mut SceneRegistry) -> Result<BoundScene<'r>> {
        self.setup_scene_with(registry, OptionPolicy::Lenient)
    }

    pub fn setup_scene_with<'r>(
        &self,
        registry: &'r mut SceneRegistry,
        policy: OptionPolicy,
    ) -> Result<BoundScene<'r>> {
        let scene = registry
            .lookup_mut(&self.scene_name)
            .ok_or_else(|| BenchError::UnknownScene(self.scene_name.clone()))?;

        scene.reset_options();
        for OptionPair { name, value } in &self.options {
            let Err(reason) = scene.apply_option(name, value) else {
                continue;
            };
            match policy {
                OptionPolicy::Lenient => {
                    tracing::warn!(scene = %self.scene_name, %reason, "ignoring option");
                }
                OptionPolicy::Strict => {
                    scene.reset_options();
                    return Err(BenchError::OptionRejected {
                        scene: self.scene_name.clone(),
                        option: name.clone(),
                        value: value.clone(),
                        reason,
                    });
                }
            }
        }

        scene.start();
        tracing::debug!(benchmark = %self.description(), "scene set up");

        Ok(BoundScene {
            scene,
            released: false,
        })
    }

    /// Stop the scene and give it back to the registry.
    pub fn teardown_scene(&self, mut bound: BoundScene<'_>) {
        bound.release();
        tracing::debug!(benchmark = %self.description(), "scene torn down");
    }
}

/// A scene bound to one benchmark for the length of a run.
///
/// Dropping it without [`Benchmark::teardown_scene`] still tears the scene
/// down, so an early return cannot leave a scene running.
pub struct BoundScene<'r> {
    scene: &'r mut (dyn Scene + 'static),
    released: bool,
}

impl BoundScene<'_> {
    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.scene.teardown();
        }
    }
}

impl Deref for BoundScene<'_> {
    type Target = dyn Scene;

    fn deref(&self) -> &Self::Target {
        &*self.scene
    }
}

impl DerefMut for BoundScene<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.scene
    }
}

impl Drop for BoundScene<'_> {
    fn drop(&mut self) {
        self.release();
    }
}

/// The stock benchmark list.
pub fn default_benchmarks() -> Vec<Benchmark> {
    [
        ("build", "use-vbo", "false"),
        ("build", "use-vbo", "true"),
        ("texture", "texture-filter", "nearest"),
        ("texture", "texture-filter", "linear"),
        ("texture", "texture-filter", "mipmap"),
        ("shading", "shading", "gouraud"),
        ("shading", "shading", "phong"),
    ]
    .into_iter()
    .map(|(scene, option, value)| Benchmark::new(scene, [OptionPair::new(option, value)]))
    .collect()
}
