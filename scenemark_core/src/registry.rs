//! Scene lookup by name.
//!
//! The registry is populated once before any benchmark runs and then handed
//! to the runner; scenes live in it for the whole process.

use rustc_hash::FxHashMap;

use crate::scene::Scene;

#[derive(Default)]
pub struct SceneRegistry {
    scenes: FxHashMap<String, Box<dyn Scene>>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scene under its own name. A scene registered under a name
    /// already in use replaces the earlier one.
    pub fn register_scene(&mut self, scene: Box<dyn Scene>) {
        let name = scene.name().to_string();
        if self.scenes.insert(name.clone(), scene).is_some() {
            tracing::warn!(scene = %name, "replacing previously registered scene");
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&dyn Scene> {
        self.scenes.get(name).map(|scene| &**scene)
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut (dyn Scene + 'static)> {
        self.scenes.get_mut(name).map(Box::as_mut)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scenes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Every scene, ordered by name.
    pub fn all_scenes(&self) -> Vec<(&str, &dyn Scene)> {
        let mut scenes: Vec<_> = self
            .scenes
            .iter()
            .map(|(name, scene)| (name.as_str(), &**scene as &dyn Scene))
            .collect();
        scenes.sort_unstable_by_key(|(name, _)| *name);
        scenes
    }
}
