//! Built-in scenes rendered through the [`RenderTarget`] trait.
//!
//! - [`build`]: vertex-coloured mesh, `use-vbo` toggles a prepared buffer.
//! - [`texture`]: textured quad, `texture-filter` picks the sampler.
//! - [`shading`]: lit sphere, `shading` picks per-vertex or per-pixel lighting.
//!
//! To add a scene, implement [`BuiltinScene`] and [`Scene`] for it and list it
//! in the [`register_scenes!`] invocation at the bottom of this file.
//!
//! [`RenderTarget`]: crate::surface::RenderTarget

pub mod build;
pub mod mesh;
pub mod shading;
pub mod texture;

use std::rc::Rc;

use crate::clock::Clock;
use crate::registry::SceneRegistry;
use crate::scene::Scene;

pub use build::BuildScene;
pub use shading::ShadingScene;
pub use texture::TextureScene;

/// A scene type that ships with the harness.
pub trait BuiltinScene: Scene + Sized + 'static {
    /// Registry name.
    const NAME: &'static str;

    /// Construct with default options, timed by `clock`.
    fn new(clock: Rc<dyn Clock>) -> Self;
}

/// Generates:
/// - `BUILTIN_SCENES`: names of all built-in scenes in registration order
/// - `register_builtin_scenes()`: add one instance of each to a registry
macro_rules! register_scenes {
    ($($scene:ty),* $(,)?) => {
        /// Names of all built-in scenes.
        pub const BUILTIN_SCENES: &[&str] = &[$(<$scene as BuiltinScene>::NAME),*];

        /// Register one instance of every built-in scene, all timed by `clock`.
        pub fn register_builtin_scenes(registry: &mut SceneRegistry, clock: &Rc<dyn Clock>) {
            $(
                registry.register_scene(Box::new(<$scene as BuiltinScene>::new(Rc::clone(clock))));
            )*
        }
    };
}

register_scenes!(BuildScene, TextureScene, ShadingScene);

/// A registry holding every built-in scene.
pub fn builtin_registry(clock: Rc<dyn Clock>) -> SceneRegistry {
    let mut registry = SceneRegistry::new();
    register_builtin_scenes(&mut registry, &clock);
    registry
}
