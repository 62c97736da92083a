//! A rotating vertex-coloured mesh, rebuilt from its index buffer every frame
//! unless `use-vbo` keeps a prepared vertex buffer around.

use std::borrow::Cow;
use std::rc::Rc;

use super::BuiltinScene;
use super::mesh::{Mesh, MeshVertex, project, rotate};
use crate::clock::Clock;
use crate::scene::{Scene, SceneCore};
use crate::surface::RenderTarget;

const ROTATION_SPEED: f32 = 0.9;

pub struct BuildScene {
    core: SceneCore,
    mesh: Mesh,
    /// Flattened vertices, kept between frames when `use-vbo` is on.
    vbo: Option<Vec<MeshVertex>>,
}

impl BuiltinScene for BuildScene {
    const NAME: &'static str = "build";

    fn new(clock: Rc<dyn Clock>) -> Self {
        let mut core = SceneCore::new(Self::NAME, clock);
        core.options_mut().declare_enum(
            "use-vbo",
            "true",
            "Whether to keep vertex data in a prepared buffer",
            &["false", "true"],
        );

        Self {
            core,
            mesh: Mesh::sphere(24, 48, [0.3, 0.6, 0.9], 0x5eed),
            vbo: None,
        }
    }
}

impl BuildScene {
    pub fn uses_vbo(&self) -> bool {
        self.vbo.is_some()
    }
}

impl Scene for BuildScene {
    fn core(&self) -> &SceneCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SceneCore {
        &mut self.core
    }

    fn prepare(&mut self) {
        self.vbo = self
            .core
            .options()
            .value_bool("use-vbo")
            .then(|| self.mesh.flatten());
    }

    fn release(&mut self) {
        self.vbo = None;
    }

    fn draw(&mut self, target: &mut dyn RenderTarget) {
        let angle = self.core.elapsed_secs() as f32 * ROTATION_SPEED;
        let (width, height) = (target.width(), target.height());

        let vertices: Cow<'_, [MeshVertex]> = match &self.vbo {
            Some(vbo) => Cow::Borrowed(vbo.as_slice()),
            None => Cow::Owned(self.mesh.flatten()),
        };

        for tri in vertices.chunks_exact(3) {
            let rotated: [[f32; 3]; 3] =
                std::array::from_fn(|i| rotate(tri[i].position, angle, angle * 0.5));
            // Convex mesh around the origin: faces pointing away have z < 0.
            if rotated.iter().map(|p| p[2]).sum::<f32>() < 0.0 {
                continue;
            }
            let screen = std::array::from_fn(|i| project(rotated[i], tri[i].color, width, height));
            target.fill_triangle(&screen);
        }
    }
}
