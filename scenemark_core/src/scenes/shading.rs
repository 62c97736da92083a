//! A lit sphere under an orbiting light, shaded per vertex (`gouraud`) or per
//! pixel (`phong`).

use std::rc::Rc;

use super::BuiltinScene;
use super::mesh::{CAMERA_DISTANCE, Mesh, dot, normalize, project, projection_scale};
use crate::clock::Clock;
use crate::scene::{Scene, SceneCore};
use crate::surface::{RenderTarget, Rgb};

const BASE_COLOR: Rgb = [0.8, 0.3, 0.2];
const LIGHT_SPEED: f32 = 1.2;
const AMBIENT: f32 = 0.15;
const SHININESS: i32 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    Gouraud,
    Phong,
}

/// Blinn-Phong with the viewer on +Z.
fn light(color: Rgb, normal: [f32; 3], light_dir: [f32; 3]) -> Rgb {
    let diffuse = dot(normal, light_dir).max(0.0);
    let half = normalize([light_dir[0], light_dir[1], light_dir[2] + 1.0]);
    let specular = dot(normal, half).max(0.0).powi(SHININESS) * 0.5;
    color.map(|c| c * (AMBIENT + (1.0 - AMBIENT) * diffuse) + specular)
}

pub struct ShadingScene {
    core: SceneCore,
    mesh: Mesh,
    shading: Shading,
}

impl BuiltinScene for ShadingScene {
    const NAME: &'static str = "shading";

    fn new(clock: Rc<dyn Clock>) -> Self {
        let mut core = SceneCore::new(Self::NAME, clock);
        core.options_mut().declare_enum(
            "shading",
            "gouraud",
            "Which shading method to use",
            &["gouraud", "phong"],
        );

        Self {
            core,
            mesh: Mesh::sphere(32, 64, BASE_COLOR, 0x5ad3),
            shading: Shading::Gouraud,
        }
    }
}

impl ShadingScene {
    pub fn shading(&self) -> Shading {
        self.shading
    }

    fn light_dir(&self) -> [f32; 3] {
        let angle = self.core.elapsed_secs() as f32 * LIGHT_SPEED;
        normalize([angle.cos(), 0.6, angle.sin().abs() + 0.3])
    }

    fn draw_gouraud(&self, target: &mut dyn RenderTarget, light_dir: [f32; 3]) {
        let (width, height) = (target.width(), target.height());
        for tri in &self.mesh.indices {
            let vertices = tri.map(|i| &self.mesh.vertices[i as usize]);
            if vertices.iter().map(|v| v.position[2]).sum::<f32>() < 0.0 {
                continue;
            }
            let screen = vertices.map(|v| {
                project(v.position, light(v.color, v.normal, light_dir), width, height)
            });
            target.fill_triangle(&screen);
        }
    }

    /// Ray-cast the unit sphere through every pixel and light the hit normal.
    fn draw_phong(&self, target: &mut dyn RenderTarget, light_dir: [f32; 3]) {
        let (width, height) = (target.width(), target.height());
        let scale = projection_scale(width, height);
        let cx = f32::from(width) / 2.0;
        let cy = f32::from(height) / 2.0;
        // Silhouette radius of a unit sphere seen from CAMERA_DISTANCE.
        let reach = scale / (CAMERA_DISTANCE * CAMERA_DISTANCE - 1.0).sqrt() + 1.0;

        let x0 = (cx - reach).max(0.0) as u16;
        let y0 = (cy - reach).max(0.0) as u16;
        let x1 = (cx + reach).min(f32::from(width)) as u16;
        let y1 = (cy + reach).min(f32::from(height)) as u16;

        let origin = [0.0, 0.0, CAMERA_DISTANCE];
        let c = dot(origin, origin) - 1.0;
        for y in y0..y1 {
            for x in x0..x1 {
                let dir = normalize([
                    (f32::from(x) + 0.5 - cx) / scale,
                    -(f32::from(y) + 0.5 - cy) / scale,
                    -1.0,
                ]);
                let b = dot(origin, dir);
                let disc = b * b - c;
                if disc < 0.0 {
                    continue;
                }
                let t = -b - disc.sqrt();
                let normal = [dir[0] * t, dir[1] * t, origin[2] + dir[2] * t];
                target.set_pixel(x, y, light(BASE_COLOR, normal, light_dir));
            }
        }
    }
}

impl Scene for ShadingScene {
    fn core(&self) -> &SceneCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SceneCore {
        &mut self.core
    }

    fn prepare(&mut self) {
        self.shading = match self.core.options().value("shading") {
            "phong" => Shading::Phong,
            _ => Shading::Gouraud,
        };
    }

    fn draw(&mut self, target: &mut dyn RenderTarget) {
        let light_dir = self.light_dir();
        match self.shading {
            Shading::Gouraud => self.draw_gouraud(target, light_dir),
            Shading::Phong => self.draw_phong(target, light_dir),
        }
    }
}
