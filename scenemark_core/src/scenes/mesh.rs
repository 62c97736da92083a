//! Indexed triangle meshes and the projection used by the mesh scenes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::surface::{Rgb, ScreenVertex};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: Rgb,
}

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<[u32; 3]>,
}

impl Mesh {
    /// Unit sphere with `stacks` latitude bands and `slices` longitude
    /// segments, each vertex tinted by a random offset from `base`.
    pub fn sphere(stacks: u32, slices: u32, base: Rgb, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut vertices = Vec::with_capacity(((stacks + 1) * (slices + 1)) as usize);

        for stack in 0..=stacks {
            let phi = std::f32::consts::PI * stack as f32 / stacks as f32;
            for slice in 0..=slices {
                let theta = std::f32::consts::TAU * slice as f32 / slices as f32;
                let p = [phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin()];
                let tint = rng.random_range(-0.15..0.15);
                vertices.push(MeshVertex {
                    position: p,
                    normal: p,
                    color: base.map(|c| (c + tint).clamp(0.0, 1.0)),
                });
            }
        }

        let row = slices + 1;
        let mut indices = Vec::with_capacity((stacks * slices * 2) as usize);
        for stack in 0..stacks {
            for slice in 0..slices {
                let a = stack * row + slice;
                let b = a + row;
                indices.push([a, b, a + 1]);
                indices.push([a + 1, b, b + 1]);
            }
        }

        Self { vertices, indices }
    }

    /// De-index into a flat triangle list, three vertices per triangle.
    pub fn flatten(&self) -> Vec<MeshVertex> {
        self.indices
            .iter()
            .flat_map(|tri| tri.map(|i| self.vertices[i as usize]))
            .collect()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }
}

/// Rotate about the Y axis, then the X axis.
pub fn rotate(p: [f32; 3], yaw: f32, pitch: f32) -> [f32; 3] {
    let (sy, cy) = yaw.sin_cos();
    let (sp, cp) = pitch.sin_cos();
    let x = p[0] * cy + p[2] * sy;
    let z = -p[0] * sy + p[2] * cy;
    let y = p[1] * cp - z * sp;
    let z = p[1] * sp + z * cp;
    [x, y, z]
}

pub const CAMERA_DISTANCE: f32 = 3.0;

/// Pixels per unit at unit depth.
pub fn projection_scale(width: u16, height: u16) -> f32 {
    f32::from(width.min(height)) * 1.2
}

/// Perspective-project a point in front of a camera looking down -Z from
/// `z = CAMERA_DISTANCE`.
pub fn project(p: [f32; 3], color: Rgb, width: u16, height: u16) -> ScreenVertex {
    let scale = projection_scale(width, height);
    let w = CAMERA_DISTANCE - p[2];
    ScreenVertex::new(
        f32::from(width) / 2.0 + p[0] / w * scale,
        f32::from(height) / 2.0 - p[1] / w * scale,
        color,
    )
}

pub fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = dot(v, v).sqrt();
    if len > 0.0 { v.map(|c| c / len) } else { v }
}
