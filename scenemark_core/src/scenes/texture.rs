//! A rotating textured quad, sampled per pixel with the filter selected by
//! the `texture-filter` option.

use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::BuiltinScene;
use crate::clock::Clock;
use crate::scene::{Scene, SceneCore};
use crate::surface::{RenderTarget, Rgb};

const TEXTURE_SIZE: usize = 128;
const CHECKER: usize = 16;
const ROTATION_SPEED: f32 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Nearest,
    Linear,
    Mipmap,
}

impl Filter {
    fn from_option(value: &str) -> Self {
        match value {
            "linear" => Self::Linear,
            "mipmap" => Self::Mipmap,
            _ => Self::Nearest,
        }
    }
}

/// Square RGB texture with an optional mip chain; level 0 is full size.
#[derive(Debug, Clone)]
pub struct Texture {
    levels: Vec<(usize, Vec<Rgb>)>,
}

impl Texture {
    /// Checkerboard with per-texel noise.
    pub fn checker(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let texels = (0..TEXTURE_SIZE * TEXTURE_SIZE)
            .map(|i| {
                let (x, y) = (i % TEXTURE_SIZE, i / TEXTURE_SIZE);
                let light = (x / CHECKER + y / CHECKER) % 2 == 0;
                let noise: f32 = rng.random_range(0.0..0.1);
                if light {
                    [0.9 - noise, 0.8 - noise, 0.3]
                } else {
                    [0.1 + noise, 0.2, 0.5 + noise]
                }
            })
            .collect();
        Self {
            levels: vec![(TEXTURE_SIZE, texels)],
        }
    }

    /// Box-filter down to 1x1.
    pub fn build_mipmaps(&mut self) {
        self.levels.truncate(1);
        while let Some((size, texels)) = self.levels.last().filter(|(size, _)| *size > 1) {
            let size = *size;
            let half = size / 2;
            let mut next = Vec::with_capacity(half * half);
            for y in 0..half {
                for x in 0..half {
                    let mut sum = [0.0; 3];
                    for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                        let t = texels[(2 * y + dy) * size + 2 * x + dx];
                        for c in 0..3 {
                            sum[c] += t[c] * 0.25;
                        }
                    }
                    next.push(sum);
                }
            }
            self.levels.push((half, next));
        }
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    fn texel(&self, level: usize, x: usize, y: usize) -> Rgb {
        let (size, texels) = &self.levels[level];
        texels[y.min(size - 1) * size + x.min(size - 1)]
    }

    pub fn sample_nearest(&self, level: usize, u: f32, v: f32) -> Rgb {
        let size = self.levels[level].0 as f32;
        self.texel(level, (u * size) as usize, (v * size) as usize)
    }

    pub fn sample_bilinear(&self, level: usize, u: f32, v: f32) -> Rgb {
        let size = self.levels[level].0 as f32;
        let x = (u * size - 0.5).max(0.0);
        let y = (v * size - 0.5).max(0.0);
        let (x0, y0) = (x as usize, y as usize);
        let (fx, fy) = (x.fract(), y.fract());

        let a = self.texel(level, x0, y0);
        let b = self.texel(level, x0 + 1, y0);
        let c = self.texel(level, x0, y0 + 1);
        let d = self.texel(level, x0 + 1, y0 + 1);
        std::array::from_fn(|i| {
            let top = a[i] + (b[i] - a[i]) * fx;
            let bottom = c[i] + (d[i] - c[i]) * fx;
            top + (bottom - top) * fy
        })
    }
}

pub struct TextureScene {
    core: SceneCore,
    texture: Texture,
    filter: Filter,
}

impl BuiltinScene for TextureScene {
    const NAME: &'static str = "texture";

    fn new(clock: Rc<dyn Clock>) -> Self {
        let mut core = SceneCore::new(Self::NAME, clock);
        core.options_mut().declare_enum(
            "texture-filter",
            "nearest",
            "The filtering mode to use for the texture",
            &["nearest", "linear", "mipmap"],
        );

        Self {
            core,
            texture: Texture::checker(0x7e47),
            filter: Filter::Nearest,
        }
    }
}

impl TextureScene {
    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }
}

impl Scene for TextureScene {
    fn core(&self) -> &SceneCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SceneCore {
        &mut self.core
    }

    fn prepare(&mut self) {
        self.filter = Filter::from_option(self.core.options().value("texture-filter"));
        if self.filter == Filter::Mipmap {
            self.texture.build_mipmaps();
        }
    }

    fn release(&mut self) {
        self.texture.levels.truncate(1);
    }

    fn draw(&mut self, target: &mut dyn RenderTarget) {
        let angle = self.core.elapsed_secs() as f32 * ROTATION_SPEED;
        let (sin, cos) = angle.sin_cos();
        let (width, height) = (target.width(), target.height());
        let cx = f32::from(width) / 2.0;
        let cy = f32::from(height) / 2.0;
        let half = f32::from(width.min(height)) * 0.35;

        // Texels per screen pixel picks the mip level.
        let level = match self.filter {
            Filter::Mipmap => {
                let ratio = TEXTURE_SIZE as f32 / (2.0 * half);
                (ratio.max(1.0).log2().floor() as usize).min(self.texture.level_count() - 1)
            }
            _ => 0,
        };

        // The rotated quad fits in a circle of radius half * sqrt(2).
        let reach = half * std::f32::consts::SQRT_2;
        let x0 = (cx - reach).max(0.0) as u16;
        let y0 = (cy - reach).max(0.0) as u16;
        let x1 = (cx + reach).min(f32::from(width)) as u16;
        let y1 = (cy + reach).min(f32::from(height)) as u16;

        for y in y0..y1 {
            let dy = f32::from(y) + 0.5 - cy;
            for x in x0..x1 {
                let dx = f32::from(x) + 0.5 - cx;
                let lx = (dx * cos + dy * sin) / half;
                let ly = (-dx * sin + dy * cos) / half;
                if lx.abs() > 1.0 || ly.abs() > 1.0 {
                    continue;
                }
                let (u, v) = ((lx + 1.0) * 0.5, (ly + 1.0) * 0.5);
                let color = match self.filter {
                    Filter::Nearest => self.texture.sample_nearest(0, u, v),
                    Filter::Linear | Filter::Mipmap => self.texture.sample_bilinear(level, u, v),
                };
                target.set_pixel(x, y, color);
            }
        }
    }
}
