// Copyright 2025 the scenemark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing abstraction that scenes render through, plus the CPU framebuffer
//! that backs the software display.
//!
//! Scenes only see [`RenderTarget`], so they can draw into the on-screen
//! framebuffer during a run and into a detached one for screenshots.

/// Linear RGB colour, each channel in `0.0..=1.0`.
pub type Rgb = [f32; 3];

/// A screen-space vertex with a colour to interpolate across the triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenVertex {
    pub x: f32,
    pub y: f32,
    pub color: Rgb,
}

impl ScreenVertex {
    pub fn new(x: f32, y: f32, color: Rgb) -> Self {
        Self { x, y, color }
    }
}

pub trait RenderTarget {
    fn width(&self) -> u16;
    fn height(&self) -> u16;
    fn set_pixel(&mut self, x: u16, y: u16, color: Rgb);
    fn fill(&mut self, color: Rgb);
    fn fill_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgb);
    /// Fill a triangle, interpolating vertex colours barycentrically.
    fn fill_triangle(&mut self, vertices: &[ScreenVertex; 3]);
}

/// Row-major RGBA8 pixel buffer.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u16,
    height: u16,
    pixels: Vec<[u8; 4]>,
}

impl Framebuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0, 255]; usize::from(width) * usize::from(height)],
        }
    }

    pub fn pixel(&self, x: u16, y: u16) -> [u8; 4] {
        self.pixels[self.index(x, y)]
    }

    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    /// Flatten into RGBA8 bytes.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        usize::from(y) * usize::from(self.width) + usize::from(x)
    }
}

#[inline]
fn to_rgba8(color: Rgb) -> [u8; 4] {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
    [channel(color[0]), channel(color[1]), channel(color[2]), 255]
}

#[inline]
fn edge(ax: f32, ay: f32, bx: f32, by: f32, px: f32, py: f32) -> f32 {
    (bx - ax) * (py - ay) - (by - ay) * (px - ax)
}

impl RenderTarget for Framebuffer {
    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }

    fn set_pixel(&mut self, x: u16, y: u16, color: Rgb) {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.pixels[idx] = to_rgba8(color);
        }
    }

    fn fill(&mut self, color: Rgb) {
        self.pixels.fill(to_rgba8(color));
    }

    fn fill_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgb) {
        let clamp_x = |v: f32| v.clamp(0.0, f32::from(self.width)) as u16;
        let clamp_y = |v: f32| v.clamp(0.0, f32::from(self.height)) as u16;
        let (x0, x1) = (clamp_x(x0.min(x1)), clamp_x(x0.max(x1)));
        let (y0, y1) = (clamp_y(y0.min(y1)), clamp_y(y0.max(y1)));
        let rgba = to_rgba8(color);

        for y in y0..y1 {
            let row = self.index(x0, y);
            self.pixels[row..row + usize::from(x1 - x0)].fill(rgba);
        }
    }

    fn fill_triangle(&mut self, vertices: &[ScreenVertex; 3]) {
        let [a, b, c] = vertices;
        let area = edge(a.x, a.y, b.x, b.y, c.x, c.y);
        if area.abs() < f32::EPSILON {
            return;
        }

        let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as u16;
        let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as u16;
        let max_x = a.x.max(b.x).max(c.x).ceil().min(f32::from(self.width)) as u16;
        let max_y = a.y.max(b.y).max(c.y).ceil().min(f32::from(self.height)) as u16;

        for y in min_y..max_y {
            let py = f32::from(y) + 0.5;
            for x in min_x..max_x {
                let px = f32::from(x) + 0.5;
                let w0 = edge(b.x, b.y, c.x, c.y, px, py) / area;
                let w1 = edge(c.x, c.y, a.x, a.y, px, py) / area;
                let w2 = edge(a.x, a.y, b.x, b.y, px, py) / area;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }
                let color = [
                    w0 * a.color[0] + w1 * b.color[0] + w2 * c.color[0],
                    w0 * a.color[1] + w1 * b.color[1] + w2 * c.color[1],
                    w0 * a.color[2] + w1 * b.color[2] + w2 * c.color[2],
                ];
                let idx = self.index(x, y);
                self.pixels[idx] = to_rgba8(color);
            }
        }
    }
}
