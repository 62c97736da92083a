//! Single-frame renders for visual verification of a benchmark's scene.
//!
//! Goes through the same setup/draw/teardown path as a real run, so a
//! screenshot shows exactly what the benchmark draws on its first frame.

use std::path::Path;

use crate::benchmark::{Benchmark, OptionPolicy};
use crate::error::{BenchError, Result};
use crate::registry::SceneRegistry;
use crate::surface::{Framebuffer, RenderTarget};

/// The result of rendering a scene screenshot.
pub struct ScreenshotResult {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 pixel data, row-major order (4 bytes per pixel).
    pub rgba: Vec<u8>,
}

/// Set `bench` up, draw one frame at `width`x`height`, and tear it down.
pub fn render_screenshot(
    registry: &mut SceneRegistry,
    bench: &Benchmark,
    width: u16,
    height: u16,
    policy: OptionPolicy,
) -> Result<ScreenshotResult> {
    if width == 0 || height == 0 {
        return Err(BenchError::Display(format!(
            "screenshot size {width}x{height} has no pixels"
        )));
    }

    let mut framebuffer = Framebuffer::new(width, height);
    let mut scene = bench.setup_scene_with(registry, policy)?;
    scene.draw(&mut framebuffer);
    bench.teardown_scene(scene);

    Ok(ScreenshotResult {
        width: u32::from(framebuffer.width()),
        height: u32::from(framebuffer.height()),
        rgba: framebuffer.to_rgba(),
    })
}

impl ScreenshotResult {
    /// Encode as PNG at `path`.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        image::save_buffer(
            path,
            &self.rgba,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
        )?;
        tracing::debug!(path = %path.display(), "screenshot written");
        Ok(())
    }
}
