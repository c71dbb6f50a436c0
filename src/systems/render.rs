//! Renderer: prediction grid + ground-truth overlay → gray RGB pixels.
//!
//! The image is R2 pixels wide (cooling rate) and R1 tall (arena size). Each
//! raw sample overwrites one cell with its own clipped duration, so measured
//! battles stand out against the model surface. The cell is found by rounding
//! both normalized coordinates and combining them into a flat row-major index
//! `col + row * R2`; only that flat index is bounds-checked. A cooling rate
//! that rounds to column R2 therefore lands on column 0 of the next row, and
//! samples whose flat index falls outside [0, R1 * R2) are dropped.

use log::debug;

use crate::error::ImageWriteError;
use crate::mechanics::color;
use crate::systems::grid::PredictionGrid;
use crate::systems::normalizer::Normalizer;
use crate::systems::sampler::Sample;
use crate::systems::sdk::ImageSink;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub plotted: usize,
    pub dropped: usize,
}

/// Paint every sample onto `grid`. Out-of-range flat indices are skipped.
pub fn overlay_samples(grid: &mut PredictionGrid, samples: &[Sample], normalizer: &Normalizer) -> RenderStats {
    let spec = grid.spec();
    let mut stats = RenderStats::default();
    for s in samples {
        let n = normalizer.normalize(s);
        match spec.cell_index(n.inputs) {
            Some(idx) => {
                grid.set_flat(idx, color::clip(n.target));
                stats.plotted += 1;
            }
            None => {
                debug!(
                    "sample at arena {:.3}, cooling {:.4} falls outside the grid",
                    s.arena_size, s.cooling_rate
                );
                stats.dropped += 1;
            }
        }
    }
    stats
}

/// Row-major gray pixels, one per cell.
pub fn to_pixels(grid: &PredictionGrid) -> Vec<[u8; 3]> {
    grid.values().iter().map(|&v| color::gray(v)).collect()
}

/// Hand `grid` to `sink` as an R2-wide, R1-tall image.
pub fn write_image<K: ImageSink + ?Sized>(grid: &PredictionGrid, sink: &mut K) -> Result<(), ImageWriteError> {
    let spec = grid.spec();
    sink.write(spec.cols as u32, spec.rows as u32, &to_pixels(grid))
}

/// Overlay the samples, then hand the image to `sink`.
pub fn render<K: ImageSink + ?Sized>(
    grid: &mut PredictionGrid,
    samples: &[Sample],
    normalizer: &Normalizer,
    sink: &mut K,
) -> Result<RenderStats, ImageWriteError> {
    let stats = overlay_samples(grid, samples, normalizer);
    write_image(grid, sink)?;
    Ok(stats)
}

fn check_len(width: u32, height: u32, pixels: &[[u8; 3]]) -> Result<(), ImageWriteError> {
    let expected = width as usize * height as usize;
    if pixels.len() != expected {
        return Err(ImageWriteError::DimensionMismatch { width, height, expected, actual: pixels.len() });
    }
    Ok(())
}

/// Keeps the last written image in memory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BufferSink {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 3]>,
    pub writes: usize,
}

impl ImageSink for BufferSink {
    fn write(&mut self, width: u32, height: u32, pixels: &[[u8; 3]]) -> Result<(), ImageWriteError> {
        check_len(width, height, pixels)?;
        self.width = width;
        self.height = height;
        self.pixels = pixels.to_vec();
        self.writes += 1;
        Ok(())
    }
}

/// Writes an 8-bit RGB PNG.
#[cfg(feature = "png")]
#[derive(Clone, Debug)]
pub struct PngSink {
    path: std::path::PathBuf,
}

#[cfg(feature = "png")]
impl PngSink {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[cfg(feature = "png")]
impl ImageSink for PngSink {
    fn write(&mut self, width: u32, height: u32, pixels: &[[u8; 3]]) -> Result<(), ImageWriteError> {
        use image::{ImageFormat, Rgb, RgbImage};

        check_len(width, height, pixels)?;
        let mut img = RgbImage::new(width, height);
        for (px, &rgb) in img.pixels_mut().zip(pixels) {
            *px = Rgb(rgb);
        }
        img.save_with_format(&self.path, ImageFormat::Png)?;
        Ok(())
    }
}
