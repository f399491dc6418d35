use std::path::Path;

use image::{ImageResult, Rgb, RgbImage};
use ndarray::ArrayView2;
use rayon::prelude::*;
use thiserror::Error;

/// Bytes per pixel: grayscale is stored as three identical channels.
pub const CHANNELS: usize = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("Degenerate intensity range: every voxel equals {value}")]
    DegenerateRange { value: i16 },

    #[error("Surface is {actual:?} but the view needs {expected:?}")]
    SurfaceMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

/// Packed RGB pixel buffer one view renders into.
///
/// Row-major, `width * height * 3` bytes, allocated once and overwritten in
/// place by every render.
#[derive(Clone, Debug)]
pub struct RenderSurface {
    image: RgbImage,
}

impl RenderSurface {
    /// Allocate a zeroed (black) surface.
    pub fn allocate(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Raw packed bytes, three per pixel.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Gray level stored at `(x, y)`.
    pub fn intensity_at(&self, x: u32, y: u32) -> u8 {
        self.image.get_pixel(x, y).0[0]
    }

    pub fn write_pixel(&mut self, x: u32, y: u32, intensity: u8) {
        self.image.put_pixel(x, y, Rgb([intensity; CHANNELS]));
    }

    /// Write `intensity` into all channels of pixel `(x, y)` of a packed buffer
    /// that is `width` pixels wide.
    #[inline]
    pub fn write_pixel_raw(buffer: &mut [u8], x: usize, y: usize, width: usize, intensity: u8) {
        let offset = CHANNELS * x + CHANNELS * y * width;
        buffer[offset..offset + CHANNELS].fill(intensity);
    }

    /// Overwrite every pixel from a `(height, width)` grid of gray levels.
    pub(crate) fn fill_from(&mut self, intensities: ArrayView2<'_, u8>) {
        let width = self.width() as usize;
        let buffer: &mut [u8] = &mut self.image;
        buffer
            .par_chunks_mut(width * CHANNELS)
            .enumerate()
            .for_each(|(y, row)| {
                for x in 0..width {
                    Self::write_pixel_raw(row, x, 0, width, intensities[[y, x]]);
                }
            });
    }

    pub(crate) fn ensure_dimensions(&self, expected: (u32, u32)) -> Result<(), RenderError> {
        let actual = self.dimensions();
        if actual != expected {
            return Err(RenderError::SurfaceMismatch { expected, actual });
        }
        Ok(())
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Save the surface, format chosen from the path's extension.
    pub fn save(&self, path: impl AsRef<Path>) -> ImageResult<()> {
        self.image.save(path)
    }
}
