use crate::contrast::ContrastMapper;
use crate::enums::{Contrast, Orientation};
use crate::projector::MipProjector;
use crate::surface::{RenderError, RenderSurface};
use crate::volume_loader::VolumeLoaderError;

use log::{debug, trace, warn};
use ndarray::{Array2, Array3, ArrayView2, Axis, Zip, s};

/// A CT volume together with the intensity statistics derived from it.
///
/// Voxels are stored depth-major as `(depth, height, width)`, i.e.
/// `data[[k, j, i]]` is column `i` of row `j` on slice `k`. The volume is
/// immutable once built.
#[derive(Debug, Clone)]
pub struct Volume {
    data: Array3<i16>,
    min: i16,
    max: i16,
    histogram: Vec<u64>,
    equalization: Vec<f32>,
}

impl Volume {
    /// Build a volume and derive its range, histogram and equalization table.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeLoaderError::EmptyVolume`] if any dimension is zero and
    /// [`VolumeLoaderError::DimensionOverflow`] if one does not fit an image
    /// side.
    pub fn new(data: Array3<i16>) -> Result<Self, VolumeLoaderError> {
        Self::validate_dim(data.dim())?;

        let (min, max) = data
            .iter()
            .fold((i16::MAX, i16::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));

        let levels = (i32::from(max) - i32::from(min) + 1) as usize;
        let mut histogram = vec![0u64; levels];
        for &v in data.iter() {
            histogram[(i32::from(v) - i32::from(min)) as usize] += 1;
        }

        let equalization = Self::equalization_from_histogram(&histogram, data.len());

        Ok(Self {
            data,
            min,
            max,
            histogram,
            equalization,
        })
    }

    /// Every axis must be non-empty and no longer than a `u32` image side.
    pub(crate) fn validate_dim(dim: (usize, usize, usize)) -> Result<(), VolumeLoaderError> {
        let (depth, height, width) = dim;
        if depth == 0 || height == 0 || width == 0 {
            return Err(VolumeLoaderError::EmptyVolume { dim });
        }
        if [depth, height, width]
            .into_iter()
            .any(|len| u32::try_from(len).is_err())
        {
            return Err(VolumeLoaderError::DimensionOverflow { dim });
        }
        Ok(())
    }

    /// Cumulative distribution scaled onto `[0, 255]`.
    fn equalization_from_histogram(histogram: &[u64], voxel_count: usize) -> Vec<f32> {
        let total = voxel_count as f32;
        let mut running = 0u64;
        histogram
            .iter()
            .map(|&count| {
                running += count;
                255.0 * running as f32 / total
            })
            .collect()
    }

    /// Get the dimensions of the volume (depth, height, width)
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    pub fn data(&self) -> &Array3<i16> {
        &self.data
    }

    pub fn min(&self) -> i16 {
        self.min
    }

    pub fn max(&self) -> i16 {
        self.max
    }

    /// Voxel counts per value; bucket `v` counts voxels equal to `min + v`.
    pub fn histogram(&self) -> &[u64] {
        &self.histogram
    }

    pub fn equalization_table(&self) -> &[f32] {
        &self.equalization
    }

    pub fn voxel(&self, k: usize, j: usize, i: usize) -> Option<i16> {
        self.data.get([k, j, i]).copied()
    }

    /// Number of slices available along the orientation's axis.
    pub fn axis_len(&self, orientation: Orientation) -> usize {
        self.data.len_of(Axis(orientation.axis()))
    }

    /// Output image size as (width, height).
    pub fn output_dimensions(&self, orientation: Orientation) -> (u32, u32) {
        let (depth, height, width) = self.dim();
        let (w, h) = match orientation {
            // Looking down the depth axis: columns across, rows down
            Orientation::Axial => (width, height),
            // Looking along rows: columns across, depth down
            Orientation::Coronal => (width, depth),
            // Looking along columns: rows across, depth down
            Orientation::Sagittal => (height, depth),
        };
        // lossless: every axis was checked against u32 in `new`
        (w as u32, h as u32)
    }

    pub fn allocate_surface(&self, orientation: Orientation) -> RenderSurface {
        let (width, height) = self.output_dimensions(orientation);
        RenderSurface::allocate(width, height)
    }

    pub fn is_valid_index(&self, index: usize, orientation: Orientation) -> bool {
        index < self.axis_len(orientation)
    }

    /// View of one cross-section, shaped `(output height, output width)`.
    pub fn get_slice_from_axis(
        &self,
        index: usize,
        orientation: Orientation,
    ) -> Option<ArrayView2<'_, i16>> {
        if !self.is_valid_index(index, orientation) {
            return None;
        }
        let slice = match orientation {
            Orientation::Axial => self.data.slice(s![index, .., ..]),
            Orientation::Coronal => self.data.slice(s![.., index, ..]),
            Orientation::Sagittal => self.data.slice(s![.., .., index]),
        };
        Some(slice)
    }

    fn warn_if_flat(&self) {
        if self.min == self.max {
            warn!(
                "Every voxel equals {}; linear contrast falls back to 0",
                self.min
            );
        }
    }

    /// Render one cross-section into `surface` in place.
    ///
    /// An `index` past the end of the axis leaves `surface` untouched and
    /// still returns `Ok`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::SurfaceMismatch`] if `surface` does not have the
    /// orientation's output size.
    pub fn render_slice(
        &self,
        index: usize,
        orientation: Orientation,
        contrast: Contrast,
        surface: &mut RenderSurface,
    ) -> Result<(), RenderError> {
        surface.ensure_dimensions(self.output_dimensions(orientation))?;

        let Some(slice) = self.get_slice_from_axis(index, orientation) else {
            debug!(
                "{orientation:?} slice {index} out of range (len {}), keeping previous image",
                self.axis_len(orientation)
            );
            return Ok(());
        };

        trace!("Rendering {orientation:?} slice {index} with {contrast:?} contrast");
        if contrast == Contrast::Linear {
            self.warn_if_flat();
        }

        let intensities: Array2<u8> =
            Zip::from(slice).par_map_collect(|&v| ContrastMapper::map(v, contrast, self));
        surface.fill_from(intensities.view());
        Ok(())
    }

    /// Render the maximum-intensity projection along `orientation` into
    /// `surface` in place.
    ///
    /// Projections always use linear contrast, whatever the slice views use.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::SurfaceMismatch`] if `surface` does not have the
    /// orientation's output size.
    pub fn render_mip(
        &self,
        orientation: Orientation,
        surface: &mut RenderSurface,
    ) -> Result<(), RenderError> {
        surface.ensure_dimensions(self.output_dimensions(orientation))?;

        trace!("Rendering {orientation:?} MIP");
        self.warn_if_flat();

        let (min, max) = (self.min, self.max);
        let intensities: Array2<u8> = Zip::from(self.data.lanes(Axis(orientation.axis())))
            .par_map_collect(|lane| MipProjector::project_lane(lane, min, max));
        surface.fill_from(intensities.view());
        Ok(())
    }

    /// Render a cross-section into a freshly allocated surface.
    pub fn get_image_from_axis(
        &self,
        index: usize,
        orientation: Orientation,
        contrast: Contrast,
    ) -> Option<RenderSurface> {
        if !self.is_valid_index(index, orientation) {
            return None;
        }
        let mut surface = self.allocate_surface(orientation);
        self.render_slice(index, orientation, contrast, &mut surface)
            .ok()?;
        Some(surface)
    }

    pub fn get_mip_from_axis(&self, orientation: Orientation) -> RenderSurface {
        let mut surface = self.allocate_surface(orientation);
        let rendered = self.render_mip(orientation, &mut surface);
        debug_assert!(
            rendered.is_ok(),
            "surface allocated for {orientation:?} must match its output size"
        );
        surface
    }
}
