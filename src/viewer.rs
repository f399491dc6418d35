use crate::enums::{Contrast, Orientation};
use crate::surface::{RenderError, RenderSurface};
use crate::volume::Volume;

use log::debug;

/// Snapshot of the view controls at the moment a render is requested.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewState {
    pub axial: usize,
    pub coronal: usize,
    pub sagittal: usize,
    pub contrast: Contrast,
    pub mip: bool,
}

impl ViewState {
    /// Every slice index at the middle of its axis, linear contrast, no MIP.
    pub fn centered(volume: &Volume) -> Self {
        Self {
            axial: volume.axis_len(Orientation::Axial) / 2,
            coronal: volume.axis_len(Orientation::Coronal) / 2,
            sagittal: volume.axis_len(Orientation::Sagittal) / 2,
            ..Self::default()
        }
    }

    pub fn slice_index(&self, orientation: Orientation) -> usize {
        match orientation {
            Orientation::Axial => self.axial,
            Orientation::Coronal => self.coronal,
            Orientation::Sagittal => self.sagittal,
        }
    }

    /// Move one slice index. Moving any slice leaves projection mode.
    pub fn with_slice(mut self, orientation: Orientation, index: usize) -> Self {
        match orientation {
            Orientation::Axial => self.axial = index,
            Orientation::Coronal => self.coronal = index,
            Orientation::Sagittal => self.sagittal = index,
        }
        self.mip = false;
        self
    }

    pub fn with_contrast(mut self, contrast: Contrast) -> Self {
        self.contrast = contrast;
        self
    }

    pub fn with_mip(mut self, mip: bool) -> Self {
        self.mip = mip;
        self
    }
}

/// The top, front and side surfaces of one volume.
#[derive(Clone, Debug)]
pub struct Views {
    pub axial: RenderSurface,
    pub coronal: RenderSurface,
    pub sagittal: RenderSurface,
}

impl Views {
    pub fn new(volume: &Volume) -> Self {
        Self {
            axial: volume.allocate_surface(Orientation::Axial),
            coronal: volume.allocate_surface(Orientation::Coronal),
            sagittal: volume.allocate_surface(Orientation::Sagittal),
        }
    }

    pub fn surface(&self, orientation: Orientation) -> &RenderSurface {
        match orientation {
            Orientation::Axial => &self.axial,
            Orientation::Coronal => &self.coronal,
            Orientation::Sagittal => &self.sagittal,
        }
    }

    fn surface_mut(&mut self, orientation: Orientation) -> &mut RenderSurface {
        match orientation {
            Orientation::Axial => &mut self.axial,
            Orientation::Coronal => &mut self.coronal,
            Orientation::Sagittal => &mut self.sagittal,
        }
    }

    /// Re-render a single view from `state`.
    pub fn refresh(
        &mut self,
        volume: &Volume,
        state: &ViewState,
        orientation: Orientation,
    ) -> Result<(), RenderError> {
        let surface = self.surface_mut(orientation);
        if state.mip {
            volume.render_mip(orientation, surface)
        } else {
            volume.render_slice(
                state.slice_index(orientation),
                orientation,
                state.contrast,
                surface,
            )
        }
    }

    /// Re-render all three views from `state`.
    ///
    /// A failure on one view does not stop the others from being rendered;
    /// the first error is returned.
    pub fn refresh_all(&mut self, volume: &Volume, state: &ViewState) -> Result<(), RenderError> {
        debug!("Refreshing all views: {state:?}");
        let mut result = Ok(());
        for orientation in Orientation::ALL {
            let outcome = self.refresh(volume, state, orientation);
            if result.is_ok() {
                result = outcome;
            }
        }
        result
    }

    pub fn render_all_mip(&mut self, volume: &Volume) -> Result<(), RenderError> {
        self.refresh_all(volume, &ViewState::default().with_mip(true))
    }
}
