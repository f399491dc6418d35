//! # CT-volume library
//!
//! This crate turns a raw CT volume of signed 16-bit samples into 8-bit
//! grayscale views along the three medical axes:
//!  - Axial (top view)
//!  - Coronal (front view)
//!  - Sagittal (side view)
//!
//! Each view shows either a single cross-section or a maximum intensity
//! projection (MIP) through the whole volume. Cross-sections can be
//! displayed with one of two contrast policies:
//!  - Linear: the global `[min, max]` range is rescaled onto `0..=255`
//!  - Equalized: values are mapped through the cumulative histogram so
//!    common intensities get more of the display range
//!
//! Projections always use linear contrast.
//!
//! Volumes are read from headerless files of little-endian samples, stored
//! depth-major, then row, then column. Range, histogram and equalization
//! table are computed once at load time and the volume is immutable
//! afterwards. Rendering writes in place into a [`RenderSurface`] per view,
//! a packed RGB buffer holding the same gray level in all three channels.
//!
//! # Known quirks
//!
//!  - Requesting a slice past the end of its axis leaves the surface as it
//!    was instead of failing.
//!  - A volume where every voxel has the same value renders black under
//!    linear contrast.
//!  - Intensities are truncated, not rounded, when narrowed to 8 bits.
//!
//! # Examples
//!
//! ## Rendering the center slices of the reference CT head
//!
//! ```no_run
//! # use ct_volume::{Contrast, CT_HEAD_DIM, Orientation, VolumeLoader};
//! let volume = VolumeLoader::load_from_file("CThead", CT_HEAD_DIM)
//!     .expect("should have loaded the volume");
//! let image = volume
//!     .get_image_from_axis(
//!         volume.dim().2 / 2,
//!         Orientation::Sagittal,
//!         Contrast::Equalized,
//!     )
//!     .expect("should have returned image at center of volume");
//! image.save("side.png").expect("should have written the image");
//! ```
//!
//! ## Keeping three views up to date
//!
//! ```no_run
//! # use ct_volume::{CT_HEAD_DIM, Orientation, ViewState, Views, VolumeLoader};
//! let volume = VolumeLoader::load_from_file("CThead", CT_HEAD_DIM)
//!     .expect("should have loaded the volume");
//! let mut views = Views::new(&volume);
//! let state = ViewState::centered(&volume).with_slice(Orientation::Axial, 40);
//! views.refresh_all(&volume, &state).expect("surfaces match the volume");
//! views.render_all_mip(&volume).expect("surfaces match the volume");
//! ```

pub mod contrast;
pub mod enums;
mod projector;
pub mod surface;
pub mod viewer;
pub mod volume;
pub mod volume_loader;

pub use contrast::ContrastMapper;
pub use enums::{Contrast, Orientation};
pub use surface::{RenderError, RenderSurface};
pub use viewer::{ViewState, Views};
pub use volume::Volume;
pub use volume_loader::{CT_HEAD_DIM, VolumeLoader, VolumeLoaderError};
