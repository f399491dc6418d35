/// Principal viewing axis of the volume.
///
/// The viewer calls these the top, front and side views.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Axial,
    Coronal,
    Sagittal,
}

impl Orientation {
    pub const ALL: [Orientation; 3] = [
        Orientation::Axial,
        Orientation::Coronal,
        Orientation::Sagittal,
    ];

    /// Index of the volume axis this orientation slices through, in
    /// `(depth, height, width)` order.
    pub fn axis(self) -> usize {
        match self {
            Orientation::Axial => 0,
            Orientation::Coronal => 1,
            Orientation::Sagittal => 2,
        }
    }
}

/// Policy used to turn a raw voxel value into an 8-bit display intensity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Contrast {
    /// Linear rescale of the global `[min, max]` range onto `0..=255`.
    #[default]
    Linear,
    /// Lookup through the cumulative-histogram equalization table.
    Equalized,
}
