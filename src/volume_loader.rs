use crate::volume::Volume;

use log::info;
use ndarray::Array3;
use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};
use thiserror::Error;

/// Shape `(depth, height, width)` of the reference CT head scan.
pub const CT_HEAD_DIM: (usize, usize, usize) = (113, 256, 256);

const BYTES_PER_SAMPLE: usize = 2;

#[derive(Debug, Error)]
pub enum VolumeLoaderError {
    #[error("Volume has an empty dimension: {dim:?}")]
    EmptyVolume { dim: (usize, usize, usize) },

    #[error("Volume data truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("Volume data does not match dimensions: expected {expected} bytes, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Volume dimensions {dim:?} are too large")]
    DimensionOverflow { dim: (usize, usize, usize) },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct VolumeLoader;

impl VolumeLoader {
    /// Load a volume from a headerless file of little-endian 16-bit samples
    ///
    /// # Arguments
    ///
    /// * `path` - File holding exactly `depth * height * width` samples
    /// * `dim` - Shape as `(depth, height, width)`
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or its size does not match
    /// `dim`
    pub fn load_from_file(
        path: impl AsRef<Path>,
        dim: (usize, usize, usize),
    ) -> Result<Volume, VolumeLoaderError> {
        let path = path.as_ref();
        info!("Loading {} as {dim:?}", path.display());
        let file = File::open(path)?;
        Self::load_from_reader(BufReader::new(file), dim)
    }

    /// Read at most one byte past the expected length, so an oversized source
    /// is rejected without being buffered in full.
    pub fn load_from_reader(
        reader: impl Read,
        dim: (usize, usize, usize),
    ) -> Result<Volume, VolumeLoaderError> {
        Volume::validate_dim(dim)?;
        let expected = Self::expected_len(dim)?;
        let mut bytes = Vec::new();
        reader
            .take((expected as u64).saturating_add(1))
            .read_to_end(&mut bytes)?;
        Self::load_from_bytes(&bytes, dim)
    }

    /// Decode samples stored depth-major, then row, then column, low byte
    /// first.
    pub fn load_from_bytes(
        bytes: &[u8],
        dim: (usize, usize, usize),
    ) -> Result<Volume, VolumeLoaderError> {
        Volume::validate_dim(dim)?;
        let expected = Self::expected_len(dim)?;
        let actual = bytes.len();
        if actual < expected {
            return Err(VolumeLoaderError::Truncated { expected, actual });
        }
        if actual > expected {
            return Err(VolumeLoaderError::DimensionMismatch { expected, actual });
        }

        let samples: Vec<i16> = bytes
            .chunks_exact(BYTES_PER_SAMPLE)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        let data = Array3::from_shape_vec(dim, samples)
            .map_err(|_| VolumeLoaderError::DimensionMismatch { expected, actual })?;

        let volume = Volume::new(data)?;
        info!(
            "Loaded volume {:?}, range [{}, {}], {} levels",
            volume.dim(),
            volume.min(),
            volume.max(),
            volume.histogram().len()
        );
        Ok(volume)
    }

    fn expected_len(dim: (usize, usize, usize)) -> Result<usize, VolumeLoaderError> {
        let (depth, height, width) = dim;
        depth
            .checked_mul(height)
            .and_then(|n| n.checked_mul(width))
            .and_then(|n| n.checked_mul(BYTES_PER_SAMPLE))
            .ok_or(VolumeLoaderError::DimensionOverflow { dim })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(values: &[i16]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn decodes_little_endian_depth_major() {
        let values: Vec<i16> = vec![0, 1, 2, 3, 4, 5, 6, 7];
        let volume = VolumeLoader::load_from_bytes(&encode(&values), (2, 2, 2)).unwrap();
        assert_eq!(volume.voxel(0, 0, 1), Some(1));
        assert_eq!(volume.voxel(0, 1, 0), Some(2));
        assert_eq!(volume.voxel(1, 0, 0), Some(4));
        assert_eq!((volume.min(), volume.max()), (0, 7));
    }

    #[test]
    fn low_byte_comes_first() {
        let bytes = [0x34, 0x12, 0xff, 0xff];
        let volume = VolumeLoader::load_from_bytes(&bytes, (1, 1, 2)).unwrap();
        assert_eq!(volume.voxel(0, 0, 0), Some(0x1234));
        assert_eq!(volume.voxel(0, 0, 1), Some(-1));
        assert_eq!(volume.histogram().len(), 0x1234 + 2);
    }

    #[test]
    fn truncated_input_fails() {
        let bytes = encode(&[1, 2, 3]);
        let err = VolumeLoader::load_from_bytes(&bytes[..5], (1, 2, 2)).unwrap_err();
        assert!(matches!(
            err,
            VolumeLoaderError::Truncated {
                expected: 8,
                actual: 5
            }
        ));
    }

    #[test]
    fn oversized_input_fails() {
        let bytes = encode(&[1, 2, 3, 4, 5]);
        let err = VolumeLoader::load_from_bytes(&bytes, (1, 2, 2)).unwrap_err();
        assert!(matches!(
            err,
            VolumeLoaderError::DimensionMismatch {
                expected: 8,
                actual: 10
            }
        ));
    }

    #[test]
    fn zero_dimension_fails() {
        let err = VolumeLoader::load_from_bytes(&[], (0, 256, 256)).unwrap_err();
        assert!(matches!(err, VolumeLoaderError::EmptyVolume { .. }));
    }

    #[test]
    fn overflowing_dimensions_fail() {
        let err = VolumeLoader::load_from_bytes(&[0, 0], (usize::MAX / 2, 3, 1)).unwrap_err();
        assert!(matches!(err, VolumeLoaderError::DimensionOverflow { .. }));

        // each axis fits, the byte count does not
        let dim = (u32::MAX as usize, u32::MAX as usize, 4);
        let err = VolumeLoader::load_from_bytes(&[0, 0], dim).unwrap_err();
        assert!(matches!(err, VolumeLoaderError::DimensionOverflow { .. }));
    }

    #[test]
    fn reader_with_huge_dimensions_fails_without_allocating() {
        let bytes = [0u8, 0];
        let err = VolumeLoader::load_from_reader(&bytes[..], (1 << 20, 1 << 10, 1)).unwrap_err();
        assert!(matches!(
            err,
            VolumeLoaderError::Truncated {
                expected: 2_147_483_648,
                actual: 2
            }
        ));

        let err = VolumeLoader::load_from_reader(&bytes[..], (usize::MAX / 2, 3, 1)).unwrap_err();
        assert!(matches!(err, VolumeLoaderError::DimensionOverflow { .. }));
    }

    #[test]
    fn reader_stops_one_byte_past_expected() {
        let bytes = encode(&[7; 64]);
        let err = VolumeLoader::load_from_reader(bytes.as_slice(), (1, 2, 2)).unwrap_err();
        assert!(matches!(
            err,
            VolumeLoaderError::DimensionMismatch {
                expected: 8,
                actual: 9
            }
        ));
    }

    #[test]
    fn reader_input_is_equivalent() {
        let bytes = encode(&[5, -5, 10, 0]);
        let volume = VolumeLoader::load_from_reader(bytes.as_slice(), (1, 2, 2)).unwrap();
        assert_eq!((volume.min(), volume.max()), (-5, 10));
        assert_eq!(volume.histogram().iter().sum::<u64>(), 4);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = VolumeLoader::load_from_file("does/not/exist/CThead", CT_HEAD_DIM).unwrap_err();
        assert!(matches!(err, VolumeLoaderError::Io(_)));
    }
}
