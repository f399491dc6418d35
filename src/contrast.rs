use crate::enums::Contrast;
use crate::surface::RenderError;
use crate::volume::Volume;

/// Voxel value to 8-bit display intensity conversion.
///
/// Narrowing to `u8` always truncates the fractional part.
pub struct ContrastMapper;

impl ContrastMapper {
    /// Linear intensity before narrowing, in `[0, 255]` for `voxel` within
    /// `[min, max]`. A flat range maps everything to `0.0`.
    #[inline]
    pub fn linear_intensity(voxel: i16, min: i16, max: i16) -> f32 {
        let span = i32::from(max) - i32::from(min);
        if span == 0 {
            return 0.0;
        }
        255.0 * (f32::from(voxel) - f32::from(min)) / span as f32
    }

    #[inline]
    pub fn linear(voxel: i16, min: i16, max: i16) -> u8 {
        Self::linear_intensity(voxel, min, max) as u8
    }

    /// Like [`ContrastMapper::linear`] but refuses a flat range instead of
    /// falling back to 0.
    pub fn linear_checked(voxel: i16, min: i16, max: i16) -> Result<u8, RenderError> {
        if min == max {
            return Err(RenderError::DegenerateRange { value: min });
        }
        Ok(Self::linear(voxel, min, max))
    }

    /// Table lookup at `voxel - min`; values outside the table map to 0.
    #[inline]
    pub fn equalized(voxel: i16, min: i16, table: &[f32]) -> u8 {
        let index = i32::from(voxel) - i32::from(min);
        usize::try_from(index)
            .ok()
            .and_then(|index| table.get(index))
            .map_or(0, |&value| value as u8)
    }

    #[inline]
    pub fn map(voxel: i16, contrast: Contrast, volume: &Volume) -> u8 {
        match contrast {
            Contrast::Linear => Self::linear(voxel, volume.min(), volume.max()),
            Contrast::Equalized => {
                Self::equalized(voxel, volume.min(), volume.equalization_table())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_truncates() {
        // 255 / 7 = 36.43, 255 * 4 / 7 = 145.71
        assert_eq!(ContrastMapper::linear(1, 0, 7), 36);
        assert_eq!(ContrastMapper::linear(4, 0, 7), 145);
        assert_eq!(ContrastMapper::linear(0, 0, 7), 0);
        assert_eq!(ContrastMapper::linear(7, 0, 7), 255);
    }

    #[test]
    fn linear_handles_negative_range() {
        assert_eq!(ContrastMapper::linear(-1000, -1000, 1000), 0);
        assert_eq!(ContrastMapper::linear(0, -1000, 1000), 127);
        assert_eq!(ContrastMapper::linear(1000, -1000, 1000), 255);
        assert_eq!(ContrastMapper::linear(i16::MAX, i16::MIN, i16::MAX), 255);
    }

    #[test]
    fn linear_is_repeatable() {
        for v in 0..=3366 {
            assert_eq!(
                ContrastMapper::linear(v, 0, 3365),
                ContrastMapper::linear(v, 0, 3365)
            );
        }
    }

    #[test]
    fn flat_range_falls_back_to_zero() {
        assert_eq!(ContrastMapper::linear_intensity(42, 42, 42), 0.0);
        assert_eq!(ContrastMapper::linear(42, 42, 42), 0);
        assert_eq!(
            ContrastMapper::linear_checked(42, 42, 42),
            Err(RenderError::DegenerateRange { value: 42 })
        );
        assert_eq!(ContrastMapper::linear_checked(1, 0, 7), Ok(36));
    }

    #[test]
    fn equalized_looks_up_offset_from_min() {
        let table = [10.9, 127.5, 255.0];
        assert_eq!(ContrastMapper::equalized(-5, -5, &table), 10);
        assert_eq!(ContrastMapper::equalized(-4, -5, &table), 127);
        assert_eq!(ContrastMapper::equalized(-3, -5, &table), 255);
        assert_eq!(ContrastMapper::equalized(-6, -5, &table), 0);
        assert_eq!(ContrastMapper::equalized(9, -5, &table), 0);
    }
}
