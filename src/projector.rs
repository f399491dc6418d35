use ndarray::ArrayView1;

use crate::contrast::ContrastMapper;

/// Starting value of the running maximum, strictly below any mapped intensity.
const MIP_SENTINEL: f32 = -1.0;

pub(crate) struct MipProjector;

impl MipProjector {
    /// Scan one ray through the volume and keep the brightest linear
    /// intensity.
    ///
    /// Returns the depth at which the maximum was first reached together with
    /// that intensity. Only strictly greater samples replace the running
    /// maximum, so ties resolve to the shallowest depth.
    pub(crate) fn max_along(lane: ArrayView1<'_, i16>, min: i16, max: i16) -> (usize, f32) {
        let mut depth = 0;
        let mut maximum = MIP_SENTINEL;
        for (k, &voxel) in lane.iter().enumerate() {
            let intensity = ContrastMapper::linear_intensity(voxel, min, max);
            if intensity > maximum {
                maximum = intensity;
                depth = k;
            }
        }
        (depth, maximum)
    }

    #[inline]
    pub(crate) fn project_lane(lane: ArrayView1<'_, i16>, min: i16, max: i16) -> u8 {
        let (_, maximum) = Self::max_along(lane, min, max);
        maximum.max(0.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn keeps_brightest_sample() {
        let lane = array![3i16, 9, 1, 4];
        let (depth, intensity) = MipProjector::max_along(lane.view(), 0, 9);
        assert_eq!(depth, 1);
        assert_eq!(intensity, 255.0);
        assert_eq!(MipProjector::project_lane(lane.view(), 0, 9), 255);
    }

    #[test]
    fn ties_resolve_to_shallowest_depth() {
        let lane = array![2i16, 7, 5, 7, 7];
        let (depth, _) = MipProjector::max_along(lane.view(), 0, 7);
        assert_eq!(depth, 1);
    }

    #[test]
    fn first_sample_initializes_maximum() {
        let lane = array![0i16, 0, 0];
        let (depth, intensity) = MipProjector::max_along(lane.view(), 0, 10);
        assert_eq!(depth, 0);
        assert_eq!(intensity, 0.0);
    }

    #[test]
    fn flat_range_projects_to_zero() {
        let lane = array![5i16, 5];
        assert_eq!(MipProjector::project_lane(lane.view(), 5, 5), 0);
    }
}
