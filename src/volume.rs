use crate::enums::Orientation;

use ndarray::{Array3, ArrayView2, s};

/// An assembled, calibrated intensity volume.
///
/// `data` has axis order (slice, column, row); `voxel_spacing` gives the
/// physical size of one voxel along the same axes, in mm. The two travel
/// together because the array alone carries no physical scale.
#[derive(Debug, Default)]
pub struct Volume {
    pub data: Array3<f32>,
    pub voxel_spacing: (f64, f64, f64),
}

impl Volume {
    pub fn new(data: Array3<f32>, voxel_spacing: (f64, f64, f64)) -> Self {
        Self { data, voxel_spacing }
    }

    /// Get the dimensions of the volume (slices, columns, rows)
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Get a reference to the underlying data
    pub fn data(&self) -> &Array3<f32> {
        &self.data
    }

    /// A 2D view through the volume along one of the medical axes, or
    /// `None` if `index` is out of bounds on that axis.
    pub fn slice_view(&self, index: usize, orientation: Orientation) -> Option<ArrayView2<'_, f32>> {
        if !self.is_valid_index(index, orientation) {
            return None;
        }
        let view = match orientation {
            Orientation::Axial => self.data.slice(s![index, .., ..]),
            Orientation::Coronal => self.data.slice(s![.., index, ..]),
            Orientation::Sagittal => self.data.slice(s![.., .., index]),
        };
        Some(view)
    }

    fn is_valid_index(&self, index: usize, orientation: Orientation) -> bool {
        let dim = self.data.dim();
        let max_index = match orientation {
            Orientation::Axial => dim.0,
            Orientation::Coronal => dim.1,
            Orientation::Sagittal => dim.2,
        };
        index < max_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn volume() -> Volume {
        let mut data = Array3::<f32>::zeros((2, 3, 4));
        data[[1, 2, 3]] = 42.0;
        Volume::new(data, (2.0, 0.5, 0.5))
    }

    #[test]
    fn axis_views_share_the_array_layout() {
        let v = volume();
        assert_eq!(v.slice_view(1, Orientation::Axial).unwrap().dim(), (3, 4));
        assert_eq!(v.slice_view(2, Orientation::Coronal).unwrap().dim(), (2, 4));
        assert_eq!(v.slice_view(3, Orientation::Sagittal).unwrap().dim(), (2, 3));
        assert_eq!(v.slice_view(3, Orientation::Sagittal).unwrap()[[1, 2]], 42.0);
    }

    #[test]
    fn out_of_bounds_index_yields_none() {
        let v = volume();
        assert!(v.slice_view(2, Orientation::Axial).is_none());
        assert!(v.slice_view(3, Orientation::Coronal).is_none());
        assert!(v.slice_view(4, Orientation::Sagittal).is_none());
    }
}
