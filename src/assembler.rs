use crate::geometry::through_plane_position;
use crate::source_image::SourceImage;
use crate::volume::Volume;

use ndarray::{Array3, s};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("stack has {0} image(s); at least 2 are needed to derive slice spacing")]
    InsufficientData(usize),

    #[error("images in the stack do not share orientation and in-plane shape")]
    InconsistentGeometry,

    #[error("malformed metadata: {0}")]
    MalformedMetadata(String),
}

pub struct VolumeAssembler;

impl VolumeAssembler {
    /// Assemble an unordered stack of cross-sections into an ordered,
    /// calibrated volume.
    ///
    /// Slices are ordered by their through-plane position, never by input
    /// order: filenames and acquisition order do not reflect physical
    /// stacking. Inter-slice spacing is the mean of consecutive position
    /// differences, which absorbs floating-point jitter in the position
    /// metadata but assumes the true spacing is uniform.
    ///
    /// The output array has axis order (slice, column, row) and calibrated
    /// f32 intensities (`raw * slope + intercept` per image). Its voxel
    /// spacing is `(slice spacing, pixel_spacing[0], pixel_spacing[1])`
    /// taken from the first sorted image.
    ///
    /// # Errors
    ///
    /// [`AssembleError::InsufficientData`] for stacks of fewer than 2
    /// images, [`AssembleError::InconsistentGeometry`] if the images do not
    /// share orientation and in-plane shape.
    pub fn assemble(stack: &[SourceImage]) -> Result<Volume, AssembleError> {
        if stack.len() < 2 {
            return Err(AssembleError::InsufficientData(stack.len()));
        }

        let reference = &stack[0];
        if stack.iter().any(|image| {
            !image.orientation.approx_eq(&reference.orientation)
                || image.pixels.dim() != reference.pixels.dim()
        }) {
            return Err(AssembleError::InconsistentGeometry);
        }

        let mut located: Vec<(f64, &SourceImage)> = stack
            .iter()
            .map(|image| (through_plane_position(&image.orientation, image.position), image))
            .collect();
        located.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let slice_spacing = located
            .windows(2)
            .map(|pair| pair[1].0 - pair[0].0)
            .sum::<f64>()
            / (located.len() - 1) as f64;

        // Shape and pixel spacing are declared by the first slice in
        // physical order, not the first in input order.
        let first = located[0].1;
        let (rows, columns) = first.pixels.dim();
        let mut data = Array3::<f32>::zeros((located.len(), columns, rows));
        for (index, (_, image)) in located.iter().enumerate() {
            let slope = image.rescale_slope;
            let intercept = image.rescale_intercept;
            let calibrated = image
                .pixels
                .mapv(|raw| (f64::from(raw) * slope + intercept) as f32);
            data.slice_mut(s![index, .., ..])
                .assign(&calibrated.reversed_axes());
        }

        let voxel_spacing = (
            slice_spacing,
            first.pixel_spacing[0],
            first.pixel_spacing[1],
        );
        Ok(Volume::new(data, voxel_spacing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ImageOrientation;
    use ndarray::Array2;

    const AXIAL: ImageOrientation = ImageOrientation {
        row: [1.0, 0.0, 0.0],
        column: [0.0, 1.0, 0.0],
    };

    fn image_at(z: f64, value: u16) -> SourceImage {
        SourceImage {
            orientation: AXIAL,
            position: [0.0, 0.0, z],
            pixel_spacing: [0.5, 0.5],
            rescale_slope: 2.0,
            rescale_intercept: -10.0,
            pixels: Array2::from_elem((2, 2), value),
        }
    }

    #[test]
    fn empty_stack_is_insufficient() {
        assert!(matches!(
            VolumeAssembler::assemble(&[]),
            Err(AssembleError::InsufficientData(0))
        ));
    }

    #[test]
    fn single_slice_is_insufficient() {
        assert!(matches!(
            VolumeAssembler::assemble(&[image_at(0.0, 1)]),
            Err(AssembleError::InsufficientData(1))
        ));
    }

    #[test]
    fn assembles_unordered_stack() {
        // Positions arrive as {5, 1, 3}; physical order is {1, 3, 5}.
        let stack = [image_at(5.0, 100), image_at(1.0, 100), image_at(3.0, 100)];
        let volume = VolumeAssembler::assemble(&stack).unwrap();

        assert_eq!(volume.dim(), (3, 2, 2));
        assert_eq!(volume.voxel_spacing, (2.0, 0.5, 0.5));
        assert!(volume.data.iter().all(|&v| v == 190.0));
    }

    #[test]
    fn slices_are_ordered_by_through_plane_position() {
        let stack = [
            image_at(8.0, 30),
            image_at(2.0, 10),
            image_at(4.0, 20),
            image_at(6.0, 25),
        ];
        let volume = VolumeAssembler::assemble(&stack).unwrap();

        let per_slice: Vec<f32> = (0..4).map(|i| volume.data[[i, 0, 0]]).collect();
        // Calibrated values in ascending-position order.
        assert_eq!(per_slice, vec![10.0, 30.0, 40.0, 50.0]);
    }

    #[test]
    fn input_permutation_does_not_change_the_volume() {
        let stack = [image_at(1.0, 10), image_at(3.0, 20), image_at(5.0, 30)];
        let permuted = [stack[2].clone(), stack[0].clone(), stack[1].clone()];

        let a = VolumeAssembler::assemble(&stack).unwrap();
        let b = VolumeAssembler::assemble(&permuted).unwrap();
        assert_eq!(a.data, b.data);
        assert_eq!(a.voxel_spacing, b.voxel_spacing);
    }

    #[test]
    fn voxel_spacing_comes_from_the_sorted_first_slice() {
        let near = image_at(1.0, 0);
        let mut far = image_at(3.0, 0);
        far.pixel_spacing = [0.9, 0.9];

        // Input order is reversed; the slice at position 1.0 still supplies
        // the in-plane spacing.
        let volume = VolumeAssembler::assemble(&[far, near]).unwrap();
        assert_eq!((volume.voxel_spacing.1, volume.voxel_spacing.2), (0.5, 0.5));
    }

    #[test]
    fn uniform_spacing_is_recovered_exactly() {
        let stack: Vec<_> = (0..5).map(|i| image_at(10.0 + 1.25 * i as f64, 0)).collect();
        let volume = VolumeAssembler::assemble(&stack).unwrap();
        assert!((volume.voxel_spacing.0 - 1.25).abs() < 1e-12);
    }

    #[test]
    fn non_uniform_spacing_yields_the_mean() {
        // Accepted approximation: the mean is reported, not an error.
        let stack = [image_at(0.0, 0), image_at(1.0, 0), image_at(4.0, 0)];
        let volume = VolumeAssembler::assemble(&stack).unwrap();
        assert!((volume.voxel_spacing.0 - 2.0).abs() < 1e-12);
    }

    #[test]
    fn ordering_follows_the_normal_for_non_axial_stacks() {
        // Sagittal stack: slices advance along patient x, position z is noise.
        let sagittal = ImageOrientation {
            row: [0.0, 1.0, 0.0],
            column: [0.0, 0.0, -1.0],
        };
        let slice_at = |x: f64, value: u16| SourceImage {
            orientation: sagittal,
            position: [x, 50.0, -20.0],
            pixel_spacing: [1.0, 1.0],
            rescale_slope: 1.0,
            rescale_intercept: 0.0,
            pixels: Array2::from_elem((2, 2), value),
        };

        // Normal is -x, so larger x sorts first.
        let volume =
            VolumeAssembler::assemble(&[slice_at(0.0, 1), slice_at(2.0, 2), slice_at(4.0, 3)])
                .unwrap();
        let per_slice: Vec<f32> = (0..3).map(|i| volume.data[[i, 0, 0]]).collect();
        assert_eq!(per_slice, vec![3.0, 2.0, 1.0]);
        assert!((volume.voxel_spacing.0 - 2.0).abs() < 1e-12);
    }

    #[test]
    fn calibration_is_applied_per_image() {
        let mut low = image_at(0.0, 7);
        low.rescale_slope = 3.0;
        low.rescale_intercept = 1.0;
        let high = image_at(2.0, 7);

        let volume = VolumeAssembler::assemble(&[high, low]).unwrap();
        assert_eq!(volume.data[[0, 0, 0]], 7.0 * 3.0 + 1.0);
        assert_eq!(volume.data[[1, 0, 0]], 7.0 * 2.0 - 10.0);
    }

    #[test]
    fn in_plane_axes_are_column_then_row() {
        // 3 rows by 4 columns in the source becomes (slices, 4, 3) out, with
        // the value at (row r, column c) landing at [slice, c, r].
        let mut pixels = Array2::<u16>::zeros((3, 4));
        pixels[[2, 1]] = 9;
        let mut a = image_at(0.0, 0);
        a.pixels = pixels.clone();
        a.rescale_slope = 1.0;
        a.rescale_intercept = 0.0;
        let mut b = a.clone();
        b.position = [0.0, 0.0, 1.0];

        let volume = VolumeAssembler::assemble(&[a, b]).unwrap();
        assert_eq!(volume.dim(), (2, 4, 3));
        assert_eq!(volume.data[[0, 1, 2]], 9.0);
    }

    #[test]
    fn mismatched_shape_is_inconsistent_geometry() {
        let mut odd = image_at(2.0, 0);
        odd.pixels = Array2::zeros((2, 3));
        assert!(matches!(
            VolumeAssembler::assemble(&[image_at(0.0, 0), odd]),
            Err(AssembleError::InconsistentGeometry)
        ));
    }

    #[test]
    fn mismatched_orientation_is_inconsistent_geometry() {
        let mut tilted = image_at(2.0, 0);
        tilted.orientation = ImageOrientation {
            row: [0.0, 1.0, 0.0],
            column: [0.0, 0.0, -1.0],
        };
        assert!(matches!(
            VolumeAssembler::assemble(&[image_at(0.0, 0), tilted]),
            Err(AssembleError::InconsistentGeometry)
        ));
    }
}
