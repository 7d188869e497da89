//! Through-plane geometry for slice stacks.
//!
//! The axis along which a stack was acquired is implicit in each image's
//! orientation vectors. Projecting the image origin onto the plane normal
//! yields a signed coordinate on that axis, which is the only ordering key
//! that is correct regardless of how the patient axes map to the scanner.

/// Row and column direction cosines of an image plane in patient space.
///
/// Both vectors are assumed unit-length and mutually orthogonal, as mandated
/// by the DICOM `ImageOrientationPatient` attribute they are read from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageOrientation {
    pub row: [f64; 3],
    pub column: [f64; 3],
}

impl ImageOrientation {
    /// The plane normal, `row × column`.
    pub fn normal(&self) -> [f64; 3] {
        cross(self.row, self.column)
    }

    // Direction cosines come from decimal strings, so identical slices
    // compare bit-equal in practice; the tolerance absorbs re-encoding noise.
    pub(crate) fn approx_eq(&self, other: &Self) -> bool {
        let close = |a: [f64; 3], b: [f64; 3]| {
            a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-4)
        };
        close(self.row, other.row) && close(self.column, other.column)
    }
}

/// Signed coordinate of an image origin along the stack's through-plane axis.
///
/// Slices of a constant-orientation stack sorted by this value are in
/// physical stacking order, and consecutive differences are the physical
/// inter-slice distances.
pub fn through_plane_position(orientation: &ImageOrientation, position: [f64; 3]) -> f64 {
    dot(position, orientation.normal())
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}
