#[derive(Clone, Copy, Debug)]
pub enum Orientation {
    Axial,
    Coronal,
    Sagittal,
}
