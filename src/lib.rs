//! # dicom-stack
//!
//! Assembles an ordered, spatially-calibrated 3D intensity volume from a
//! stack of independent 2D DICOM cross-sections.
//!
//! This library is part of the dicom-rs ecosystem and leverages its
//! components to read slice geometry and pixel data. The hard part it takes
//! care of is geometric: slice order and inter-slice spacing are derived
//! from the `ImageOrientationPatient`/`ImagePositionPatient` metadata by
//! projecting each image origin onto the stack's plane normal, never from
//! filenames or acquisition order. Raw stored values are calibrated with
//! each image's `RescaleSlope`/`RescaleIntercept` before they enter the
//! volume, and the result carries its physical voxel spacing alongside the
//! intensity array.
//!
//! Assumptions on the input stack:
//!  - One series, constant orientation (no oblique or mixed-orientation
//!    acquisitions)
//!  - Uniform true slice spacing; the reported spacing is the mean of
//!    consecutive through-plane differences
//!  - No multiframe (always the first frame is used)
//!
//! # Examples
//!
//! ## Reading a directory of DICOM files into a volume
//!
//! ```no_run
//! # use dicom_stack::{Orientation, VolumeLoader};
//! # use std::path::PathBuf;
//! let volume = VolumeLoader::load_from_directory(PathBuf::from("dicom"))
//!     .expect("should have loaded files from directory");
//! let (slices, columns, rows) = volume.dim();
//! println!("{slices}x{columns}x{rows}, voxel {:?} mm", volume.voxel_spacing);
//! let center = volume.slice_view(slices / 2, Orientation::Axial);
//! ```
//!
//! ## Assembling caller-constructed slices
//!
//! [`SourceImage`] is plain data, so stacks decoded elsewhere can be fed to
//! [`VolumeAssembler::assemble`] directly without touching the DICOM layer.

pub mod assembler;
pub mod enums;
pub mod geometry;
pub mod source_image;
pub mod volume;
pub mod volume_loader;

pub use assembler::{AssembleError, VolumeAssembler};
pub use enums::Orientation;
pub use geometry::{ImageOrientation, through_plane_position};
pub use source_image::SourceImage;
pub use volume::Volume;
pub use volume_loader::{VolumeLoader, VolumeLoaderError};
