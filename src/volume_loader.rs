use crate::assembler::{AssembleError, VolumeAssembler};
use crate::source_image::SourceImage;
use crate::volume::Volume;

use dicom::object::{FileDicomObject, InMemDicomObject, open_file};
use rayon::prelude::*;
use std::{fs, path::Path};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum VolumeLoaderError {
    #[error("No valid DICOM images found")]
    NoValidImages,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DICOM error: {0}")]
    Dicom(#[from] dicom::object::ReadError),

    #[error(transparent)]
    Assemble(#[from] AssembleError),
}

pub struct VolumeLoader;

impl VolumeLoader {
    /// Assemble a volume from decoded DICOM objects
    ///
    /// # Errors
    ///
    /// Returns error if an object is missing geometry or calibration
    /// attributes, or if the stack cannot be assembled
    pub fn load_from_dicom_objects(
        dicom_objects: &[FileDicomObject<InMemDicomObject>],
    ) -> Result<Volume, VolumeLoaderError> {
        let stack: Vec<SourceImage> = dicom_objects
            .iter()
            .map(SourceImage::from_dicom_object)
            .collect::<Result<_, _>>()?;

        let volume = VolumeAssembler::assemble(&stack)?;
        info!(
            slices = volume.dim().0,
            spacing = ?volume.voxel_spacing,
            "assembled volume"
        );
        Ok(volume)
    }

    /// Assemble a volume from file paths, reading the files in parallel
    pub fn load_from_file_paths(
        paths: &[impl AsRef<Path> + Sync],
    ) -> Result<Volume, VolumeLoaderError> {
        let objects: Result<Vec<_>, _> = paths
            .par_iter()
            .map(|path| open_file(path.as_ref()))
            .collect();

        Self::load_from_dicom_objects(&objects?)
    }

    /// Assemble a volume from a directory containing .dcm files
    pub fn load_from_directory(path: impl AsRef<Path>) -> Result<Volume, VolumeLoaderError> {
        let paths: Vec<_> = fs::read_dir(path.as_ref())?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("dcm"))
            })
            .collect();

        if paths.is_empty() {
            return Err(VolumeLoaderError::NoValidImages);
        }
        debug!(files = paths.len(), directory = %path.as_ref().display(), "reading DICOM files");

        Self::load_from_file_paths(&paths)
    }
}
