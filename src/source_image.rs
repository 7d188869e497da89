use crate::assembler::AssembleError;
use crate::geometry::ImageOrientation;

use dicom::core::Tag;
use dicom::object::{FileDicomObject, InMemDicomObject};
use dicom::pixeldata::{ConvertOptions, ModalityLutOption, PixelDecoder};
use dicom_dictionary_std::tags;
use ndarray::{Array2, s};

/// One decoded 2D cross-section with the geometry and calibration metadata
/// the assembler needs. Plain data; callers may construct it directly or use
/// [`SourceImage::from_dicom_object`].
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub orientation: ImageOrientation,
    /// Image-origin coordinate in patient space, in mm.
    pub position: [f64; 3],
    /// Physical pixel size in mm, in DICOM `PixelSpacing` order.
    pub pixel_spacing: [f64; 2],
    pub rescale_slope: f64,
    pub rescale_intercept: f64,
    /// Raw stored values of the first frame, shape (rows, columns).
    /// Uncalibrated; the assembler applies slope and intercept.
    pub pixels: Array2<u16>,
}

impl SourceImage {
    /// Extract geometry, calibration, and raw pixel data from a decoded
    /// DICOM object.
    ///
    /// # Errors
    ///
    /// Returns [`AssembleError::MalformedMetadata`] if a required attribute
    /// is absent, has the wrong number of values, or the pixel data cannot
    /// be decoded.
    pub fn from_dicom_object(
        dicom_object: &FileDicomObject<InMemDicomObject>,
    ) -> Result<Self, AssembleError> {
        let orientation = Self::multi_float(
            dicom_object,
            tags::IMAGE_ORIENTATION_PATIENT,
            "ImageOrientationPatient",
            6,
        )?;
        let position = Self::multi_float(
            dicom_object,
            tags::IMAGE_POSITION_PATIENT,
            "ImagePositionPatient",
            3,
        )?;
        let spacing = Self::multi_float(dicom_object, tags::PIXEL_SPACING, "PixelSpacing", 2)?;
        let rescale_slope = Self::float(dicom_object, tags::RESCALE_SLOPE, "RescaleSlope")?;
        let rescale_intercept =
            Self::float(dicom_object, tags::RESCALE_INTERCEPT, "RescaleIntercept")?;
        let pixels = Self::decode_raw_pixels(dicom_object)?;

        Ok(Self {
            orientation: ImageOrientation {
                row: [orientation[0], orientation[1], orientation[2]],
                column: [orientation[3], orientation[4], orientation[5]],
            },
            position: [position[0], position[1], position[2]],
            pixel_spacing: [spacing[0], spacing[1]],
            rescale_slope,
            rescale_intercept,
            pixels,
        })
    }

    pub fn rows(&self) -> usize {
        self.pixels.dim().0
    }

    pub fn columns(&self) -> usize {
        self.pixels.dim().1
    }

    fn multi_float(
        dicom_object: &FileDicomObject<InMemDicomObject>,
        tag: Tag,
        name: &str,
        expected: usize,
    ) -> Result<Vec<f64>, AssembleError> {
        let values = dicom_object
            .element(tag)
            .map_err(|_| AssembleError::MalformedMetadata(format!("missing attribute {name}")))?
            .to_multi_float64()
            .map_err(|_| AssembleError::MalformedMetadata(format!("unreadable attribute {name}")))?;

        if values.len() != expected {
            return Err(AssembleError::MalformedMetadata(format!(
                "{name} has {} value(s), expected {expected}",
                values.len()
            )));
        }
        Ok(values)
    }

    fn float(
        dicom_object: &FileDicomObject<InMemDicomObject>,
        tag: Tag,
        name: &str,
    ) -> Result<f64, AssembleError> {
        dicom_object
            .element(tag)
            .map_err(|_| AssembleError::MalformedMetadata(format!("missing attribute {name}")))?
            .to_float64()
            .map_err(|_| AssembleError::MalformedMetadata(format!("unreadable attribute {name}")))
    }

    fn decode_raw_pixels(
        dicom_object: &FileDicomObject<InMemDicomObject>,
    ) -> Result<Array2<u16>, AssembleError> {
        let pixel_data = dicom_object
            .decode_pixel_data()
            .map_err(|e| AssembleError::MalformedMetadata(format!("PixelData: {e}")))?;

        // Stored values must stay untouched here; the modality LUT is the
        // slope/intercept calibration the assembler applies itself.
        let options = ConvertOptions::new().with_modality_lut(ModalityLutOption::None);
        pixel_data
            .to_ndarray_with_options::<u16>(&options)
            .map_err(|e| AssembleError::MalformedMetadata(format!("PixelData: {e}")))
            .map(|arr| arr.slice_move(s![0, .., .., 0]))
    }
}
