use std::path::Path;

use image::GrayImage;
use opencv::core::{Mat, Rect as CvRect, Scalar, Size, Vector, CV_8UC1};
use opencv::objdetect::CascadeClassifier;
use opencv::prelude::*;

use crate::detection::domain::detector_config::DetectorConfig;
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::rect::Rect;

/// Viola-Jones Haar cascade detector backed by OpenCV's `objdetect`.
///
/// The classifier is loaded once from an XML model and reused for every
/// frame.
pub struct CascadeFaceDetector {
    classifier: CascadeClassifier,
    scratch: Mat,
}

impl CascadeFaceDetector {
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let path = model_path
            .to_str()
            .ok_or_else(|| format!("model path is not valid UTF-8: {}", model_path.display()))?;
        let classifier = CascadeClassifier::new(path)?;
        if classifier.empty()? {
            return Err(format!("failed to load cascade from {}", model_path.display()).into());
        }
        log::info!("Loaded face cascade from {}", model_path.display());
        Ok(Self {
            classifier,
            scratch: Mat::default(),
        })
    }

    /// Copies the luminance image into the reused OpenCV matrix.
    fn upload(&mut self, luma: &GrayImage) -> opencv::Result<()> {
        let (w, h) = luma.dimensions();
        if self.scratch.rows() != h as i32 || self.scratch.cols() != w as i32 {
            self.scratch =
                Mat::new_rows_cols_with_default(h as i32, w as i32, CV_8UC1, Scalar::all(0.0))?;
        }
        self.scratch.data_bytes_mut()?.copy_from_slice(luma.as_raw());
        Ok(())
    }
}

impl FaceDetector for CascadeFaceDetector {
    fn detect(
        &mut self,
        luma: &GrayImage,
        config: &DetectorConfig,
    ) -> Result<Vec<Rect>, Box<dyn std::error::Error>> {
        if luma.width() == 0 || luma.height() == 0 {
            return Ok(Vec::new());
        }
        self.upload(luma)?;

        let (min_w, min_h) = config.min_size;
        let mut found = Vector::<CvRect>::new();
        self.classifier.detect_multi_scale(
            &self.scratch,
            &mut found,
            config.scale_factor,
            config.min_neighbors as i32,
            0,
            Size::new(min_w as i32, min_h as i32),
            Size::new(0, 0),
        )?;

        Ok(found
            .iter()
            .map(|r| Rect::new(r.x, r.y, r.width, r.height))
            .collect())
    }
}
