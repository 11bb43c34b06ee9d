use image::GrayImage;

use super::detector_config::DetectorConfig;
use crate::shared::rect::Rect;

/// Face detection backend.
///
/// Receives a luminance image and the tuning knobs, returns boxes in that
/// image's pixel space. Takes `&mut self` since backends such as OpenCV's
/// classifier keep scratch buffers between calls.
pub trait FaceDetector {
    fn detect(
        &mut self,
        luma: &GrayImage,
        config: &DetectorConfig,
    ) -> Result<Vec<Rect>, Box<dyn std::error::Error>>;
}
