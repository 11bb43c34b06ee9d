use image::GrayImage;

use super::detector_config::DetectorConfig;
use super::face_detector::FaceDetector;
use crate::shared::config_error::ConfigError;
use crate::shared::frame::Frame;
use crate::shared::rect::FaceSet;

/// Turns a colour frame into the set of faces to redact.
///
/// Owns the detector and its configuration; every call is independent of
/// the previous one. Returned rectangles are in frame coordinates and always
/// lie inside the frame.
pub struct FaceLocator {
    detector: Box<dyn FaceDetector>,
    config: DetectorConfig,
}

impl FaceLocator {
    pub fn new(detector: Box<dyn FaceDetector>, config: DetectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { detector, config })
    }

    pub fn locate(&mut self, frame: &Frame) -> Result<FaceSet, Box<dyn std::error::Error>> {
        let luma = to_luma(frame)?;
        let detections = self.detector.detect(&luma, &self.config)?;
        let raw = detections.len();

        let faces: Vec<_> = detections
            .into_iter()
            .filter_map(|r| r.clamp_to(frame.width(), frame.height()))
            .collect();
        if faces.len() != raw {
            log::debug!(
                "Frame {}: dropped {} detection(s) outside the frame",
                frame.index(),
                raw - faces.len()
            );
        }
        Ok(FaceSet::new(faces))
    }
}

/// BT.601 luminance in 14-bit fixed point, matching OpenCV's RGB→gray.
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

/// Single-channel luminance copy of `frame`, same dimensions.
///
/// Accepts gray, RGB and RGBA frames (alpha is ignored).
pub fn to_luma(frame: &Frame) -> Result<GrayImage, Box<dyn std::error::Error>> {
    let (w, h) = (frame.width(), frame.height());
    let pixels: Vec<u8> = match frame.channels() {
        1 => frame.data().to_vec(),
        c @ (3 | 4) => frame
            .data()
            .chunks_exact(c as usize)
            .map(|px| {
                let y = px[0] as u32 * LUMA_R
                    + px[1] as u32 * LUMA_G
                    + px[2] as u32 * LUMA_B
                    + (1 << (LUMA_SHIFT - 1));
                (y >> LUMA_SHIFT).min(255) as u8
            })
            .collect(),
        c => return Err(format!("unsupported channel count for detection: {c}").into()),
    };
    GrayImage::from_raw(w, h, pixels)
        .ok_or_else(|| format!("frame buffer does not match {w}x{h}").into())
}
