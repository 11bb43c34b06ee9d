use super::face_count_overlay::FaceCountOverlay;
use super::frame_blurrer::FrameBlurrer;
use crate::shared::frame::Frame;
use crate::shared::rect::FaceSet;

/// Result of redacting one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redaction {
    pub faces: usize,
    pub label: String,
}

/// Blurs every face of a [`FaceSet`] and stamps the face count.
///
/// The count printed is `faces.len()` of the very set that was blurred.
pub struct Redactor {
    blurrer: Box<dyn FrameBlurrer>,
    overlay: FaceCountOverlay,
}

impl Redactor {
    pub fn new(blurrer: Box<dyn FrameBlurrer>, overlay: FaceCountOverlay) -> Self {
        Self { blurrer, overlay }
    }

    pub fn redact(
        &self,
        frame: &mut Frame,
        faces: &FaceSet,
    ) -> Result<Redaction, Box<dyn std::error::Error>> {
        self.blurrer.blur(frame, faces.as_slice())?;
        let label = self.overlay.draw(frame, faces.len())?;
        Ok(Redaction {
            faces: faces.len(),
            label,
        })
    }
}
