use crate::shared::frame::Frame;
use crate::shared::rect::Rect;

/// Applies a destructive blur to the given regions of a frame.
///
/// Implementations modify the frame in place (`&mut Frame`) and must cope
/// with regions that overhang the frame edge.
pub trait FrameBlurrer {
    fn blur(&self, frame: &mut Frame, regions: &[Rect]) -> Result<(), Box<dyn std::error::Error>>;
}
