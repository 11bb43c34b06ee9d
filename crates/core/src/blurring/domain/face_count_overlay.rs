use opencv::core::{Mat, Point, Scalar, CV_8UC1, CV_8UC3};
use opencv::imgproc;
use opencv::prelude::*;

use crate::shared::frame::Frame;
use crate::shared::rect::Rect;

pub const DEFAULT_ORIGIN: (i32, i32) = (10, 30);
pub const DEFAULT_FONT_SCALE: f64 = 0.7;
pub const DEFAULT_THICKNESS: i32 = 2;
pub const DEFAULT_COLOR: [u8; 3] = [0, 255, 0];

const FONT: i32 = imgproc::FONT_HERSHEY_SIMPLEX;

/// Draws the `Faces: N` label onto a redacted frame with a Hershey font.
///
/// Only the patch under the label is copied out, drawn on and written back,
/// so the rest of the frame is never touched. Strokes are solid (`LINE_8`),
/// which keeps the label from sampling the pixels underneath.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceCountOverlay {
    /// Bottom-left corner of the text, in frame pixels.
    origin: (i32, i32),
    font_scale: f64,
    thickness: i32,
    color: [u8; 3],
}

impl FaceCountOverlay {
    pub fn new(origin: (i32, i32), font_scale: f64, thickness: i32, color: [u8; 3]) -> Self {
        Self {
            origin,
            font_scale,
            thickness: thickness.max(1),
            color,
        }
    }

    pub fn label(count: usize) -> String {
        format!("Faces: {count}")
    }

    /// Box that can receive ink when `text` is drawn, before clipping to
    /// the frame. Padded past the stroke thickness on every side.
    pub fn text_bounds(&self, text: &str) -> Result<Rect, Box<dyn std::error::Error>> {
        let mut baseline = 0;
        let size = imgproc::get_text_size(text, FONT, self.font_scale, self.thickness, &mut baseline)?;
        let pad = self.thickness + 2;
        Ok(Rect::new(
            self.origin.0 - pad,
            self.origin.1 - size.height - pad,
            size.width + 2 * pad,
            size.height + baseline + 2 * pad,
        ))
    }

    /// Renders the label for `count` and returns the text that was drawn.
    pub fn draw(&self, frame: &mut Frame, count: usize) -> Result<String, Box<dyn std::error::Error>> {
        let text = Self::label(count);
        let channels = frame.channels() as usize;
        let Some(area) = self.text_bounds(&text)?.clamp_to(frame.width(), frame.height()) else {
            return Ok(text);
        };
        // Grey (and grey + alpha) frames get luma ink; alpha is never inked.
        let (ink, mat_type) = match channels {
            1 | 2 => (1, CV_8UC1),
            3 | 4 => (3, CV_8UC3),
            n => return Err(format!("cannot draw on {n}-channel frame").into()),
        };

        let mut patch =
            Mat::new_rows_cols_with_default(area.height, area.width, mat_type, Scalar::all(0.0))?;
        copy_patch(frame, area, ink, patch.data_bytes_mut()?, Direction::FromFrame);

        imgproc::put_text(
            &mut patch,
            &text,
            Point::new(self.origin.0 - area.x, self.origin.1 - area.y),
            FONT,
            self.font_scale,
            self.ink_scalar(ink),
            self.thickness,
            imgproc::LINE_8,
            false,
        )?;

        copy_patch(frame, area, ink, patch.data_bytes_mut()?, Direction::ToFrame);
        Ok(text)
    }

    fn ink_scalar(&self, ink: usize) -> Scalar {
        let [r, g, b] = self.color.map(f64::from);
        if ink == 1 {
            Scalar::all(((299.0 * r + 587.0 * g + 114.0 * b) / 1000.0).round())
        } else {
            // Patches hold frame bytes in RGB order.
            Scalar::new(r, g, b, 0.0)
        }
    }
}

impl Default for FaceCountOverlay {
    fn default() -> Self {
        Self::new(DEFAULT_ORIGIN, DEFAULT_FONT_SCALE, DEFAULT_THICKNESS, DEFAULT_COLOR)
    }
}

#[derive(Clone, Copy)]
enum Direction {
    FromFrame,
    ToFrame,
}

/// Moves the first `ink` channels of every pixel in `area` between the frame
/// and a tightly packed patch buffer.
fn copy_patch(frame: &mut Frame, area: Rect, ink: usize, patch: &mut [u8], direction: Direction) {
    let channels = frame.channels() as usize;
    let stride = frame.width() as usize * channels;
    let (x0, y0) = (area.x as usize, area.y as usize);
    let (w, h) = (area.width as usize, area.height as usize);
    let data = frame.data_mut();

    for row in 0..h {
        for col in 0..w {
            let src = (y0 + row) * stride + (x0 + col) * channels;
            let dst = (row * w + col) * ink;
            match direction {
                Direction::FromFrame => patch[dst..dst + ink].copy_from_slice(&data[src..src + ink]),
                Direction::ToFrame => data[src..src + ink].copy_from_slice(&patch[dst..dst + ink]),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn blank(width: u32, height: u32) -> Frame {
        Frame::filled(width, height, 3, 0, 0)
    }

    fn changed_pixels(a: &Frame, b: &Frame) -> Vec<(u32, u32)> {
        let mut out = Vec::new();
        for y in 0..a.height() {
            for x in 0..a.width() {
                if a.pixel(x, y) != b.pixel(x, y) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[rstest]
    #[case(0, "Faces: 0")]
    #[case(1, "Faces: 1")]
    #[case(12, "Faces: 12")]
    fn test_label_format(#[case] count: usize, #[case] expected: &str) {
        assert_eq!(FaceCountOverlay::label(count), expected);
    }

    #[test]
    fn test_draw_returns_label_for_count() {
        let mut frame = blank(200, 60);
        assert_eq!(FaceCountOverlay::default().draw(&mut frame, 3).unwrap(), "Faces: 3");
    }

    #[test]
    fn test_text_bounds_straddle_origin() {
        let overlay = FaceCountOverlay::default();
        let bounds = overlay.text_bounds("Faces: 0").unwrap();
        assert!(bounds.x < 10 && bounds.right() > 10);
        assert!(bounds.y < 30 && bounds.bottom() > 30);
        assert!(bounds.width > bounds.height);
    }

    #[test]
    fn test_draw_inks_only_label_area_in_green() {
        let overlay = FaceCountOverlay::default();
        let original = blank(200, 60);
        let mut frame = original.clone();
        overlay.draw(&mut frame, 7).unwrap();

        let bounds = overlay.text_bounds("Faces: 7").unwrap();
        let changed = changed_pixels(&original, &frame);
        assert!(changed.len() > 50);
        for (x, y) in changed {
            assert!(bounds.contains_point(x as i32, y as i32), "({x},{y}) outside label");
            assert_eq!(frame.pixel(x, y), &DEFAULT_COLOR);
        }
    }

    #[test]
    fn test_matches_whole_frame_rendering() {
        // Drawing through the patch gives the same pixels as drawing on a
        // full-size image.
        let overlay = FaceCountOverlay::default();
        let mut frame = blank(160, 48);
        overlay.draw(&mut frame, 4).unwrap();

        let mut full = Mat::new_rows_cols_with_default(48, 160, CV_8UC3, Scalar::all(0.0)).unwrap();
        imgproc::put_text(
            &mut full,
            "Faces: 4",
            Point::new(10, 30),
            FONT,
            DEFAULT_FONT_SCALE,
            Scalar::new(0.0, 255.0, 0.0, 0.0),
            DEFAULT_THICKNESS,
            imgproc::LINE_8,
            false,
        )
        .unwrap();
        assert_eq!(frame.data(), full.data_bytes().unwrap());
    }

    #[test]
    fn test_different_counts_render_differently() {
        let overlay = FaceCountOverlay::default();
        let mut zero = blank(200, 60);
        let mut one = blank(200, 60);
        overlay.draw(&mut zero, 0).unwrap();
        overlay.draw(&mut one, 1).unwrap();
        assert_ne!(zero, one);
    }

    #[test]
    fn test_draw_clips_to_small_frame() {
        let mut frame = blank(15, 20);
        assert!(FaceCountOverlay::default().draw(&mut frame, 5).is_ok());

        let mut tiny = blank(4, 4);
        let original = tiny.clone();
        FaceCountOverlay::default().draw(&mut tiny, 5).unwrap();
        assert_eq!(tiny, original);
    }

    #[test]
    fn test_gray_frame_uses_luma_ink() {
        let mut frame = Frame::filled(200, 60, 1, 0, 0);
        FaceCountOverlay::default().draw(&mut frame, 0).unwrap();
        assert!(frame.data().iter().any(|&v| v == 150));
        assert!(frame.data().iter().all(|&v| v == 0 || v == 150));
    }

    #[test]
    fn test_rgba_frame_keeps_alpha() {
        let mut frame = Frame::filled(200, 60, 4, 9, 0);
        FaceCountOverlay::default().draw(&mut frame, 0).unwrap();
        assert!(frame.data().chunks_exact(4).all(|px| px[3] == 9));
        assert!(frame.data().chunks_exact(4).any(|px| px[..3] == [0, 255, 0]));
    }
}
