use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use opencv::core::{Mat, Scalar, CV_8UC3};
use opencv::highgui;
use opencv::prelude::*;

use crate::shared::constants::{KEY_POLL_MS, QUIT_KEY};
use crate::shared::frame::Frame;
use crate::video::domain::presenter::Presenter;

/// Shows frames in a single OpenCV HighGUI window.
///
/// Quit is requested either by the quit key in the window or by the shared
/// interrupt flag, which the binary's Ctrl-C handler sets.
pub struct HighGuiPresenter {
    title: String,
    interrupted: Arc<AtomicBool>,
    window_open: bool,
    canvas: Mat,
}

impl HighGuiPresenter {
    pub fn new(title: impl Into<String>, interrupted: Arc<AtomicBool>) -> Self {
        Self {
            title: title.into(),
            interrupted,
            window_open: false,
            canvas: Mat::default(),
        }
    }

    fn ensure_window(&mut self) -> opencv::Result<()> {
        if !self.window_open {
            highgui::named_window(&self.title, highgui::WINDOW_AUTOSIZE)?;
            self.window_open = true;
        }
        Ok(())
    }

    /// Writes `frame` as BGR into the reused canvas matrix.
    fn upload(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let (w, h) = (frame.width() as i32, frame.height() as i32);
        if self.canvas.rows() != h || self.canvas.cols() != w {
            self.canvas = Mat::new_rows_cols_with_default(h, w, CV_8UC3, Scalar::all(0.0))?;
        }
        rgb_to_bgr(
            frame.data(),
            frame.channels() as usize,
            self.canvas.data_bytes_mut()?,
        )
    }
}

impl Presenter for HighGuiPresenter {
    fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if frame.width() == 0 || frame.height() == 0 {
            return Err("cannot display an empty frame".into());
        }
        self.ensure_window()?;
        self.upload(frame)?;
        highgui::imshow(&self.title, &self.canvas)?;
        Ok(())
    }

    fn poll_quit(&mut self) -> Result<bool, Box<dyn std::error::Error>> {
        let key = highgui::wait_key(KEY_POLL_MS)?;
        if is_quit_key(key) {
            log::debug!("Quit key pressed");
            return Ok(true);
        }
        Ok(self.interrupted.load(Ordering::SeqCst))
    }

    fn close(&mut self) {
        if !self.window_open {
            return;
        }
        self.window_open = false;
        if let Err(e) = highgui::destroy_window(&self.title) {
            log::warn!("Failed to destroy window: {e}");
        }
        // HighGUI only processes the destroy on the next event pump.
        if let Err(e) = highgui::wait_key(KEY_POLL_MS) {
            log::debug!("Event pump after destroy failed: {e}");
        }
    }
}

impl Drop for HighGuiPresenter {
    fn drop(&mut self) {
        self.close();
    }
}

/// `wait_key` returns -1 for no key; some backends set high modifier bits.
fn is_quit_key(code: i32) -> bool {
    if code < 0 {
        return false;
    }
    char::from((code & 0xFF) as u8).eq_ignore_ascii_case(&QUIT_KEY)
}

fn rgb_to_bgr(src: &[u8], channels: usize, dst: &mut [u8]) -> Result<(), Box<dyn std::error::Error>> {
    match channels {
        1 => {
            for (px, &v) in dst.chunks_exact_mut(3).zip(src) {
                px.fill(v);
            }
        }
        3 | 4 => {
            for (px, s) in dst.chunks_exact_mut(3).zip(src.chunks_exact(channels)) {
                px.copy_from_slice(&[s[2], s[1], s[0]]);
            }
        }
        n => return Err(format!("cannot display {n}-channel frame").into()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(b'q' as i32, true)]
    #[case(b'Q' as i32, true)]
    #[case(0x10_0071, true)]
    #[case(-1, false)]
    #[case(27, false)]
    #[case(b'w' as i32, false)]
    fn test_quit_key_decoding(#[case] code: i32, #[case] expected: bool) {
        assert_eq!(is_quit_key(code), expected);
    }

    #[test]
    fn test_rgb_to_bgr() {
        let mut dst = [0u8; 6];
        rgb_to_bgr(&[1, 2, 3, 4, 5, 6], 3, &mut dst).unwrap();
        assert_eq!(dst, [3, 2, 1, 6, 5, 4]);
    }

    #[test]
    fn test_rgba_and_grey_to_bgr() {
        let mut dst = [0u8; 3];
        rgb_to_bgr(&[1, 2, 3, 200], 4, &mut dst).unwrap();
        assert_eq!(dst, [3, 2, 1]);
        rgb_to_bgr(&[9], 1, &mut dst).unwrap();
        assert_eq!(dst, [9, 9, 9]);
    }

    #[test]
    fn test_unsupported_layout_rejected() {
        let mut dst = [0u8; 3];
        assert!(rgb_to_bgr(&[1, 2], 2, &mut dst).is_err());
    }

    #[test]
    fn test_close_without_window_is_noop() {
        let mut presenter = HighGuiPresenter::new("test", Arc::new(AtomicBool::new(false)));
        presenter.close();
        presenter.close();
        assert!(!presenter.window_open);
    }
}
