use std::cell::RefCell;

use ndarray::s;
use opencv::core::{Mat, Scalar, Size, CV_8UC1, CV_8UC2, CV_8UC3, CV_8UC4};
use opencv::imgproc;
use opencv::prelude::*;

use crate::blurring::domain::frame_blurrer::FrameBlurrer;
use crate::shared::frame::Frame;
use crate::shared::rect::Rect;

/// CPU Gaussian blurrer that replaces each whole rectangle with its blur.
///
/// Regions are clamped to the frame first, so boxes that overhang an edge
/// blur only their visible part. Each region is copied into its own matrix
/// and blurred there with `BORDER_REFLECT_101`, so only pixels inside the
/// rectangle feed the blur and nothing from outside bleeds in.
pub struct CpuRectangularBlurrer {
    kernel_size: i32,
    /// Zero lets OpenCV derive sigma from the kernel size.
    sigma: f64,
    roi: RefCell<Mat>,
    blurred: RefCell<Mat>,
}

impl CpuRectangularBlurrer {
    /// An even `kernel_size` is bumped to the next odd one.
    pub fn new(kernel_size: usize, sigma: f64) -> Self {
        let kernel_size = i32::try_from(kernel_size.max(1) | 1).unwrap_or(i32::MAX);
        Self {
            kernel_size,
            sigma: sigma.max(0.0),
            roi: RefCell::new(Mat::default()),
            blurred: RefCell::new(Mat::default()),
        }
    }

    pub fn kernel_size(&self) -> usize {
        self.kernel_size as usize
    }
}

impl FrameBlurrer for CpuRectangularBlurrer {
    fn blur(&self, frame: &mut Frame, regions: &[Rect]) -> Result<(), Box<dyn std::error::Error>> {
        let (fw, fh) = (frame.width(), frame.height());
        let mat_type = mat_type_for(frame.channels())?;
        let ksize = Size::new(self.kernel_size, self.kernel_size);
        let mut pixels = frame.as_ndarray_mut();
        let mut roi = self.roi.borrow_mut();
        let mut blurred = self.blurred.borrow_mut();

        for region in regions {
            let Some(r) = region.clamp_to(fw, fh) else {
                continue;
            };
            let (x0, y0) = (r.x as usize, r.y as usize);
            let (w, h) = (r.width as usize, r.height as usize);
            let mut view = pixels.slice_mut(s![y0..y0 + h, x0..x0 + w, ..]);

            if roi.rows() != r.height || roi.cols() != r.width || roi.typ() != mat_type {
                *roi = Mat::new_rows_cols_with_default(r.height, r.width, mat_type, Scalar::all(0.0))?;
            }
            for (dst, &src) in roi.data_bytes_mut()?.iter_mut().zip(view.iter()) {
                *dst = src;
            }

            // Default border is BORDER_REFLECT_101.
            imgproc::gaussian_blur_def(&*roi, &mut *blurred, ksize, self.sigma)?;

            for (dst, &src) in view.iter_mut().zip(blurred.data_bytes()?) {
                *dst = src;
            }
        }

        Ok(())
    }
}

fn mat_type_for(channels: u8) -> Result<i32, Box<dyn std::error::Error>> {
    Ok(match channels {
        1 => CV_8UC1,
        2 => CV_8UC2,
        3 => CV_8UC3,
        4 => CV_8UC4,
        n => return Err(format!("cannot blur {n}-channel frame").into()),
    })
}
