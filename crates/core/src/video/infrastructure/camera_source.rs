use opencv::core::Mat;
use opencv::prelude::*;
use opencv::videoio;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::frame_source::{FrameSource, SourceSpec, SourceUnavailable};

/// Live frames from a camera device through OpenCV's `VideoCapture`.
///
/// A failed read on a device that is still open is reported as an error so
/// the caller can retry; once the device reports closed the stream ends.
pub struct CameraSource {
    capture: Option<videoio::VideoCapture>,
    buffer: Mat,
    metadata: VideoMetadata,
    next_index: usize,
}

impl CameraSource {
    pub fn open(index: u32) -> Result<Self, SourceUnavailable> {
        let spec = SourceSpec::Camera(index);
        let capture = videoio::VideoCapture::new(index as i32, videoio::CAP_ANY)
            .map_err(|e| SourceUnavailable::new(&spec, e))?;
        let opened = capture
            .is_opened()
            .map_err(|e| SourceUnavailable::new(&spec, e))?;
        if !opened {
            return Err(SourceUnavailable::new(&spec, "device could not be opened"));
        }

        let prop = |id: i32| capture.get(id).unwrap_or(0.0);
        let metadata = VideoMetadata {
            width: prop(videoio::CAP_PROP_FRAME_WIDTH).max(0.0) as u32,
            height: prop(videoio::CAP_PROP_FRAME_HEIGHT).max(0.0) as u32,
            fps: prop(videoio::CAP_PROP_FPS).max(0.0),
            total_frames: 0,
            codec: String::new(),
            source_path: None,
        };
        log::debug!(
            "Opened camera {index} ({}x{} @ {:.1} fps)",
            metadata.width,
            metadata.height,
            metadata.fps
        );

        Ok(Self {
            capture: Some(capture),
            buffer: Mat::default(),
            metadata,
            next_index: 0,
        })
    }
}

impl FrameSource for CameraSource {
    fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let Some(capture) = self.capture.as_mut() else {
            return Ok(None);
        };

        let grabbed = capture.read(&mut self.buffer)?;
        if !grabbed || self.buffer.empty() {
            if !capture.is_opened()? {
                log::info!("Camera disconnected");
                return Ok(None);
            }
            return Err("camera returned no frame".into());
        }

        let frame = mat_to_rgb_frame(&self.buffer, self.next_index)?;
        self.next_index += 1;
        Ok(Some(frame))
    }

    fn close(&mut self) {
        if let Some(mut capture) = self.capture.take() {
            if let Err(e) = capture.release() {
                log::warn!("Failed to release camera: {e}");
            }
        }
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        self.close();
    }
}

/// Copies an 8-bit BGR, BGRA or grey `Mat` into an RGB [`Frame`].
fn mat_to_rgb_frame(mat: &Mat, index: usize) -> Result<Frame, Box<dyn std::error::Error>> {
    if mat.depth() != opencv::core::CV_8U {
        return Err(format!("unsupported camera pixel depth {}", mat.depth()).into());
    }
    let owned;
    let mat = if mat.is_continuous() {
        mat
    } else {
        owned = mat.try_clone()?;
        &owned
    };

    let width = mat.cols() as u32;
    let height = mat.rows() as u32;
    let channels = mat.channels() as usize;
    let data = bgr_to_rgb(mat.data_bytes()?, channels)?;
    Ok(Frame::new(data, width, height, 3, index))
}

/// Reorders OpenCV's BGR(A)/grey pixel bytes into packed RGB.
fn bgr_to_rgb(src: &[u8], channels: usize) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    match channels {
        1 => Ok(src.iter().flat_map(|&v| [v, v, v]).collect()),
        3 | 4 => Ok(src
            .chunks_exact(channels)
            .flat_map(|px| [px[2], px[1], px[0]])
            .collect()),
        n => Err(format!("unsupported camera channel count {n}").into()),
    }
}
