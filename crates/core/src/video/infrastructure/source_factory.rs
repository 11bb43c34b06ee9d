use crate::video::domain::frame_source::{FrameSource, SourceSpec, SourceUnavailable};

use super::camera_source::CameraSource;
use super::ffmpeg_file_source::FfmpegFileSource;

/// Opens the source named by `spec`, failing fast before any frame is read.
pub fn open_source(spec: &SourceSpec) -> Result<Box<dyn FrameSource>, SourceUnavailable> {
    let source: Box<dyn FrameSource> = match spec {
        SourceSpec::Camera(index) => Box::new(CameraSource::open(*index)?),
        SourceSpec::File(path) => Box::new(FfmpegFileSource::open(path)?),
    };
    let meta = source.metadata();
    let length = if meta.is_live() {
        "live".to_string()
    } else if meta.total_frames > 0 {
        format!("{} frames", meta.total_frames)
    } else {
        "length unknown".to_string()
    };
    log::info!(
        "Opened {spec}: {}x{} @ {:.1} fps, {length}",
        meta.width,
        meta.height,
        meta.fps
    );
    Ok(source)
}
