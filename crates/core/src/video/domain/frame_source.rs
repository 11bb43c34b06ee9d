use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::shared::constants::DEFAULT_CAMERA_INDEX;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Where frames come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceSpec {
    Camera(u32),
    File(PathBuf),
}

impl SourceSpec {
    /// Maps the optional command-line argument: absent selects the default
    /// camera, anything else is a file path.
    pub fn from_arg(arg: Option<PathBuf>) -> Self {
        match arg {
            Some(path) => SourceSpec::File(path),
            None => SourceSpec::Camera(DEFAULT_CAMERA_INDEX),
        }
    }
}

impl fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceSpec::Camera(index) => write!(f, "camera {index}"),
            SourceSpec::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// The source could not be initialised; no frame was read.
#[derive(Error, Debug)]
#[error("could not open video source {spec}: {reason}")]
pub struct SourceUnavailable {
    pub spec: SourceSpec,
    pub reason: String,
}

impl SourceUnavailable {
    pub fn new(spec: &SourceSpec, reason: impl fmt::Display) -> Self {
        Self {
            spec: spec.clone(),
            reason: reason.to_string(),
        }
    }
}

/// An open stream of frames, pulled one at a time.
///
/// `next_frame` returns `Ok(None)` at end of stream (file exhausted or
/// device gone). `Err` means this read failed but the stream may still be
/// alive; the caller decides whether to retry.
pub trait FrameSource {
    fn metadata(&self) -> &VideoMetadata;

    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;

    /// Releases the underlying device or file. Safe to call more than once.
    fn close(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_argument_selects_default_camera() {
        assert_eq!(SourceSpec::from_arg(None), SourceSpec::Camera(0));
    }

    #[test]
    fn test_argument_is_a_file_path() {
        assert_eq!(
            SourceSpec::from_arg(Some(PathBuf::from("clip.mp4"))),
            SourceSpec::File(PathBuf::from("clip.mp4"))
        );
    }

    #[test]
    fn test_numeric_argument_is_still_a_path() {
        assert_eq!(
            SourceSpec::from_arg(Some(PathBuf::from("1"))),
            SourceSpec::File(PathBuf::from("1"))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(SourceSpec::Camera(2).to_string(), "camera 2");
        assert_eq!(
            SourceSpec::File(PathBuf::from("/tmp/a.mp4")).to_string(),
            "/tmp/a.mp4"
        );
    }

    #[test]
    fn test_unavailable_message_names_source() {
        let err = SourceUnavailable::new(&SourceSpec::File("/x.mp4".into()), "No such file");
        assert_eq!(
            err.to_string(),
            "could not open video source /x.mp4: No such file"
        );
    }
}
