use std::path::PathBuf;

/// What a source reports about its stream when opened.
///
/// `total_frames` is 0 when unknown, which is always the case for cameras.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub total_frames: usize,
    pub codec: String,
    pub source_path: Option<PathBuf>,
}

impl VideoMetadata {
    pub fn is_live(&self) -> bool {
        self.source_path.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_metadata_is_not_live() {
        let meta = VideoMetadata {
            width: 1920,
            height: 1080,
            fps: 30.0,
            total_frames: 900,
            codec: "h264".to_string(),
            source_path: Some(PathBuf::from("/tmp/test.mp4")),
        };
        assert!(!meta.is_live());
        assert_eq!(meta.total_frames, 900);
    }

    #[test]
    fn test_camera_metadata_is_live() {
        let meta = VideoMetadata {
            width: 640,
            height: 480,
            fps: 30.0,
            total_frames: 0,
            codec: String::new(),
            source_path: None,
        };
        assert!(meta.is_live());
        assert_eq!(meta.clone(), meta);
    }
}
