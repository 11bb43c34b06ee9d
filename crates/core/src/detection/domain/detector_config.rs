use crate::shared::config_error::ConfigError;

pub const DEFAULT_SCALE_FACTOR: f64 = 1.1;
pub const DEFAULT_MIN_NEIGHBORS: u32 = 5;
pub const DEFAULT_MIN_FACE_SIZE: u32 = 30;

/// Recall versus false-positive trade-off for the detector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectorConfig {
    /// Shrink factor between successive pyramid levels.
    pub scale_factor: f64,
    /// Overlapping candidates needed before a box is accepted.
    pub min_neighbors: u32,
    /// Smallest accepted face, `(width, height)` in pixels.
    pub min_size: (u32, u32),
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.scale_factor.is_finite() || self.scale_factor <= 1.0 {
            return Err(ConfigError::ScaleFactor(self.scale_factor));
        }
        let (width, height) = self.min_size;
        if width == 0 || height == 0 {
            return Err(ConfigError::MinSize { width, height });
        }
        Ok(())
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            min_neighbors: DEFAULT_MIN_NEIGHBORS,
            min_size: (DEFAULT_MIN_FACE_SIZE, DEFAULT_MIN_FACE_SIZE),
        }
    }
}
