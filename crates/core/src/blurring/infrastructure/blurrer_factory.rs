use crate::blurring::domain::frame_blurrer::FrameBlurrer;
use crate::blurring::domain::redaction_config::RedactionConfig;
use crate::shared::config_error::ConfigError;

use super::cpu_rectangular_blurrer::CpuRectangularBlurrer;

/// Builds the blurrer for a validated redaction strength.
///
/// Refuses configurations too weak to anonymise; logs the strength chosen.
pub fn create_blurrer(config: &RedactionConfig) -> Result<Box<dyn FrameBlurrer>, ConfigError> {
    config.validate()?;
    log::info!(
        "Using CPU Gaussian blur (kernel_size={}, sigma={})",
        config.kernel_size,
        config.sigma
    );
    Ok(Box::new(CpuRectangularBlurrer::new(
        config.kernel_size,
        config.sigma,
    )))
}
