use thiserror::Error;

/// Rejected tuning values for detection or redaction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("scale factor must be greater than 1.0, got {0}")]
    ScaleFactor(f64),
    #[error("minimum face size must be at least 1x1, got {width}x{height}")]
    MinSize { width: u32, height: u32 },
    #[error("blur kernel size must be odd, got {0}")]
    EvenKernel(usize),
    #[error("blur kernel size {got} is below the minimum of {min} needed to destroy facial detail")]
    WeakKernel { got: usize, min: usize },
    #[error("blur sigma {got} is below the minimum of {min} needed to destroy facial detail")]
    WeakSigma { got: f64, min: f64 },
}
