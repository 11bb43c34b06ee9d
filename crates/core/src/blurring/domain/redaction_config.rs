use crate::shared::config_error::ConfigError;

pub const DEFAULT_KERNEL_SIZE: usize = 99;
pub const DEFAULT_SIGMA: f64 = 30.0;

/// Weakest blur accepted for redaction. Anything smaller leaves enough
/// low-frequency structure to recognise a face at webcam resolutions.
pub const MIN_KERNEL_SIZE: usize = 31;
pub const MIN_SIGMA: f64 = 8.0;

/// Strength of the Gaussian blur applied to each face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RedactionConfig {
    pub kernel_size: usize,
    pub sigma: f64,
}

impl RedactionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.kernel_size % 2 == 0 {
            return Err(ConfigError::EvenKernel(self.kernel_size));
        }
        if self.kernel_size < MIN_KERNEL_SIZE {
            return Err(ConfigError::WeakKernel {
                got: self.kernel_size,
                min: MIN_KERNEL_SIZE,
            });
        }
        if self.sigma.is_nan() || self.sigma < MIN_SIGMA {
            return Err(ConfigError::WeakSigma {
                got: self.sigma,
                min: MIN_SIGMA,
            });
        }
        Ok(())
    }
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            kernel_size: DEFAULT_KERNEL_SIZE,
            sigma: DEFAULT_SIGMA,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_is_valid() {
        let config = RedactionConfig::default();
        assert_eq!(config.kernel_size, 99);
        assert_eq!(config.sigma, 30.0);
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case::even(RedactionConfig { kernel_size: 100, sigma: 30.0 }, ConfigError::EvenKernel(100))]
    #[case::small_kernel(
        RedactionConfig { kernel_size: 5, sigma: 30.0 },
        ConfigError::WeakKernel { got: 5, min: MIN_KERNEL_SIZE }
    )]
    #[case::small_sigma(
        RedactionConfig { kernel_size: 99, sigma: 1.5 },
        ConfigError::WeakSigma { got: 1.5, min: MIN_SIGMA }
    )]
    fn test_rejects_weak_blur(#[case] config: RedactionConfig, #[case] expected: ConfigError) {
        assert_eq!(config.validate(), Err(expected));
    }

    #[test]
    fn test_rejects_nan_sigma() {
        let config = RedactionConfig {
            sigma: f64::NAN,
            ..RedactionConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::WeakSigma { .. })));
    }
}
