// ============================================================
// NORMALIZER CONFIGURATION
// ============================================================
// Threshold values for phone detection and handle cleanup

use serde::{Deserialize, Serialize};

/// Configuration for lead normalization heuristics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Minimum digit count for a cleaned value to count as a phone (default: 8)
    pub min_phone_digits: usize,

    /// Digit-to-length ratio above which a handle is treated as a phone
    /// (default: 0.8)
    pub digit_ratio_threshold: f32,

    /// Minimum value length before the digit-ratio rule applies (default: 6)
    /// Short tokens like "2024" would otherwise trip the ratio check
    pub digit_ratio_min_len: usize,

    /// Handle length above which a non-platform value is discarded as a
    /// tracking link (default: 50)
    pub max_handle_length: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            min_phone_digits: 8,
            digit_ratio_threshold: 0.8,
            digit_ratio_min_len: 6,
            max_handle_length: 50,
        }
    }
}

impl NormalizerConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.min_phone_digits == 0 {
            return Err("min_phone_digits must be > 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.digit_ratio_threshold) {
            return Err("digit_ratio_threshold must be between 0.0 and 1.0".to_string());
        }
        if self.max_handle_length == 0 {
            return Err("max_handle_length must be > 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(NormalizerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_ratio_rejected() {
        let config = NormalizerConfig {
            digit_ratio_threshold: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
