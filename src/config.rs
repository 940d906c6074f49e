//! Process-wide tunables for scratch arenas and parallel drivers

use crate::{Result, TreeError};

/// Largest tree order served from a pre-sized arena buffer
pub const BUFFER_LENGTH: usize = 64;

/// Edge count above which exhaustive partition enumeration runs on rayon
pub const PARALLEL_THRESHOLD: usize = 8;

/// Configuration shared by all workers
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Length of every pooled scratch buffer; larger trees allocate per call
    pub buffer_length: usize,
    /// Trees with more edges than this enumerate partitions in parallel
    pub parallel_threshold: usize,
}

impl Config {
    /// Config that never hands work to rayon
    pub fn sequential() -> Self {
        Config {
            parallel_threshold: usize::MAX,
            ..Self::default()
        }
    }

    /// Config with arenas sized for trees up to `max_order`
    pub fn for_max_order(max_order: usize) -> Self {
        Config {
            buffer_length: max_order,
            ..Self::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.buffer_length == 0 {
            return Err(TreeError::InvalidConfig(
                "Buffer length must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            buffer_length: BUFFER_LENGTH,
            parallel_threshold: PARALLEL_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.buffer_length = 0;
        assert!(matches!(config.validate(), Err(TreeError::InvalidConfig(_))));
    }

    #[test]
    fn test_predefined_configs() {
        assert_eq!(Config::sequential().parallel_threshold, usize::MAX);
        assert_eq!(Config::sequential().buffer_length, BUFFER_LENGTH);
        assert_eq!(Config::for_max_order(12).buffer_length, 12);
        assert!(Config::for_max_order(0).validate().is_err());
    }
}
