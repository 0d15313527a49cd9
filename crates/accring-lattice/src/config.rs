//! Lattice configuration.

use crate::error::ConfigError;
use accring_core::constants::LENGTH_TOLERANCE;

/// Tunables shared by every element of a [`Lattice`](crate::Lattice).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatticeConfig {
    /// Subtracted from an element's length to get its physical length when
    /// none is set explicitly, m. Default: 0.
    pub fringe_offset: f64,
    /// Slack allowed when comparing footprint boundaries, m. Default: 1e-9.
    pub length_tolerance: f64,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            fringe_offset: 0.0,
            length_tolerance: LENGTH_TOLERANCE,
        }
    }
}

impl LatticeConfig {
    /// Check that all values are in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fringe_offset.is_finite() || self.fringe_offset < 0.0 {
            return Err(ConfigError::InvalidFringeOffset {
                value: self.fringe_offset,
            });
        }
        if !self.length_tolerance.is_finite() || self.length_tolerance <= 0.0 {
            return Err(ConfigError::InvalidTolerance {
                value: self.length_tolerance,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(LatticeConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        let cfg = LatticeConfig {
            fringe_offset: -0.1,
            ..LatticeConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidFringeOffset { value: -0.1 })
        );
        let cfg = LatticeConfig {
            length_tolerance: f64::NAN,
            ..LatticeConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidTolerance { .. })
        ));
    }
}
