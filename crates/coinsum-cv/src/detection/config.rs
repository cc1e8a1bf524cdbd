//! Detection configuration

use crate::edge::EdgeSentinels;
use crate::Result;
use anyhow::Context;
use coinsum_core::{DetectionError, RadiusSource};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the upper end of the radius sweep is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadiusMaxMode {
    /// Stop at a fixed radius.
    FixedCap(u32),
    /// Sweep up to half the shorter image dimension (slow, exhaustive).
    HalfShorterDimension,
}

impl Default for RadiusMaxMode {
    fn default() -> Self {
        RadiusMaxMode::FixedCap(70)
    }
}

/// Inclusive radius interval swept by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadiusRange {
    pub min: u32,
    pub max: u32,
}

impl RadiusRange {
    pub fn new(min: u32, max: u32, origin: RadiusSource) -> std::result::Result<Self, DetectionError> {
        if min < 1 || max <= min {
            return Err(DetectionError::InvalidRange {
                r_min: min,
                r_max: max,
                origin,
            });
        }
        Ok(Self { min, max })
    }

    pub fn iter(&self) -> std::ops::RangeInclusive<u32> {
        self.min..=self.max
    }

    pub fn len(&self) -> usize {
        (self.max - self.min + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.max < self.min
    }
}

/// Main detection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub radius_min: u32,
    pub radius_max_mode: RadiusMaxMode,
    pub angle_sample_count: usize,
    pub vote_threshold: u32,
    pub sentinels: EdgeSentinels,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            radius_min: 26,
            radius_max_mode: RadiusMaxMode::default(),
            angle_sample_count: 180,
            vote_threshold: 160,
            sentinels: EdgeSentinels::default(),
        }
    }
}

impl DetectionConfig {
    /// Search every radius the image can hold instead of stopping at the cap.
    pub fn exhaustive() -> Self {
        Self {
            radius_max_mode: RadiusMaxMode::HalfShorterDimension,
            ..Default::default()
        }
    }

    /// Lower vote threshold for clean synthetic or high-contrast edge maps.
    pub fn lenient() -> Self {
        Self {
            vote_threshold: 150,
            ..Default::default()
        }
    }

    /// Check everything that does not depend on the image.
    pub fn validate(&self) -> std::result::Result<(), DetectionError> {
        if self.angle_sample_count == 0 {
            return Err(DetectionError::EmptyAngleTable);
        }
        if self.vote_threshold == 0 || self.vote_threshold as usize > self.angle_sample_count {
            return Err(DetectionError::InvalidThreshold {
                threshold: self.vote_threshold,
                angle_samples: self.angle_sample_count,
            });
        }
        self.sentinels.check()?;
        // The half-dimension bound needs the image; `radius_range` checks it.
        if let RadiusMaxMode::FixedCap(cap) = self.radius_max_mode {
            RadiusRange::new(self.radius_min, cap, RadiusSource::FixedCap)?;
        }
        Ok(())
    }

    /// Resolve the sweep for an image of the given size.
    pub fn radius_range(
        &self,
        rows: usize,
        cols: usize,
    ) -> std::result::Result<RadiusRange, DetectionError> {
        match self.radius_max_mode {
            RadiusMaxMode::FixedCap(cap) => {
                RadiusRange::new(self.radius_min, cap, RadiusSource::FixedCap)
            }
            RadiusMaxMode::HalfShorterDimension => {
                let dimension = rows.min(cols);
                let cap = u32::try_from(dimension / 2).unwrap_or(u32::MAX);
                RadiusRange::new(
                    self.radius_min,
                    cap,
                    RadiusSource::HalfShorterDimension { dimension },
                )
            }
        }
    }

    /// Load a JSON configuration; missing fields keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DetectionConfig::default();
        assert_eq!(config.radius_min, 26);
        assert_eq!(config.radius_max_mode, RadiusMaxMode::FixedCap(70));
        assert_eq!(config.angle_sample_count, 180);
        assert_eq!(config.vote_threshold, 160);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fixed_cap_range_ignores_image() -> std::result::Result<(), DetectionError> {
        let range = DetectionConfig::default().radius_range(10, 10)?;
        assert_eq!((range.min, range.max), (26, 70));
        assert_eq!(range.len(), 45);
        Ok(())
    }

    #[test]
    fn test_half_shorter_dimension() -> std::result::Result<(), DetectionError> {
        let range = DetectionConfig::exhaustive().radius_range(400, 300)?;
        assert_eq!((range.min, range.max), (26, 150));
        Ok(())
    }

    #[test]
    fn test_half_dimension_too_small_reports_dimension() {
        let err = DetectionConfig::exhaustive().radius_range(40, 100).unwrap_err();
        assert_eq!(
            err,
            DetectionError::InvalidRange {
                r_min: 26,
                r_max: 20,
                origin: RadiusSource::HalfShorterDimension { dimension: 40 },
            }
        );
    }

    #[test]
    fn test_inverted_and_degenerate_ranges() {
        let inverted = DetectionConfig {
            radius_min: 30,
            radius_max_mode: RadiusMaxMode::FixedCap(20),
            ..Default::default()
        };
        assert!(inverted.validate().unwrap_err().is_invalid_range());

        let equal = DetectionConfig {
            radius_min: 30,
            radius_max_mode: RadiusMaxMode::FixedCap(30),
            ..Default::default()
        };
        assert!(equal.validate().unwrap_err().is_invalid_range());

        let zero_min = DetectionConfig {
            radius_min: 0,
            ..Default::default()
        };
        assert!(zero_min.validate().unwrap_err().is_invalid_range());
    }

    #[test]
    fn test_zero_min_with_half_dimension_reports_real_bounds() {
        let config = DetectionConfig {
            radius_min: 0,
            ..DetectionConfig::exhaustive()
        };
        assert!(config.validate().is_ok());
        assert_eq!(
            config.radius_range(100, 120).unwrap_err(),
            DetectionError::InvalidRange {
                r_min: 0,
                r_max: 50,
                origin: RadiusSource::HalfShorterDimension { dimension: 100 },
            }
        );
    }

    #[test]
    fn test_equal_sentinels_rejected() {
        let config = DetectionConfig {
            sentinels: EdgeSentinels {
                background: 9,
                edge: 9,
            },
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(err, DetectionError::DegenerateSentinels { value: 9 });
    }

    #[test]
    fn test_threshold_bounds() {
        let zero = DetectionConfig {
            vote_threshold: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero.validate(),
            Err(DetectionError::InvalidThreshold { threshold: 0, .. })
        ));

        let too_high = DetectionConfig {
            vote_threshold: 181,
            ..Default::default()
        };
        assert!(too_high.validate().is_err());

        let at_limit = DetectionConfig {
            vote_threshold: 180,
            ..Default::default()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn test_json_partial_override() -> anyhow::Result<()> {
        let config: DetectionConfig = serde_json::from_str(
            r#"{ "vote_threshold": 150, "radius_max_mode": "half_shorter_dimension" }"#,
        )?;
        assert_eq!(config.vote_threshold, 150);
        assert_eq!(config.radius_max_mode, RadiusMaxMode::HalfShorterDimension);
        assert_eq!(config.radius_min, 26);

        let capped: DetectionConfig =
            serde_json::from_str(r#"{ "radius_max_mode": { "fixed_cap": 90 } }"#)?;
        assert_eq!(capped.radius_max_mode, RadiusMaxMode::FixedCap(90));

        let round_trip: DetectionConfig =
            serde_json::from_str(&serde_json::to_string(&DetectionConfig::exhaustive())?)?;
        assert_eq!(round_trip, DetectionConfig::exhaustive());
        Ok(())
    }
}
