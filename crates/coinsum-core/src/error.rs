//! Error taxonomy shared by the detector and the coin classifier.

use thiserror::Error;

/// Where an upper radius bound came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadiusSource {
    /// Fixed cap taken from configuration.
    FixedCap,
    /// Half of the shorter image dimension (the dimension is carried along).
    HalfShorterDimension { dimension: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectionError {
    #[error("edge image is empty ({rows}x{cols})")]
    EmptyImage { rows: usize, cols: usize },

    #[error("edge image buffer has {actual} values, expected {expected} for {rows}x{cols}")]
    SizeMismatch {
        rows: usize,
        cols: usize,
        expected: usize,
        actual: usize,
    },

    #[error(
        "edge image is not binary: value {value} at row {row}, col {col} \
         (background {background}, edge {edge})"
    )]
    NotBinary {
        row: usize,
        col: usize,
        value: u8,
        background: u8,
        edge: u8,
    },

    #[error("edge and background sentinels are both {value}")]
    DegenerateSentinels { value: u8 },

    #[error("invalid radius range [{r_min}, {r_max}] ({origin:?})")]
    InvalidRange {
        r_min: u32,
        r_max: u32,
        origin: RadiusSource,
    },

    #[error("vote threshold {threshold} outside 1..={angle_samples}")]
    InvalidThreshold { threshold: u32, angle_samples: usize },

    #[error("angle table needs at least one sample")]
    EmptyAngleTable,

    #[error("no circles detected over radii {r_min}..={r_max}")]
    NoDetections { r_min: u32, r_max: u32 },
}

impl DetectionError {
    /// Malformed or empty edge image.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::EmptyImage { .. }
                | Self::SizeMismatch { .. }
                | Self::NotBinary { .. }
                | Self::DegenerateSentinels { .. }
        )
    }

    pub fn is_invalid_range(&self) -> bool {
        matches!(self, Self::InvalidRange { .. })
    }
}
