//! High-level detection module

pub mod config;
pub mod detector;

pub use config::{DetectionConfig, RadiusMaxMode, RadiusRange};
pub use detector::{CircleDetector, DetectionResult, DetectionStats, RadiusDiagnostic};
