//! Coinsum Computer Vision Library
//!
//! Circle detection by radius-swept Hough voting over a binary edge map, plus
//! the preprocessing and rendering around it.

pub mod accumulator;
pub mod angles;
pub mod detection;
pub mod edge;
pub mod preprocess;
pub mod utils;
pub mod visualize;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export commonly used types
pub use accumulator::Accumulator;
pub use angles::AngleTable;
pub use detection::{CircleDetector, DetectionConfig, DetectionResult, RadiusMaxMode};
pub use edge::{EdgeImage, EdgeSentinels};
pub use preprocess::{PreprocessConfig, Preprocessor};
pub use visualize::OverlayRenderer;

// Error handling
pub type Result<T> = anyhow::Result<T>;

/// Core traits for the CV system
pub mod traits {
    use coinsum_core::{Circle, CircleSet};

    /// Decides, one candidate at a time, whether a detection is new.
    pub trait DuplicateFilter {
        /// Record `candidate` if it is new; returns whether it was kept.
        fn admit(&mut self, candidate: Circle) -> bool;
    }

    impl DuplicateFilter for CircleSet {
        fn admit(&mut self, candidate: Circle) -> bool {
            self.try_insert(candidate)
        }
    }
}
