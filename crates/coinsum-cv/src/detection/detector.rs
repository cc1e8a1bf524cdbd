//! Radius-sweep circle detector built on per-radius vote accumulators

use super::config::{DetectionConfig, RadiusRange};
use crate::accumulator::Accumulator;
use crate::angles::AngleTable;
use crate::edge::EdgeImage;
use crate::traits::DuplicateFilter;
use crate::utils::ImageUtils;
use crate::Result;
use anyhow::Context;
use coinsum_core::{Circle, CircleSet, DetectionError};
use serde::Serialize;
use std::path::Path;

/// Per-radius telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RadiusDiagnostic {
    pub radius: u32,
    pub max_vote: u32,
    /// Cells that survived thresholding (zero when `max_vote` did not exceed it).
    pub peaks: usize,
    /// Peaks the duplicate filter let through.
    pub admitted: usize,
}

/// Detection statistics
#[derive(Debug, Clone, Serialize)]
pub struct DetectionStats {
    pub edge_pixels: usize,
    pub radii_swept: usize,
    pub total_detections: usize,
    pub processing_time_ms: u64,
}

/// Circles plus the telemetry collected while finding them.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionResult {
    pub circles: CircleSet,
    pub radius_range: RadiusRange,
    pub radius_diagnostics: Vec<RadiusDiagnostic>,
    pub stats: DetectionStats,
}

/// Thresholded peaks of one finished accumulator, in raster order.
#[derive(Debug, Clone)]
struct RadiusPeaks {
    radius: u32,
    max_vote: u32,
    peaks: Vec<Circle>,
}

/// Brute-force circle Hough transform over a range of radii.
pub struct CircleDetector {
    config: DetectionConfig,
    angles: AngleTable,
}

impl CircleDetector {
    /// Create new detector
    pub fn new(config: DetectionConfig) -> std::result::Result<Self, DetectionError> {
        config.validate()?;
        let angles = AngleTable::new(config.angle_sample_count)?;
        Ok(Self { config, angles })
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Detect circles in an already binarized image file.
    pub fn detect_from_file<P: AsRef<Path>>(&self, image_path: P) -> Result<DetectionResult> {
        let gray = ImageUtils::load_grayscale(&image_path)
            .with_context(|| format!("Failed to load image: {:?}", image_path.as_ref()))?;
        self.detect_from_gray(&gray)
            .with_context(|| format!("Detection failed for {:?}", image_path.as_ref()))
    }

    /// Detect circles in a binarized grayscale image.
    pub fn detect_from_gray(&self, image: &image::GrayImage) -> Result<DetectionResult> {
        let edges = EdgeImage::from_gray(image, self.config.sentinels)?;
        Ok(self.detect(&edges)?)
    }

    /// Sweep every radius in increasing order and merge the peaks into a
    /// duplicate-free circle set.
    pub fn detect(&self, edges: &EdgeImage) -> std::result::Result<DetectionResult, DetectionError> {
        let start_time = std::time::Instant::now();
        let range = self.config.radius_range(edges.rows(), edges.cols())?;

        tracing::debug!(
            rows = edges.rows(),
            cols = edges.cols(),
            r_min = range.min,
            r_max = range.max,
            threshold = self.config.vote_threshold,
            "starting radius sweep"
        );

        #[cfg(feature = "parallel")]
        let sweeps = self.sweep_parallel(edges, range);
        #[cfg(not(feature = "parallel"))]
        let sweeps = self.sweep_sequential(edges, range);

        let mut circles = CircleSet::new();
        let radius_diagnostics = merge_sweeps(&mut circles, sweeps);

        let stats = DetectionStats {
            edge_pixels: edges.edge_count(),
            radii_swept: range.len(),
            total_detections: circles.len(),
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        };

        if circles.is_empty() {
            tracing::warn!(
                r_min = range.min,
                r_max = range.max,
                edge_pixels = stats.edge_pixels,
                "no circles detected"
            );
        } else {
            tracing::info!(
                "{} circles detected over radii {}..={} in {}ms",
                circles.len(),
                range.min,
                range.max,
                stats.processing_time_ms
            );
        }

        Ok(DetectionResult {
            circles,
            radius_range: range,
            radius_diagnostics,
            stats,
        })
    }

    #[cfg_attr(all(feature = "parallel", not(test)), allow(dead_code))]
    fn sweep_sequential(&self, edges: &EdgeImage, range: RadiusRange) -> Vec<RadiusPeaks> {
        range.iter().map(|r| self.sweep_radius(edges, r)).collect()
    }

    /// Radii are independent; `collect` keeps them in increasing order.
    #[cfg(feature = "parallel")]
    fn sweep_parallel(&self, edges: &EdgeImage, range: RadiusRange) -> Vec<RadiusPeaks> {
        use rayon::prelude::*;
        range
            .iter()
            .into_par_iter()
            .map(|r| self.sweep_radius(edges, r))
            .collect()
    }

    fn sweep_radius(&self, edges: &EdgeImage, radius: u32) -> RadiusPeaks {
        let mut acc = Accumulator::build(edges, &self.angles, radius);
        let max_vote = acc.max_vote();
        let threshold = self.config.vote_threshold;

        let peaks: Vec<Circle> = if max_vote > threshold {
            acc.suppress_below(threshold);
            acc.peaks()
                .map(|(x, y)| Circle::new(x as i32, y as i32, radius as i32))
                .collect()
        } else {
            Vec::new()
        };

        tracing::debug!(radius, max_vote, peaks = peaks.len(), "radius swept");

        RadiusPeaks {
            radius,
            max_vote,
            peaks,
        }
    }
}

/// Offer each radius's peaks to `filter` in radius-then-raster order.
fn merge_sweeps<F: DuplicateFilter>(filter: &mut F, sweeps: Vec<RadiusPeaks>) -> Vec<RadiusDiagnostic> {
    sweeps
        .into_iter()
        .map(|sweep| {
            let peaks = sweep.peaks.len();
            let admitted = sweep
                .peaks
                .into_iter()
                .filter(|&circle| filter.admit(circle))
                .count();
            RadiusDiagnostic {
                radius: sweep.radius,
                max_vote: sweep.max_vote,
                peaks,
                admitted,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::config::RadiusMaxMode;
    use crate::test_utils::draw_circles;

    fn config(r_min: u32, r_max: u32, threshold: u32) -> DetectionConfig {
        DetectionConfig {
            radius_min: r_min,
            radius_max_mode: RadiusMaxMode::FixedCap(r_max),
            vote_threshold: threshold,
            ..Default::default()
        }
    }

    #[test]
    fn test_detector_creation() {
        assert!(CircleDetector::new(DetectionConfig::default()).is_ok());
        assert!(CircleDetector::new(config(30, 20, 160)).is_err());
    }

    #[test]
    fn test_empty_image_yields_no_circles() -> std::result::Result<(), DetectionError> {
        let edges = EdgeImage::from_fn(64, 48, |_, _| false)?;
        let detector = CircleDetector::new(config(5, 12, 1))?;
        let result = detector.detect(&edges)?;
        assert!(result.circles.is_empty());
        assert_eq!(result.radius_diagnostics.len(), 8);
        assert!(result.radius_diagnostics.iter().all(|d| d.max_vote == 0 && d.peaks == 0));
        Ok(())
    }

    #[test]
    fn test_single_circle() -> std::result::Result<(), DetectionError> {
        let edges = draw_circles(100, 100, &[(50, 50, 30)]);
        let detector = CircleDetector::new(config(26, 34, 150))?;
        let result = detector.detect(&edges)?;
        assert_eq!(result.circles.as_slice(), &[Circle::new(50, 50, 30)]);

        let at_30 = result.radius_diagnostics.iter().find(|d| d.radius == 30);
        assert_eq!(at_30.map(|d| (d.max_vote, d.admitted)), Some((180, 1)));
        assert_eq!(result.stats.total_detections, 1);
        Ok(())
    }

    #[test]
    fn test_max_vote_must_exceed_threshold() -> std::result::Result<(), DetectionError> {
        // A perfect circle peaks at exactly 180 votes, which does not exceed 180.
        let edges = draw_circles(100, 100, &[(50, 50, 30)]);
        let detector = CircleDetector::new(config(29, 31, 180))?;
        let result = detector.detect(&edges)?;
        assert!(result.circles.is_empty());
        Ok(())
    }

    #[test]
    fn test_merge_keeps_lowest_radius_first() {
        let sweeps = vec![
            RadiusPeaks {
                radius: 10,
                max_vote: 9,
                peaks: vec![Circle::new(5, 5, 10), Circle::new(5, 6, 10)],
            },
            RadiusPeaks {
                radius: 11,
                max_vote: 9,
                peaks: vec![Circle::new(5, 5, 11), Circle::new(30, 30, 11)],
            },
        ];
        let mut set = CircleSet::new();
        let diagnostics = merge_sweeps(&mut set, sweeps);
        assert_eq!(
            set.as_slice(),
            &[Circle::new(5, 5, 10), Circle::new(30, 30, 11)]
        );
        assert_eq!(diagnostics[0].peaks, 2);
        assert_eq!(diagnostics[0].admitted, 1);
        assert_eq!(diagnostics[1].admitted, 1);
    }

    #[test]
    fn test_gray_input_must_be_binary() -> std::result::Result<(), DetectionError> {
        let detector = CircleDetector::new(DetectionConfig::default())?;
        let gray = image::GrayImage::from_pixel(10, 10, image::Luma([3]));
        let err = detector.detect_from_gray(&gray).unwrap_err();
        let inner = err.downcast_ref::<DetectionError>();
        assert!(inner.is_some_and(|e| e.is_invalid_input()));
        Ok(())
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() -> std::result::Result<(), DetectionError> {
        let edges = draw_circles(120, 160, &[(60, 40, 28), (60, 115, 36)]);
        let detector = CircleDetector::new(config(26, 40, 150))?;
        let range = detector.config().radius_range(120, 160)?;

        let mut sequential = CircleSet::new();
        let seq_diag = merge_sweeps(&mut sequential, detector.sweep_sequential(&edges, range));
        let mut parallel = CircleSet::new();
        let par_diag = merge_sweeps(&mut parallel, detector.sweep_parallel(&edges, range));

        assert_eq!(sequential, parallel);
        assert_eq!(seq_diag, par_diag);
        Ok(())
    }
}
