//! Coin counting pipeline using coinsum-cv

use anyhow::Context;
use coinsum_core::{classify, coins::DEFAULT_TIER_MARGIN, DetectionError, Denominations, Valuation};
use coinsum_cv::{
    detection::{CircleDetector, DetectionConfig, DetectionResult},
    preprocess::{PreprocessConfig, Preprocessor},
    EdgeImage, Result,
};
use image::RgbImage;
use serde::Serialize;
use std::path::Path;

/// Everything `count_coins` needs besides the image.
#[derive(Debug, Clone, Default)]
pub struct CountOptions {
    pub detection: DetectionConfig,
    pub preprocess: PreprocessConfig,
    /// Treat the input as an already binarized edge map.
    pub edge_map: bool,
    pub denominations: Denominations,
    pub tier_margin: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoinReport {
    pub detection: DetectionResult,
    /// `None` when nothing was detected.
    pub valuation: Option<Valuation>,
    #[serde(skip)]
    pub working_image: RgbImage,
}

impl CoinReport {
    pub fn total(&self) -> f64 {
        self.valuation.as_ref().map_or(0.0, |v| v.total)
    }

    pub fn coin_count(&self) -> usize {
        self.detection.circles.len()
    }
}

/// Load, preprocess, detect and value the coins in one image.
pub fn count_coins<P: AsRef<Path>>(input_image_path: P, options: &CountOptions) -> Result<CoinReport> {
    let path = input_image_path.as_ref();
    let photo =
        image::open(path).with_context(|| format!("Failed to open image: {}", path.display()))?;

    let preprocessor = Preprocessor::new(options.preprocess.clone());
    let (edges, working_image) = if options.edge_map {
        let gray = photo.to_luma8();
        let edges = EdgeImage::from_gray(&gray, options.detection.sentinels)
            .with_context(|| format!("{} is not a binary edge map", path.display()))?;
        (edges, photo.to_rgb8())
    } else {
        let edges = preprocessor
            .run(&photo)
            .with_context(|| format!("Preprocessing failed for {}", path.display()))?;
        (edges, preprocessor.working_rgb(&photo))
    };

    let detector = CircleDetector::new(options.detection.clone()).context("Invalid detection config")?;
    let detection = detector.detect(&edges)?;
    let valuation = value_detections(&detection, options)?;

    Ok(CoinReport {
        detection,
        valuation,
        working_image,
    })
}

/// Export the report (detections, diagnostics and valuation) as JSON.
pub fn export_json(report: &CoinReport, output_path: &Path) -> Result<()> {
    let json =
        serde_json::to_string_pretty(report).context("Failed to serialize coin report")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON to: {:?}", output_path))?;

    Ok(())
}

/// Classify the detected circles; an empty sweep is reported, not failed.
pub fn value_detections(
    detection: &DetectionResult,
    options: &CountOptions,
) -> Result<Option<Valuation>> {
    let swept = (detection.radius_range.min, detection.radius_range.max);
    let margin = options.tier_margin.unwrap_or(DEFAULT_TIER_MARGIN);

    match classify(&detection.circles, &options.denominations, margin, swept) {
        Ok(valuation) => Ok(Some(valuation)),
        Err(err @ DetectionError::NoDetections { .. }) => {
            tracing::warn!("{err}; reporting zero coins");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}
