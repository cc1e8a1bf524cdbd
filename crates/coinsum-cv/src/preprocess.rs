//! Photo-to-edge-map preprocessing: resize, grayscale, median blur, Laplacian,
//! threshold.

use crate::edge::{EdgeImage, EdgeSentinels};
use crate::utils::ImageUtils;
use crate::Result;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma, RgbImage};
use imageproc::filter::{laplacian_filter, median_filter};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Preprocessing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Target `(width, height)`; `None` keeps the input size.
    pub resize: Option<(u32, u32)>,
    /// Median filter radius (a radius of 9 is a 19x19 window).
    pub median_radius: u32,
    /// Saturated 8-bit Laplacian response above which a pixel is an edge.
    pub edge_threshold: u8,
    /// Sentinels written into the binarized image.
    pub sentinels: EdgeSentinels,
    /// Directory to dump every intermediate stage into, if any.
    pub steps_dir: Option<PathBuf>,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            resize: Some((400, 400)),
            median_radius: 9,
            edge_threshold: 40,
            sentinels: EdgeSentinels::default(),
            steps_dir: None,
        }
    }
}

pub struct Preprocessor {
    config: PreprocessConfig,
}

impl Preprocessor {
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    /// The color image at the working resolution, for drawing overlays on.
    pub fn working_rgb(&self, image: &DynamicImage) -> RgbImage {
        let rgb = image.to_rgb8();
        match self.config.resize {
            Some((w, h)) if (w, h) != rgb.dimensions() => {
                imageops::resize(&rgb, w, h, FilterType::Triangle)
            }
            _ => rgb,
        }
    }

    /// Run the whole chain and return the binary edge map.
    pub fn run(&self, image: &DynamicImage) -> Result<EdgeImage> {
        let resized = self.working_rgb(image);
        self.save_step("01_resized.png", |p| ImageUtils::save_rgb(&resized, p))?;

        let gray = DynamicImage::ImageRgb8(resized).to_luma8();
        self.save_step("02_gray.png", |p| ImageUtils::save_gray(&gray, p))?;

        let blurred = self.blur(&gray);
        self.save_step("03_blurred.png", |p| ImageUtils::save_gray(&blurred, p))?;

        let laplace = self.laplacian(&blurred);
        self.save_step("04_laplacian.png", |p| ImageUtils::save_gray(&laplace, p))?;

        let binary = self.threshold(&laplace);
        self.save_step("05_threshold.png", |p| ImageUtils::save_gray(&binary, p))?;

        let edges = EdgeImage::from_gray(&binary, self.config.sentinels)?;
        tracing::debug!(
            rows = edges.rows(),
            cols = edges.cols(),
            edge_pixels = edges.edge_count(),
            "preprocessing finished"
        );
        Ok(edges)
    }

    fn blur(&self, image: &GrayImage) -> GrayImage {
        if self.config.median_radius == 0 {
            return image.clone();
        }
        median_filter(image, self.config.median_radius, self.config.median_radius)
    }

    /// Laplacian saturated into `0..=255`; negative responses become zero.
    fn laplacian(&self, image: &GrayImage) -> GrayImage {
        let response = laplacian_filter(image);
        GrayImage::from_fn(image.width(), image.height(), |x, y| {
            Luma([response.get_pixel(x, y)[0].clamp(0, 255) as u8])
        })
    }

    fn threshold(&self, image: &GrayImage) -> GrayImage {
        let sentinels = self.config.sentinels;
        let threshold = self.config.edge_threshold;
        GrayImage::from_fn(image.width(), image.height(), |x, y| {
            if image.get_pixel(x, y)[0] > threshold {
                Luma([sentinels.edge])
            } else {
                Luma([sentinels.background])
            }
        })
    }

    fn save_step(&self, name: &str, save: impl FnOnce(&std::path::Path) -> Result<()>) -> Result<()> {
        let Some(dir) = &self.config.steps_dir else {
            return Ok(());
        };
        let path = dir.join(name);
        ImageUtils::ensure_parent_dir(&path)?;
        save(&path)
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(PreprocessConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disk_photo(size: u32, center: (f32, f32), radius: f32) -> DynamicImage {
        let img = RgbImage::from_fn(size, size, |x, y| {
            let dx = x as f32 - center.0;
            let dy = y as f32 - center.1;
            if (dx * dx + dy * dy).sqrt() <= radius {
                image::Rgb([200, 200, 200])
            } else {
                image::Rgb([20, 20, 20])
            }
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_flat_image_has_no_edges() -> Result<()> {
        let flat = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, image::Rgb([90, 90, 90])));
        let pre = Preprocessor::new(PreprocessConfig {
            resize: None,
            median_radius: 2,
            ..Default::default()
        });
        let edges = pre.run(&flat)?;
        assert_eq!((edges.rows(), edges.cols()), (64, 64));
        assert_eq!(edges.edge_count(), 0);
        Ok(())
    }

    #[test]
    fn test_disk_produces_edges_near_boundary() -> Result<()> {
        let photo = disk_photo(80, (40.0, 40.0), 20.0);
        let pre = Preprocessor::new(PreprocessConfig {
            resize: None,
            median_radius: 1,
            ..Default::default()
        });
        let edges = pre.run(&photo)?;
        assert!(edges.edge_count() > 0);
        for (x, y) in edges.edge_pixels() {
            let d = ((x as f32 - 40.0).powi(2) + (y as f32 - 40.0).powi(2)).sqrt();
            assert!((d - 20.0).abs() < 3.0, "edge at ({x}, {y}) is {d} from center");
        }
        Ok(())
    }

    #[test]
    fn test_resize_applies_to_working_image() {
        let pre = Preprocessor::default();
        let rgb = pre.working_rgb(&disk_photo(50, (25.0, 25.0), 10.0));
        assert_eq!(rgb.dimensions(), (400, 400));
    }

    #[test]
    fn test_steps_are_written() -> Result<()> {
        let dir = std::env::temp_dir().join(format!("coinsum-steps-{}", std::process::id()));
        let pre = Preprocessor::new(PreprocessConfig {
            resize: Some((32, 32)),
            median_radius: 1,
            steps_dir: Some(dir.clone()),
            ..Default::default()
        });
        pre.run(&disk_photo(32, (16.0, 16.0), 8.0))?;
        for name in ["01_resized.png", "03_blurred.png", "05_threshold.png"] {
            assert!(dir.join(name).exists(), "{name} missing");
        }
        std::fs::remove_dir_all(&dir).ok();
        Ok(())
    }
}
