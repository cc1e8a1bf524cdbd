//! Overlay detected coins on the working image for inspection.

use crate::utils::ImageUtils;
use crate::Result;
use coinsum_core::{Circle, Tier, Valuation};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_circle_mut};
use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Visualization configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizationConfig {
    pub small_color: (u8, u8, u8),
    pub medium_color: (u8, u8, u8),
    pub large_color: (u8, u8, u8),
    pub marker_color: (u8, u8, u8),
    /// Side of the square drawn at each center; zero disables it.
    pub marker_size: u32,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            small_color: (0, 0, 255),
            medium_color: (0, 255, 0),
            large_color: (255, 0, 0),
            marker_color: (255, 0, 0),
            marker_size: 3,
        }
    }
}

impl VisualizationConfig {
    fn tier_color(&self, tier: Tier) -> Rgb<u8> {
        let (r, g, b) = match tier {
            Tier::Small => self.small_color,
            Tier::Medium => self.medium_color,
            Tier::Large => self.large_color,
        };
        Rgb([r, g, b])
    }
}

pub struct OverlayRenderer {
    config: VisualizationConfig,
}

impl OverlayRenderer {
    pub fn new(config: VisualizationConfig) -> Self {
        Self { config }
    }

    /// Draw every valued coin onto a copy of `base`.
    pub fn render(&self, base: &RgbImage, valuation: &Valuation) -> RgbImage {
        let mut output = base.clone();
        for coin in &valuation.coins {
            self.draw_circle(&mut output, &coin.circle, self.config.tier_color(coin.tier));
        }
        output
    }

    /// Draw one circle. The circle's `x` is the row, so it maps to the
    /// image's vertical axis.
    fn draw_circle(&self, image: &mut RgbImage, circle: &Circle, color: Rgb<u8>) {
        draw_hollow_circle_mut(image, (circle.y, circle.x), circle.r, color);

        let size = self.config.marker_size;
        if size > 0 {
            let half = (size / 2) as i32;
            let (r, g, b) = self.config.marker_color;
            draw_filled_rect_mut(
                image,
                Rect::at(circle.y - half, circle.x - half).of_size(size, size),
                Rgb([r, g, b]),
            );
        }
    }

    pub fn render_to_file<P: AsRef<Path>>(
        &self,
        base: &RgbImage,
        valuation: &Valuation,
        path: P,
    ) -> Result<()> {
        let output = self.render(base, valuation);
        ImageUtils::ensure_parent_dir(&path)?;
        ImageUtils::save_rgb(&output, &path)?;
        tracing::info!("Visualization saved: {:?}", path.as_ref());
        Ok(())
    }
}

impl Default for OverlayRenderer {
    fn default() -> Self {
        Self::new(VisualizationConfig::default())
    }
}
