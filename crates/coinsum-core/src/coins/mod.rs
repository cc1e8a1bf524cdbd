//! Radius-bucket classification of detected circles into coin values.

mod data;

pub use data::{Denomination, Denominations};

use serde::{Deserialize, Serialize};

use crate::circle::{Circle, CircleSet};
use crate::error::DetectionError;

/// Width of the small and large radius bands, in pixels.
pub const DEFAULT_TIER_MARGIN: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Small,
    Medium,
    Large,
}

impl Tier {
    /// Bucket `radius` relative to the observed extremes. The first band that
    /// contains the radius wins, so small beats large when the bands overlap.
    pub fn for_radius(radius: i32, min_radius: i32, max_radius: i32, margin: i32) -> Self {
        if radius <= min_radius + margin {
            Tier::Small
        } else if radius < max_radius - margin {
            Tier::Medium
        } else {
            Tier::Large
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub circle: Circle,
    pub tier: Tier,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierCounts {
    pub small: usize,
    pub medium: usize,
    pub large: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    pub coins: Vec<Coin>,
    pub counts: TierCounts,
    pub total: f64,
    pub min_radius: i32,
    pub max_radius: i32,
}

/// Value every circle by its radius tier and sum the total.
///
/// `swept` is the radius range the detector covered; it only feeds the
/// `NoDetections` error when `circles` is empty.
pub fn classify(
    circles: &CircleSet,
    denominations: &Denominations,
    margin: i32,
    swept: (u32, u32),
) -> Result<Valuation, DetectionError> {
    let (min_radius, max_radius) = circles.radius_bounds().ok_or(DetectionError::NoDetections {
        r_min: swept.0,
        r_max: swept.1,
    })?;

    let mut counts = TierCounts::default();
    let mut total = 0.0;
    let coins = circles
        .iter()
        .map(|&circle| {
            let tier = Tier::for_radius(circle.r, min_radius, max_radius, margin);
            match tier {
                Tier::Small => counts.small += 1,
                Tier::Medium => counts.medium += 1,
                Tier::Large => counts.large += 1,
            }
            let value = denominations.get(tier).value;
            total += value;
            Coin {
                circle,
                tier,
                value,
            }
        })
        .collect();

    Ok(Valuation {
        coins,
        counts,
        total,
        min_radius,
        max_radius,
    })
}
