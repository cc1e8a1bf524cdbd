//! Precomputed sine/cosine samples over a full turn.

use coinsum_core::DetectionError;

#[derive(Debug, Clone, PartialEq)]
pub struct AngleTable {
    /// `(sin θ, cos θ)` for `θ_i = i * 360° / n`.
    samples: Vec<(f64, f64)>,
}

impl AngleTable {
    pub fn new(count: usize) -> Result<Self, DetectionError> {
        if count == 0 {
            return Err(DetectionError::EmptyAngleTable);
        }
        let step = 360.0 / count as f64;
        let samples = (0..count)
            .map(|i| {
                let theta = (i as f64 * step).to_radians();
                (theta.sin(), theta.cos())
            })
            .collect();
        Ok(Self { samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Angular spacing in degrees.
    pub fn step_degrees(&self) -> f64 {
        360.0 / self.samples.len() as f64
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (f64, f64)> {
        self.samples.iter()
    }

    /// Integer `(dx, dy)` from a circle point to its center for radius `r`,
    /// one per sample. `round` goes half away from zero.
    pub fn offsets(&self, r: u32) -> Vec<(isize, isize)> {
        let r = r as f64;
        self.samples
            .iter()
            .map(|&(sin, cos)| ((r * cos).round() as isize, (r * sin).round() as isize))
            .collect()
    }
}
