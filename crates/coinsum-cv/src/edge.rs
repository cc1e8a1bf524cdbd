//! Binary edge maps consumed by the voting engine.

use coinsum_core::DetectionError;
use image::GrayImage;
use serde::{Deserialize, Serialize};

/// The two pixel values a binarized image is allowed to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSentinels {
    pub background: u8,
    pub edge: u8,
}

impl Default for EdgeSentinels {
    fn default() -> Self {
        Self {
            background: 0,
            edge: 255,
        }
    }
}

impl EdgeSentinels {
    /// A binary image needs two distinct values.
    pub fn check(&self) -> Result<(), DetectionError> {
        if self.background == self.edge {
            return Err(DetectionError::DegenerateSentinels { value: self.edge });
        }
        Ok(())
    }
}

/// Immutable `rows x cols` grid of edge flags, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeImage {
    rows: usize,
    cols: usize,
    data: Vec<bool>,
}

impl EdgeImage {
    /// Build from row-major raw values. Every value must be one of the sentinels.
    pub fn from_values(
        rows: usize,
        cols: usize,
        values: &[u8],
        sentinels: EdgeSentinels,
    ) -> Result<Self, DetectionError> {
        sentinels.check()?;
        if rows == 0 || cols == 0 {
            return Err(DetectionError::EmptyImage { rows, cols });
        }
        let expected = rows * cols;
        if values.len() != expected {
            return Err(DetectionError::SizeMismatch {
                rows,
                cols,
                expected,
                actual: values.len(),
            });
        }

        let mut data = Vec::with_capacity(expected);
        for (i, &value) in values.iter().enumerate() {
            if value == sentinels.edge {
                data.push(true);
            } else if value == sentinels.background {
                data.push(false);
            } else {
                return Err(DetectionError::NotBinary {
                    row: i / cols,
                    col: i % cols,
                    value,
                    background: sentinels.background,
                    edge: sentinels.edge,
                });
            }
        }

        Ok(Self { rows, cols, data })
    }

    /// Build from a binarized grayscale image. Image rows become `x`.
    pub fn from_gray(image: &GrayImage, sentinels: EdgeSentinels) -> Result<Self, DetectionError> {
        let (width, height) = image.dimensions();
        Self::from_values(height as usize, width as usize, image.as_raw(), sentinels)
    }

    /// Build from a predicate over `(row, col)`. Used for synthetic inputs.
    pub fn from_fn(
        rows: usize,
        cols: usize,
        mut is_edge: impl FnMut(usize, usize) -> bool,
    ) -> Result<Self, DetectionError> {
        if rows == 0 || cols == 0 {
            return Err(DetectionError::EmptyImage { rows, cols });
        }
        let mut data = Vec::with_capacity(rows * cols);
        for x in 0..rows {
            for y in 0..cols {
                data.push(is_edge(x, y));
            }
        }
        Ok(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn is_edge(&self, x: usize, y: usize) -> bool {
        x < self.rows && y < self.cols && self.data[x * self.cols + y]
    }

    /// Edge pixels in raster order.
    pub fn edge_pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let cols = self.cols;
        self.data
            .iter()
            .enumerate()
            .filter(|(_, edge)| **edge)
            .map(move |(i, _)| (i / cols, i % cols))
    }

    pub fn edge_count(&self) -> usize {
        self.data.iter().filter(|edge| **edge).count()
    }

    /// Render back to a grayscale image using the given sentinels.
    pub fn to_gray(&self, sentinels: EdgeSentinels) -> GrayImage {
        GrayImage::from_fn(self.cols as u32, self.rows as u32, |col, row| {
            let value = if self.is_edge(row as usize, col as usize) {
                sentinels.edge
            } else {
                sentinels.background
            };
            image::Luma([value])
        })
    }
}
