//! Per-radius vote accumulator for circle centers.

use crate::angles::AngleTable;
use crate::edge::EdgeImage;

type Votes = u32;

/// `rows x cols` vote counts for a single radius, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accumulator {
    rows: usize,
    cols: usize,
    radius: u32,
    data: Vec<Votes>,
}

impl Accumulator {
    pub fn new(rows: usize, cols: usize, radius: u32) -> Self {
        Self {
            rows,
            cols,
            radius,
            data: vec![0; rows * cols],
        }
    }

    /// Fresh accumulator with every edge pixel's votes for radius `r` cast.
    pub fn build(edges: &EdgeImage, angles: &AngleTable, radius: u32) -> Self {
        let mut acc = Self::new(edges.rows(), edges.cols(), radius);
        let offsets = angles.offsets(radius);
        for (x, y) in edges.edge_pixels() {
            acc.vote_from(x, y, &offsets);
        }
        acc
    }

    /// Cast one vote per offset from the edge pixel `(x, y)`. Centers outside
    /// the grid are dropped.
    pub fn vote_from(&mut self, x: usize, y: usize, offsets: &[(isize, isize)]) {
        for &(dx, dy) in offsets {
            let a = x as isize + dx;
            let b = y as isize + dy;
            if a >= 0 && (a as usize) < self.rows && b >= 0 && (b as usize) < self.cols {
                let idx = a as usize * self.cols + b as usize;
                self.data[idx] += 1;
            }
        }
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Votes {
        if x < self.rows && y < self.cols {
            self.data[x * self.cols + y]
        } else {
            0
        }
    }

    pub fn max_vote(&self) -> Votes {
        self.data.iter().copied().max().unwrap_or(0)
    }

    pub fn total_votes(&self) -> u64 {
        self.data.iter().map(|&v| v as u64).sum()
    }

    /// Zero every cell below `threshold`.
    pub fn suppress_below(&mut self, threshold: Votes) {
        for v in self.data.iter_mut().filter(|v| **v < threshold) {
            *v = 0;
        }
    }

    /// Non-zero cells as `(x, y)` in raster order.
    pub fn peaks(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let cols = self.cols;
        self.data
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0)
            .map(move |(i, _)| (i / cols, i % cols))
    }
}
