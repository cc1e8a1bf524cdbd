//! Synthetic edge maps for tests.

use crate::edge::EdgeImage;

/// Edge map with the given circles rasterized as one-pixel rings.
///
/// Each circle is `(x, y, r)` with `x` the center row. Points are sampled every
/// half degree and rounded to the nearest pixel, which closes the ring for the
/// radii the tests use.
pub fn draw_circles(rows: usize, cols: usize, circles: &[(i64, i64, i64)]) -> EdgeImage {
    let mut ring = vec![false; rows * cols];
    for &(cx, cy, r) in circles {
        for i in 0..720 {
            let theta = (i as f64 * 0.5).to_radians();
            let x = cx + (r as f64 * theta.cos()).round() as i64;
            let y = cy + (r as f64 * theta.sin()).round() as i64;
            if x >= 0 && (x as usize) < rows && y >= 0 && (y as usize) < cols {
                ring[x as usize * cols + y as usize] = true;
            }
        }
    }
    match EdgeImage::from_fn(rows, cols, |x, y| ring[x * cols + y]) {
        Ok(edges) => edges,
        Err(e) => panic!("synthetic image must be non-empty: {e}"),
    }
}
