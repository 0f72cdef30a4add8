// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time computation.  Every pixel of the frame is mapped to a
//! point `c` on the complex plane, and we count how many times
//! `z = z² + c` can be applied, starting from zero, before `z` leaves
//! the circle of radius two.  Points that never leave within
//! `max_iter` steps are taken to be inside the set.

use itertools::iproduct;
use log::trace;
use num::Complex;

use crate::errors::RenderError;
use crate::histogram::Histogram;
use crate::planes::{Pixel, PlaneMapper};
use crate::pool::WorkerPool;

/// The classic iterator.  Returns the number of iterations performed
/// before `|z|` exceeded 2, or `max_iter` if it never did.  Compares
/// the squared norm against 4 to save the square root.
#[inline]
pub fn escape_time(c: Complex<f64>, max_iter: u32) -> u32 {
    let mut z = Complex::new(0.0_f64, 0.0_f64);
    let mut n = 0;
    while z.norm_sqr() <= 4.0 && n < max_iter {
        z = z * z + c;
        n += 1;
    }
    n
}

/// One escape value per pixel, row-major.  Only meaningful for the
/// frame that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct EscapeField {
    width: usize,
    height: usize,
    max_iter: u32,
    values: Vec<u32>,
}

impl EscapeField {
    /// Frame width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Frame height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The iteration bound the field was computed with.  A pixel holding
    /// this value did not escape.
    pub fn max_iter(&self) -> u32 {
        self.max_iter
    }

    /// All escape values, row-major.
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// The escape value of one pixel.
    pub fn get(&self, pixel: &Pixel) -> u32 {
        self.values[pixel.1 * self.width + pixel.0]
    }
}

/// Compute the escape field of a plane.  Each worker writes its own
/// band of rows and counts what it wrote into a private histogram; the
/// histograms come back indexed by worker, ready to be merged.
pub fn compute_field(
    plane: &PlaneMapper,
    max_iter: u32,
    pool: &WorkerPool,
) -> Result<(EscapeField, Vec<Histogram>), RenderError> {
    let width = plane.width();
    let mut values = vec![0u32; plane.len()];

    trace!("begin escape field, max_iter {}", max_iter);
    let histograms = pool.bands(&mut values, width, |band| {
        let mut histogram = Histogram::new(max_iter);
        let rows = band.cells.len() / width;
        let pixels = iproduct!(band.first_row..band.first_row + rows, 0..width);
        for (cell, (row, column)) in band.cells.iter_mut().zip(pixels) {
            let n = escape_time(plane.pixel_to_point(&Pixel(column, row)), max_iter);
            *cell = n;
            histogram.record(n);
        }
        histogram
    })?;
    trace!("end escape field");

    Ok((
        EscapeField {
            width,
            height: plane.height(),
            max_iter,
            values,
        },
        histograms,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planes::Viewport;

    fn square(half: f64, size: usize) -> PlaneMapper {
        PlaneMapper::new(
            size,
            size,
            Viewport {
                x_min: -half,
                x_max: half,
                y_min: -half,
                y_max: half,
            },
        )
        .unwrap()
    }

    #[test]
    fn origin_never_escapes() {
        assert_eq!(escape_time(Complex::new(0.0, 0.0), 50), 50);
        assert_eq!(escape_time(Complex::new(-1.0, 0.0), 50), 50);
    }

    #[test]
    fn far_points_escape_quickly() {
        // z1 = c = 3, already outside the radius.
        assert_eq!(escape_time(Complex::new(3.0, 0.0), 50), 1);
        // z1 = 1, z2 = 2 (still on the circle), z3 = 5.
        assert_eq!(escape_time(Complex::new(1.0, 0.0), 50), 3);
    }

    #[test]
    fn zero_iterations_means_zero() {
        assert_eq!(escape_time(Complex::new(3.0, 0.0), 0), 0);
    }

    #[test]
    fn small_field_is_known() {
        let pool = WorkerPool::new(2).unwrap();
        let (field, _) = compute_field(&square(2.0, 4), 10, &pool).unwrap();
        #[rustfmt::skip]
        let expected = vec![
            1, 1, 2, 1,
            1, 3, 10, 2,
            10, 10, 10, 3,
            1, 3, 10, 2,
        ];
        assert_eq!(field.values(), &expected[..]);
        assert_eq!(field.get(&Pixel(1, 2)), 10);
    }

    #[test]
    fn values_are_bounded_and_counted() {
        let pool = WorkerPool::new(3).unwrap();
        let plane = square(1.5, 17);
        let (field, histograms) = compute_field(&plane, 40, &pool).unwrap();
        assert!(field.values().iter().all(|&n| n <= 40));
        let merged = Histogram::merge(40, &histograms);
        assert_eq!(merged.total(), (17 * 17) as u64);
    }

    #[test]
    fn worker_count_does_not_change_anything() {
        let plane = square(2.0, 23);
        let (one, one_hist) = compute_field(&plane, 30, &WorkerPool::new(1).unwrap()).unwrap();
        let (many, many_hist) = compute_field(&plane, 30, &WorkerPool::new(7).unwrap()).unwrap();
        assert_eq!(one, many);
        assert_eq!(one_hist.len(), 1);
        assert_eq!(
            Histogram::merge(30, &one_hist),
            Histogram::merge(30, &many_hist)
        );
    }

    #[test]
    fn repeated_runs_are_identical() {
        let plane = square(2.0, 4);
        let pool = WorkerPool::new(4).unwrap();
        let (first, _) = compute_field(&plane, 10, &pool).unwrap();
        for _ in 0..5 {
            let (again, _) = compute_field(&plane, 10, &pool).unwrap();
            assert_eq!(first.values(), again.values());
        }
    }
}
