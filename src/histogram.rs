// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Histogram equalization.
//!
//! The raw escape counts of a Mandelbrot frame are wildly skewed: a
//! handful of iteration values cover most of the picture.  Colouring
//! by the raw count therefore leaves most of the frame one shade.
//! Instead we count how many pixels landed on each escape value, run a
//! cumulative sum over those counts, and colour each pixel by the
//! fraction of the frame that escaped no later than it did.

/// Count of pixels per escape value.  Bucket `i` holds the number of
/// pixels whose escape value is exactly `i`.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    buckets: Vec<u64>,
}

impl Histogram {
    /// An empty histogram able to hold escape values `0..=max_iter`.
    pub fn new(max_iter: u32) -> Self {
        Histogram {
            buckets: vec![0; max_iter as usize + 1],
        }
    }

    /// Count one more pixel with escape value `n`.
    #[inline]
    pub fn record(&mut self, n: u32) {
        self.buckets[n as usize] += 1;
    }

    /// The per-value counts.
    pub fn buckets(&self) -> &[u64] {
        &self.buckets
    }

    /// The number of pixels counted.
    pub fn total(&self) -> u64 {
        self.buckets.iter().sum()
    }

    /// Sum a set of per-worker histograms, index by index, into one.
    /// Integer addition, so neither the order of `parts` nor how many
    /// there are changes the result.  Every part must have been built
    /// for the same `max_iter`.
    pub fn merge(max_iter: u32, parts: &[Histogram]) -> Histogram {
        let mut merged = vec![0u64; max_iter as usize + 1];
        for part in parts {
            debug_assert_eq!(part.buckets.len(), merged.len());
            for (total, count) in merged.iter_mut().zip(&part.buckets) {
                *total += count;
            }
        }
        Histogram { buckets: merged }
    }

    /// The cumulative distribution of this histogram over `total_pixels`
    /// pixels.  `total_pixels` must be positive.
    pub fn cdf(&self, total_pixels: u64) -> Cdf {
        debug_assert!(total_pixels > 0);
        let total = total_pixels as f64;
        let mut accum = 0u64;
        let values = self
            .buckets
            .iter()
            .map(|count| {
                accum += count;
                accum as f64 / total
            })
            .collect();
        Cdf { values }
    }
}

/// Running, normalized sum of a histogram.  Non-decreasing, in
/// `[0, 1]`, and ends at 1.0 when built from a complete histogram.
#[derive(Clone, Debug, PartialEq)]
pub struct Cdf {
    values: Vec<f64>,
}

impl Cdf {
    /// The fraction of the frame with an escape value of `n` or less.
    #[inline]
    pub fn at(&self, n: u32) -> f64 {
        self.values[n as usize]
    }

    /// All values, indexed by escape value.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn histogram(counts: &[u64]) -> Histogram {
        Histogram {
            buckets: counts.to_vec(),
        }
    }

    #[test]
    fn records_land_in_their_bucket() {
        let mut h = Histogram::new(3);
        h.record(0);
        h.record(3);
        h.record(3);
        assert_eq!(h.buckets(), &[1, 0, 0, 2]);
        assert_eq!(h.total(), 3);
    }

    #[test]
    fn merge_sums_by_index() {
        let merged = Histogram::merge(2, &[histogram(&[1, 2, 3]), histogram(&[4, 0, 1])]);
        assert_eq!(merged.buckets(), &[5, 2, 4]);
    }

    #[test]
    fn merge_ignores_order() {
        let a = histogram(&[1, 0, 7, 2]);
        let b = histogram(&[0, 3, 1, 1]);
        let c = histogram(&[9, 9, 0, 0]);
        let forward = Histogram::merge(3, &[a.clone(), b.clone(), c.clone()]);
        let backward = Histogram::merge(3, &[c, b, a]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn merge_of_nothing_is_empty() {
        assert_eq!(Histogram::merge(2, &[]), Histogram::new(2));
    }

    #[test]
    fn cdf_is_cumulative_and_ends_at_one() {
        let h = histogram(&[2, 0, 1, 5]);
        let cdf = h.cdf(h.total());
        assert_eq!(cdf.values(), &[0.25, 0.25, 0.375, 1.0]);
        assert!(cdf.values().windows(2).all(|w| w[0] <= w[1]));
        assert!((cdf.at(3) - 1.0).abs() < 1e-9);
    }
}
