// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns an escape field into pixels.  The brightness of a pixel is
//! the fraction of the frame that escaped no later than it did (see
//! `histogram`), pushed through a gamma curve; the hue and saturation
//! never change, so the whole animation is a single blue tint.  Points
//! inside the set are black.

use log::trace;

use crate::errors::RenderError;
use crate::escape::EscapeField;
use crate::histogram::Cdf;
use crate::planes::Pixel;
use crate::pool::WorkerPool;

/// Gamma applied to the equalized value.  Below one, so it lifts the
/// dark end of the range.
pub const GAMMA: f64 = 0.5;

/// Hue in degrees.  Blue.
pub const HUE: f64 = 220.0;

/// Saturation in `[0, 1]`.
pub const SATURATION: f64 = 1.0;

/// Colour of every point that did not escape.
pub const INTERIOR: [u8; 3] = [0, 0, 0];

/// A finished RGB8 frame, row-major, three bytes per pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Frame {
    /// Frame width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Frame height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The raw RGB bytes.
    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    /// The colour of one pixel.
    pub fn get(&self, pixel: &Pixel) -> [u8; 3] {
        let offset = (pixel.1 * self.width + pixel.0) * 3;
        [
            self.pixels[offset],
            self.pixels[offset + 1],
            self.pixels[offset + 2],
        ]
    }
}

fn channel(value: f64) -> u8 {
    (value * 255.0).round().max(0.0).min(255.0) as u8
}

/// Hue in degrees, saturation and value in `[0, 1]`, to RGB8.
pub fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> [u8; 3] {
    let h = hue.rem_euclid(360.0) / 60.0;
    let sector = h.floor();
    let f = h - sector;
    let p = value * (1.0 - saturation);
    let q = value * (1.0 - saturation * f);
    let t = value * (1.0 - saturation * (1.0 - f));
    let (r, g, b) = match sector as u32 {
        0 => (value, t, p),
        1 => (q, value, p),
        2 => (p, value, t),
        3 => (p, q, value),
        4 => (t, p, value),
        _ => (value, p, q),
    };
    [channel(r), channel(g), channel(b)]
}

/// The colour of a single escape value.
#[inline]
pub fn shade(n: u32, max_iter: u32, cdf: &Cdf) -> [u8; 3] {
    if n == max_iter {
        return INTERIOR;
    }
    let intensity = (255.0 * cdf.at(n).powf(GAMMA)).round();
    hsv_to_rgb(HUE, SATURATION, intensity / 255.0)
}

/// Colour a whole field.  The field and the CDF are shared read-only;
/// each worker fills in its own band of rows of the output.
pub fn colorize(field: &EscapeField, cdf: &Cdf, pool: &WorkerPool) -> Result<Frame, RenderError> {
    let width = field.width();
    let max_iter = field.max_iter();
    let escapes = field.values();
    let mut pixels = vec![0u8; escapes.len() * 3];

    trace!("begin colorize");
    pool.bands(&mut pixels, width * 3, |band| {
        let start = band.first_row * width;
        let escapes = &escapes[start..start + band.cells.len() / 3];
        for (rgb, &n) in band.cells.chunks_mut(3).zip(escapes) {
            rgb.copy_from_slice(&shade(n, max_iter, cdf));
        }
    })?;
    trace!("end colorize");

    Ok(Frame {
        width,
        height: field.height(),
        pixels,
    })
}
