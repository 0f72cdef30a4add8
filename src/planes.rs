// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the Viewport and PlaneMapper structs, which describe a
//! relationship between a rectangle on the integral plane with an
//! origin at 0,0 (the pixels of a frame) and a rectangle on the
//! complex plane (the window of the Mandelbrot set that frame shows).
use num::Complex;

use crate::errors::RenderError;

/// Describes the width and height of an integral plane that is assumed
/// to start at 0,0.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the x, y of a pixel in a frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// The real bounds of the window of the complex plane shown in one
/// frame.  Computed once per frame and never changed afterwards.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Leftmost real value.
    pub x_min: f64,
    /// Rightmost real value.
    pub x_max: f64,
    /// Lowest imaginary value.
    pub y_min: f64,
    /// Highest imaginary value.
    pub y_max: f64,
}

impl Viewport {
    /// A window of `range_x` by `range_y` centered on `center`.
    pub fn around(center: Complex<f64>, range_x: f64, range_y: f64) -> Viewport {
        Viewport {
            x_min: center.re - range_x / 2.0,
            x_max: center.re + range_x / 2.0,
            y_min: center.im - range_y / 2.0,
            y_max: center.im + range_y / 2.0,
        }
    }

    /// Width of the window on the real axis.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Height of the window on the imaginary axis.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

/// Maps pixels of a frame onto points of a viewport.
#[derive(Debug)]
pub struct PlaneMapper {
    /// The size of the frame, in pixels.
    pub integral_plane: IntegralPlane,
    /// The window of the complex plane the frame covers.
    pub viewport: Viewport,
}

impl PlaneMapper {
    /// Constructor.  Refuses empty frames and windows whose corners are
    /// the wrong way around.  A window that has collapsed to a line or a
    /// point is allowed: deep enough zooms run out of f64 precision and
    /// every pixel lands on the same value, which still renders.
    pub fn new(width: usize, height: usize, viewport: Viewport) -> Result<PlaneMapper, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidPlane(format!(
                "the frame must have at least one pixel, got {}x{}",
                width, height
            )));
        }

        if !(viewport.x_min <= viewport.x_max) {
            return Err(RenderError::InvalidPlane(
                "x_min is to the right of x_max".to_string(),
            ));
        }

        if !(viewport.y_min <= viewport.y_max) {
            return Err(RenderError::InvalidPlane(
                "y_min is above y_max".to_string(),
            ));
        }

        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            viewport,
        })
    }

    /// Frame width in pixels.
    pub fn width(&self) -> usize {
        self.integral_plane.0
    }

    /// Frame height in pixels.
    pub fn height(&self) -> usize {
        self.integral_plane.1
    }

    /// The total number of pixels in the frame.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Describes whether the frame has no pixels at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Given a pixel on the integral plane, return the point of the
    /// complex plane at its top-left corner.  The interpolation is
    /// spelled `min + x/width * range` so that every frame lands on the
    /// same floating point values no matter how rows are split up.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        let v = &self.viewport;
        Complex::new(
            v.x_min + (pixel.0 as f64) / (self.integral_plane.0 as f64) * v.width(),
            v.y_min + (pixel.1 as f64) / (self.integral_plane.1 as f64) * v.height(),
        )
    }
}
