// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The knobs of a zoom animation.  Fixed once the animation starts.

use num::Complex;

use crate::errors::RenderError;

/// Real part of the point the animation zooms into.
pub const CENTER_RE: f64 = -0.74364388703715870475;
/// Imaginary part of the point the animation zooms into.
pub const CENTER_IM: f64 = 0.13182590420531197049;

/// Width of the first frame's window on the real axis.  The imaginary
/// range follows from the aspect ratio.
pub const BASE_RANGE_X: f64 = 3.0;

/// Everything needed to run one animation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ZoomConfig {
    /// Frame width in pixels.
    pub width: usize,
    /// Frame height in pixels.
    pub height: usize,
    /// Frames per second of the finished video.
    pub fps: u32,
    /// The animation stops at the first frame whose zoom reaches this.
    pub zoom_end: f64,
    /// Seconds of video it takes for the zoom factor to double.
    pub seconds_per_zoom_doubling: f64,
    /// The point being zoomed into.
    pub center: Complex<f64>,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        ZoomConfig {
            width: 1920,
            height: 1080,
            fps: 30,
            zoom_end: 1e6,
            seconds_per_zoom_doubling: 1.25,
            center: Complex::new(CENTER_RE, CENTER_IM),
        }
    }
}

impl ZoomConfig {
    /// Refuse anything the animation can't run with.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "frame size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.fps == 0 {
            return Err(RenderError::InvalidConfig(
                "fps must be positive".to_string(),
            ));
        }
        if !(self.zoom_end.is_finite() && self.zoom_end > 0.0) {
            return Err(RenderError::InvalidConfig(format!(
                "zoom end must be a positive number, got {}",
                self.zoom_end
            )));
        }
        if !(self.seconds_per_zoom_doubling.is_finite() && self.seconds_per_zoom_doubling > 0.0) {
            return Err(RenderError::InvalidConfig(format!(
                "zoom doubling period must be a positive number of seconds, got {}",
                self.seconds_per_zoom_doubling
            )));
        }
        let scale = self.scale_per_frame();
        if !(scale.is_finite() && scale > 1.0) {
            return Err(RenderError::InvalidConfig(format!(
                "a {} second doubling period at {} fps grows the zoom by {} per frame",
                self.seconds_per_zoom_doubling, self.fps, scale
            )));
        }
        Ok(())
    }

    /// Width over height.
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Window width on the real axis at zoom 1.
    pub fn base_range_x(&self) -> f64 {
        BASE_RANGE_X
    }

    /// Window height on the imaginary axis at zoom 1.
    pub fn base_range_y(&self) -> f64 {
        BASE_RANGE_X / self.aspect()
    }

    /// How much the zoom grows in one second of video.
    pub fn zoom_scale_per_second(&self) -> f64 {
        2.0_f64.powf(1.0 / self.seconds_per_zoom_doubling)
    }

    /// How much the zoom grows from one frame to the next.
    pub fn scale_per_frame(&self) -> f64 {
        self.zoom_scale_per_second().powf(1.0 / f64::from(self.fps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ZoomConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.base_range_y(), 3.0 / (1920.0 / 1080.0));
    }

    #[test]
    fn bad_values_are_refused() {
        let good = ZoomConfig::default();
        for bad in &[
            ZoomConfig { width: 0, ..good },
            ZoomConfig { height: 0, ..good },
            ZoomConfig { fps: 0, ..good },
            ZoomConfig { zoom_end: 0.0, ..good },
            ZoomConfig {
                zoom_end: std::f64::INFINITY,
                ..good
            },
            ZoomConfig {
                zoom_end: std::f64::NAN,
                ..good
            },
            ZoomConfig {
                seconds_per_zoom_doubling: -1.0,
                ..good
            },
            // Rounds the per-frame scale to exactly 1, so the zoom never grows.
            ZoomConfig {
                zoom_end: 2.0,
                seconds_per_zoom_doubling: 1e300,
                ..good
            },
            // Overflows the per-second scale to infinity.
            ZoomConfig {
                seconds_per_zoom_doubling: 1e-300,
                ..good
            },
        ] {
            assert!(bad.validate().is_err(), "{:?} should be refused", bad);
        }
    }

    #[test]
    fn zoom_doubles_once_per_period() {
        let config = ZoomConfig {
            fps: 24,
            seconds_per_zoom_doubling: 2.0,
            ..ZoomConfig::default()
        };
        // 48 frames make up one doubling period.
        let doubled = config.scale_per_frame().powi(48);
        assert!((doubled - 2.0).abs() < 1e-9);
    }
}
