// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Renders a single frame of the zoom.  Each step needs the complete
//! output of the one before it: colouring needs the whole frame's
//! CDF, the CDF needs the whole frame's histogram, and the histogram
//! needs every pixel of the field.  The phases therefore run one after
//! the other, and a frame either comes out whole or not at all.

use log::{debug, warn};
use num::Complex;

use crate::colorize::{colorize, Frame};
use crate::errors::RenderError;
use crate::escape::compute_field;
use crate::histogram::Histogram;
use crate::planes::{PlaneMapper, Viewport};
use crate::pool::WorkerPool;
use crate::sink::FrameSink;

/// Iterations granted at zoom 1.
pub const BASE_ITERATIONS: u32 = 64;

/// Extra iterations granted per doubling of the zoom.
pub const ITERATIONS_PER_DOUBLING: f64 = 64.0;

/// The iteration bound for a zoom level.  Deeper zooms need more
/// iterations to resolve the boundary; zooms below 1 get the base.
pub fn max_iter_for_zoom(zoom: f64) -> u32 {
    BASE_ITERATIONS + (zoom.log2().max(0.0) * ITERATIONS_PER_DOUBLING).floor() as u32
}

/// Where the animation is: the zoom of the frame being rendered, its
/// number, and the fixed window it zooms into.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AnimationState {
    /// Current zoom factor.  Only ever grows.
    pub zoom: f64,
    /// Number of the frame being rendered, starting at 0.
    pub frame_index: usize,
    /// The point being zoomed into.
    pub center: Complex<f64>,
    /// Window width at zoom 1.
    pub base_range_x: f64,
    /// Window height at zoom 1.
    pub base_range_y: f64,
}

impl AnimationState {
    /// The window of the complex plane this state shows.
    pub fn viewport(&self) -> Viewport {
        let scale = 1.0 / self.zoom;
        Viewport::around(self.center, self.base_range_x * scale, self.base_range_y * scale)
    }

    /// The iteration bound for this state's zoom.
    pub fn max_iter(&self) -> u32 {
        max_iter_for_zoom(self.zoom)
    }
}

/// Runs the per-frame pipeline at a fixed resolution on a fixed pool.
#[derive(Debug)]
pub struct FrameOrchestrator {
    width: usize,
    height: usize,
    pool: WorkerPool,
}

impl FrameOrchestrator {
    /// An orchestrator rendering `width` by `height` frames.
    pub fn new(width: usize, height: usize, pool: WorkerPool) -> Self {
        FrameOrchestrator {
            width,
            height,
            pool,
        }
    }

    /// Render the frame for `state`.
    pub fn render(&self, state: &AnimationState) -> Result<Frame, RenderError> {
        let viewport = state.viewport();
        let max_iter = state.max_iter();
        debug!(
            "frame {}: zoom {:e}, max_iter {}, {:?}",
            state.frame_index, state.zoom, max_iter, viewport
        );

        let plane = PlaneMapper::new(self.width, self.height, viewport)?;
        let (field, parts) = compute_field(&plane, max_iter, &self.pool)?;
        let histogram = Histogram::merge(max_iter, &parts);
        debug_assert_eq!(histogram.total(), plane.len() as u64);
        let cdf = histogram.cdf(plane.len() as u64);
        colorize(&field, &cdf, &self.pool)
    }

    /// Render the frame for `state` and give it to `sink`.  The frame is
    /// returned even if the sink refused it; the sink's failure is only
    /// logged.
    pub fn emit<S: FrameSink>(&self, state: &AnimationState, sink: &mut S) -> Result<Frame, RenderError> {
        let frame = self.render(state)?;
        if let Err(e) = sink.write_frame(state.frame_index, &frame) {
            warn!("frame {} was not saved: {}", state.frame_index, e);
        }
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CENTER_IM, CENTER_RE};
    use crate::planes::Pixel;

    fn state(zoom: f64) -> AnimationState {
        AnimationState {
            zoom,
            frame_index: 0,
            center: Complex::new(-0.5, 0.0),
            base_range_x: 3.0,
            base_range_y: 2.0,
        }
    }

    #[test]
    fn iterations_grow_with_zoom() {
        assert_eq!(max_iter_for_zoom(1.0), 64);
        assert_eq!(max_iter_for_zoom(2.0), 128);
        assert_eq!(max_iter_for_zoom(4.0), 192);
        assert_eq!(max_iter_for_zoom(1.5), 64 + 37);
        assert_eq!(max_iter_for_zoom(0.5), 64);
        let mut last = 0;
        for step in 0..200 {
            let n = max_iter_for_zoom(1.1_f64.powi(step));
            assert!(n >= last);
            last = n;
        }
    }

    #[test]
    fn viewport_shrinks_around_center() {
        let v = state(1.0).viewport();
        assert_eq!((v.x_min, v.x_max, v.y_min, v.y_max), (-2.0, 1.0, -1.0, 1.0));
        let v = state(4.0).viewport();
        assert_eq!((v.x_min, v.x_max, v.y_min, v.y_max), (-0.875, -0.125, -0.25, 0.25));
    }

    #[test]
    fn frame_has_black_interior() {
        let orchestrator = FrameOrchestrator::new(30, 20, WorkerPool::new(4).unwrap());
        let frame = orchestrator.render(&state(1.0)).unwrap();
        assert_eq!((frame.width(), frame.height()), (30, 20));
        // (-0.5, 0) sits in the main cardioid: pixel (15, 10).
        assert_eq!(frame.get(&Pixel(15, 10)), [0, 0, 0]);
        // (-2, -1) escapes at once.
        assert_ne!(frame.get(&Pixel(0, 0)), [0, 0, 0]);
    }

    #[test]
    fn frames_do_not_depend_on_pool_size() {
        let one = FrameOrchestrator::new(21, 13, WorkerPool::new(1).unwrap());
        let many = FrameOrchestrator::new(21, 13, WorkerPool::new(5).unwrap());
        let s = state(3.0);
        assert_eq!(one.render(&s).unwrap(), many.render(&s).unwrap());
    }

    #[test]
    fn frames_past_f64_precision_still_render() {
        let orchestrator = FrameOrchestrator::new(8, 6, WorkerPool::new(2).unwrap());
        let deep = AnimationState {
            zoom: 1e17,
            center: Complex::new(CENTER_RE, CENTER_IM),
            base_range_x: 3.0,
            base_range_y: 3.0 * 6.0 / 8.0,
            ..state(1.0)
        };
        let v = deep.viewport();
        assert_eq!(v.x_min, v.x_max);
        let frame = orchestrator.render(&deep).unwrap();
        // Every pixel maps to the same point, so the frame is one colour.
        let first = frame.get(&Pixel(0, 0));
        assert_eq!(frame.get(&Pixel(7, 5)), first);
        assert_eq!(frame.get(&Pixel(3, 2)), first);
    }

    struct Refuses;

    impl FrameSink for Refuses {
        fn write_frame(&mut self, _: usize, _: &Frame) -> Result<(), failure::Error> {
            Err(failure::err_msg("disk full"))
        }
    }

    #[test]
    fn sink_failures_do_not_lose_the_frame() {
        let orchestrator = FrameOrchestrator::new(8, 6, WorkerPool::new(2).unwrap());
        assert!(orchestrator.emit(&state(1.0), &mut Refuses).is_ok());
    }
}
