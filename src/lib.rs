#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot zoom renderer
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which repeatedly squaring `z` and adding `c`, starting from
//! zero, never runs off to infinity.  The points just outside it run
//! off eventually, and how many steps that takes (the "escape time")
//! is what gets coloured.
//!
//! This crate renders an animation that zooms steadily into one point
//! on the boundary of the set.  Each frame is computed on its own:
//! the escape time of every pixel is found in parallel, the counts are
//! gathered into a histogram, and the histogram's cumulative
//! distribution decides how bright each pixel is.  That equalization
//! keeps every frame evenly lit no matter how deep the zoom gets.  The
//! zoom factor grows geometrically from frame to frame, and the
//! iteration budget grows with the logarithm of the zoom.

pub mod animation;
pub mod colorize;
pub mod config;
pub mod errors;
pub mod escape;
pub mod frame;
pub mod histogram;
pub mod planes;
pub mod pool;
pub mod sink;

pub use animation::{AnimationDriver, RunSummary, ZoomSchedule};
pub use colorize::Frame;
pub use config::ZoomConfig;
pub use errors::RenderError;
pub use frame::{AnimationState, FrameOrchestrator};
pub use pool::WorkerPool;
pub use sink::{encode_video, FrameSink, PngSequence};
