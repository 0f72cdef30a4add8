// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The zoom loop.  The zoom grows by the same factor every frame,
//! chosen so that it doubles once per configured period of video.
//! The zoom is multiplied *before* each frame is rendered and checked
//! before the next multiply, so the last frame is the first one at or
//! past the target; it usually overshoots a little.

use std::fmt;
use std::time::{Duration, Instant};

use log::info;
use num::Complex;

use crate::config::ZoomConfig;
use crate::errors::RenderError;
use crate::frame::{AnimationState, FrameOrchestrator};
use crate::sink::FrameSink;

/// The sequence of zoom factors an animation renders, one per frame.
#[derive(Copy, Clone, Debug)]
pub struct ZoomSchedule {
    zoom: f64,
    scale_per_frame: f64,
    zoom_end: f64,
}

impl ZoomSchedule {
    /// A schedule starting from zoom 1.
    pub fn new(scale_per_frame: f64, zoom_end: f64) -> Self {
        ZoomSchedule {
            zoom: 1.0,
            scale_per_frame,
            zoom_end,
        }
    }

    /// The schedule a configuration asks for.
    pub fn for_config(config: &ZoomConfig) -> Self {
        ZoomSchedule::new(config.scale_per_frame(), config.zoom_end)
    }
}

impl Iterator for ZoomSchedule {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.zoom >= self.zoom_end {
            return None;
        }
        self.zoom *= self.scale_per_frame;
        Some(self.zoom)
    }
}

/// What a finished run looked like.
#[derive(Copy, Clone, Debug)]
pub struct RunSummary {
    /// Frames rendered.
    pub frames: usize,
    /// Zoom of the last frame, or 1 if none were rendered.
    pub final_zoom: f64,
    /// The point zoomed into.
    pub center: Complex<f64>,
    /// Wall clock time of the whole loop.
    pub elapsed: Duration,
}

impl RunSummary {
    /// Average wall clock time per frame.
    pub fn time_per_frame(&self) -> Duration {
        if self.frames == 0 {
            return Duration::from_secs(0);
        }
        self.elapsed / self.frames as u32
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Frames generated : {}", self.frames)?;
        writeln!(f, "Final zoom       : {:e}", self.final_zoom)?;
        writeln!(f, "Center X         : {}", self.center.re)?;
        writeln!(f, "Center Y         : {}", self.center.im)?;
        writeln!(f, "Total time       : {:.3} seconds", as_secs(self.elapsed))?;
        write!(f, "Time per frame   : {:.3} seconds", as_secs(self.time_per_frame()))
    }
}

fn as_secs(d: Duration) -> f64 {
    d.as_secs() as f64 + f64::from(d.subsec_nanos()) * 1e-9
}

/// Owns the animation state and drives the orchestrator once per frame.
#[derive(Debug)]
pub struct AnimationDriver {
    state: AnimationState,
    schedule: ZoomSchedule,
}

impl AnimationDriver {
    /// A driver at zoom 1, frame 0.
    pub fn new(config: &ZoomConfig) -> Result<Self, RenderError> {
        config.validate()?;
        Ok(AnimationDriver {
            state: AnimationState {
                zoom: 1.0,
                frame_index: 0,
                center: config.center,
                base_range_x: config.base_range_x(),
                base_range_y: config.base_range_y(),
            },
            schedule: ZoomSchedule::for_config(config),
        })
    }

    /// Where the animation currently is.
    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    /// Render every remaining frame into `sink`.
    pub fn run<S: FrameSink>(
        &mut self,
        orchestrator: &FrameOrchestrator,
        sink: &mut S,
    ) -> Result<RunSummary, RenderError> {
        let start = Instant::now();
        let first_frame = self.state.frame_index;

        while let Some(zoom) = self.schedule.next() {
            self.state.zoom = zoom;
            orchestrator.emit(&self.state, sink)?;
            info!("frame {} | zoom = {:e}", self.state.frame_index, self.state.zoom);
            self.state.frame_index += 1;
        }

        Ok(RunSummary {
            frames: self.state.frame_index - first_frame,
            final_zoom: self.state.zoom,
            center: self.state.center,
            elapsed: start.elapsed(),
        })
    }
}
