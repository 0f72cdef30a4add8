// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors raised by the rendering core.  The numeric pipeline itself
//! is total; these only come from building the inputs to it or from a
//! worker thread dying underneath us.

use failure::Fail;

/// Everything that can go wrong before or during a frame render.
#[derive(Debug, Fail, PartialEq)]
pub enum RenderError {
    /// The complex window or pixel grid handed to the plane mapper
    /// can't be mapped.
    #[fail(display = "invalid plane: {}", _0)]
    InvalidPlane(String),

    /// A worker pool needs at least one worker.
    #[fail(display = "a worker pool needs at least one worker")]
    NoWorkers,

    /// One of the scoped worker threads panicked.
    #[fail(display = "a render worker panicked")]
    WorkerPanicked,

    /// The animation configuration is out of range.
    #[fail(display = "invalid configuration: {}", _0)]
    InvalidConfig(String),
}
