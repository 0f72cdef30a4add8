// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Where finished frames go.  None of this affects what gets rendered,
//! so callers treat every error from here as something to report and
//! carry on past.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use failure::{err_msg, Error, ResultExt};
use image::ColorType;
use log::debug;

use crate::colorize::Frame;

/// Receives each frame of an animation, in order.
pub trait FrameSink {
    /// Take frame number `index`.
    fn write_frame(&mut self, index: usize, frame: &Frame) -> Result<(), Error>;
}

/// Name of the file holding frame `index`.
pub fn frame_file_name(index: usize) -> String {
    format!("frame_{:05}.png", index)
}

fn is_frame_file(name: &str) -> bool {
    name.starts_with("frame_") && name.ends_with(".png")
}

/// Writes frames as numbered PNG files into one directory.
#[derive(Debug)]
pub struct PngSequence {
    dir: PathBuf,
}

impl PngSequence {
    /// A sequence written into `dir`.  Nothing touches the disk until
    /// `prepare` or the first frame.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        PngSequence {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// The output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where frame `index` ends up.
    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.dir.join(frame_file_name(index))
    }

    /// The ffmpeg input pattern matching every frame of the sequence.
    pub fn pattern(&self) -> PathBuf {
        self.dir.join("frame_%05d.png")
    }

    /// Create the directory and clear out frames left by an earlier run.
    /// Returns the number of stale frames removed.
    pub fn prepare(&self) -> Result<usize, Error> {
        fs::create_dir_all(&self.dir)
            .with_context(|_| format!("creating {}", self.dir.display()))?;

        let mut removed = 0;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let stale = path
                .file_name()
                .and_then(|name| name.to_str())
                .map_or(false, is_frame_file);
            if stale && path.is_file() {
                fs::remove_file(&path).with_context(|_| format!("removing {}", path.display()))?;
                removed += 1;
            }
        }
        debug!("removed {} stale frames from {}", removed, self.dir.display());
        Ok(removed)
    }
}

impl FrameSink for PngSequence {
    fn write_frame(&mut self, index: usize, frame: &Frame) -> Result<(), Error> {
        let path = self.frame_path(index);
        image::save_buffer(
            &path,
            frame.as_raw(),
            frame.width() as u32,
            frame.height() as u32,
            ColorType::RGB(8),
        )
        .with_context(|_| format!("writing {}", path.display()))?;
        Ok(())
    }
}

/// Stitch a PNG sequence into an H.264 video with ffmpeg.
pub fn encode_video(frames: &PngSequence, fps: u32, output: &Path) -> Result<(), Error> {
    let status = Command::new("ffmpeg")
        .arg("-y")
        .arg("-framerate")
        .arg(fps.to_string())
        .arg("-i")
        .arg(frames.pattern())
        .arg("-c:v")
        .arg("libx264")
        .arg("-pix_fmt")
        .arg("yuv420p")
        .arg(output)
        .stdin(Stdio::null())
        .status()
        .context("failed to run ffmpeg; is it installed?")?;

    if !status.success() {
        return Err(err_msg(format!("ffmpeg exited with {}", status)));
    }
    Ok(())
}
