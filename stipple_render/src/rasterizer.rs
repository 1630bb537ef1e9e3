// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame sequencing against a persistent op arena.
//!
//! Each [`Rasterizer::frame`] call:
//!
//! 1. **Record** opens a root session and hands the arena to the caller.
//! 2. **Freeze** closes the root session.
//! 3. **Play** expands the root into a [`PaintPlan`].
//! 4. **Release** frees the root session and every macro recorded while it
//!    was open, except those kept with [`Ops::retain`].
//! 5. **Rasterize** paints the plan into a fresh buffer cleared to the
//!    configured background.
//!
//! Macros recorded through [`Rasterizer::ops_mut`] between frames are not
//! frame-local and live until released.
//!
//! A failed frame releases the same sessions and leaves none open, so the
//! next frame starts from a clean recording state. Its trace still ends with
//! a [`FrameEndEvent`] marked `failed`.

use stipple_core::trace::{FrameBeginEvent, FrameEndEvent, Tracer};
use stipple_core::{Error, Ops, PaintPlan};

use crate::buffer::PixelBuffer;
use crate::config::RasterConfig;
use crate::engine::PaintEngine;
use crate::sink::{FrameInfo, FrameSink};

/// Drives frames against one persistent [`Ops`] arena.
#[derive(Debug)]
pub struct Rasterizer {
    config: RasterConfig,
    ops: Ops,
    engine: PaintEngine,
    plan: PaintPlan,
    frame_index: u64,
    last: Option<(FrameInfo, PixelBuffer)>,
}

impl Rasterizer {
    /// Creates a rasterizer with an empty arena.
    #[must_use]
    pub fn new(config: RasterConfig) -> Self {
        Self {
            config,
            ops: Ops::new(),
            engine: PaintEngine::new(),
            plan: PaintPlan::new(),
            frame_index: 0,
            last: None,
        }
    }

    /// The target configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &RasterConfig {
        &self.config
    }

    /// The persistent arena.
    #[inline]
    #[must_use]
    pub fn ops(&self) -> &Ops {
        &self.ops
    }

    /// The persistent arena, for recording macros outside a frame.
    #[inline]
    pub fn ops_mut(&mut self) -> &mut Ops {
        &mut self.ops
    }

    /// Number of frames started so far, including failed ones.
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_index
    }

    /// The plan of the most recent frame that reached playback.
    #[inline]
    #[must_use]
    pub fn last_plan(&self) -> &PaintPlan {
        &self.plan
    }

    /// The most recent successful frame.
    #[must_use]
    pub fn last_frame(&self) -> Option<(&FrameInfo, &PixelBuffer)> {
        self.last.as_ref().map(|(info, buf)| (info, buf))
    }

    /// Records, plays back and rasterizes one frame.
    pub fn frame(
        &mut self,
        record: impl FnOnce(&mut Ops) -> Result<(), Error>,
    ) -> Result<&PixelBuffer, Error> {
        self.frame_traced(&mut Tracer::none(), record)
    }

    /// Like [`frame`](Self::frame), reporting progress to `tracer`.
    pub fn frame_traced(
        &mut self,
        tracer: &mut Tracer<'_>,
        record: impl FnOnce(&mut Ops) -> Result<(), Error>,
    ) -> Result<&PixelBuffer, Error> {
        let frame_index = self.frame_index;
        self.frame_index += 1;
        let RasterConfig {
            width,
            height,
            background,
        } = self.config;
        tracer.frame_begin(&FrameBeginEvent {
            frame_index,
            width,
            height,
        });

        let scope = self.ops.scope_mark();
        let root = self.ops.begin();
        let recorded = record(&mut self.ops).and_then(|()| self.ops.freeze(root));
        let root = match recorded {
            Ok(m) => m,
            Err(e) => {
                tracer.error(&e);
                if self.ops.is_alive(root) {
                    self.ops.discard(root)?;
                }
                self.ops.release_scope(scope);
                Self::abort(tracer, frame_index);
                return Err(e);
            }
        };

        let played = self.ops.play_into(root, &mut self.plan, tracer);
        self.ops.release_scope(scope);
        if played.is_err() {
            Self::abort(tracer, frame_index);
        }
        played?;

        let mut buffer = PixelBuffer::new(width, height, background);
        self.engine.rasterize(&self.plan, &mut buffer);

        let info = FrameInfo {
            frame_index,
            width,
            height,
            painted: self.plan.len(),
            skipped: self.plan.skipped,
        };
        tracer.frame_end(&FrameEndEvent {
            frame_index,
            painted: info.painted,
            skipped: info.skipped,
            failed: false,
        });
        let (_, buffer) = self.last.insert((info, buffer));
        Ok(buffer)
    }

    fn abort(tracer: &mut Tracer<'_>, frame_index: u64) {
        tracer.frame_end(&FrameEndEvent {
            frame_index,
            painted: 0,
            skipped: 0,
            failed: true,
        });
    }

    /// Hands the most recent frame to `sink`. Returns `false` if there is none.
    pub fn present(&self, sink: &mut dyn FrameSink) -> bool {
        match &self.last {
            Some((info, buffer)) => {
                sink.present(info, buffer);
                true
            }
            None => false,
        }
    }
}
