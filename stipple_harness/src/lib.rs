// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Record/verify harness for end-to-end render checks.
//!
//! A check is a pair of callbacks: `record` issues ops into the frame's root
//! session, `verify` samples the rasterized buffer through a [`Sampler`].
//! [`run`] renders a single pair; [`multi_run`] and [`Harness::run_all`] run
//! a sequence of pairs against one persistent [`Rasterizer`]. Macros recorded
//! through [`Harness::ops_mut`], or kept with [`Ops::retain`] inside a frame,
//! can be invoked in later frames.
//!
//! ```rust,ignore
//! stipple_harness::run(
//!     |ops| ops.fill_shape(Rect::new(0.0, 0.0, 10.0, 10.0), RED),
//!     |s| {
//!         s.expect(5, 5, RED).expect(15, 15, WHITE);
//!     },
//! )?;
//! ```
//!
//! Failing frames are written as PNG when [`HarnessConfig::failure_dir`] is
//! set. With [`HarnessConfig::trace`] on, every frame is traced to stderr.

use std::fmt;
use std::path::PathBuf;

use stipple_core::trace::Tracer;
use stipple_core::{Error, Ops, Rgba8};
use stipple_debug::png::save_png;
use stipple_debug::pretty::PrettyPrintSink;
use stipple_render::{PixelBuffer, RasterConfig, Rasterizer};

/// Environment variable naming a directory for failure images.
pub const FAILURE_DIR_VAR: &str = "STIPPLE_FAILURE_DIR";
/// Environment variable that turns on per-frame tracing when set to `1`.
pub const TRACE_VAR: &str = "STIPPLE_TRACE";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// How frames are rendered and compared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Target size and background.
    pub raster: RasterConfig,
    /// Largest per-channel difference still counted as a match.
    pub tolerance: u8,
    /// Where to write PNGs of frames that fail verification.
    pub failure_dir: Option<PathBuf>,
    /// Trace every frame to stderr.
    pub trace: bool,
}

impl HarnessConfig {
    /// Default per-channel tolerance.
    pub const DEFAULT_TOLERANCE: u8 = 2;

    /// Defaults overridden by [`FAILURE_DIR_VAR`] and [`TRACE_VAR`].
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(dir) = std::env::var_os(FAILURE_DIR_VAR).filter(|d| !d.is_empty()) {
            config.failure_dir = Some(PathBuf::from(dir));
        }
        config.trace = std::env::var(TRACE_VAR).is_ok_and(|v| v == "1");
        config
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            raster: RasterConfig::default(),
            tolerance: Self::DEFAULT_TOLERANCE,
            failure_dir: None,
            trace: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Sampling
// ---------------------------------------------------------------------------

/// Whether every channel of `a` and `b` differs by at most `tolerance`.
#[must_use]
pub fn colors_close(a: Rgba8, b: Rgba8, tolerance: u8) -> bool {
    [(a.r, b.r), (a.g, b.g), (a.b, b.b), (a.a, b.a)]
        .iter()
        .all(|&(x, y)| x.abs_diff(y) <= tolerance)
}

/// One failed sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mismatch {
    /// Pixel column.
    pub x: u32,
    /// Pixel row.
    pub y: u32,
    /// Expected color.
    pub expected: Rgba8,
    /// Color found, or `None` when `(x, y)` is outside the buffer.
    pub actual: Option<Rgba8>,
}

struct Hex(Rgba8);

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.0;
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a)
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}): expected {}, ", self.x, self.y, Hex(self.expected))?;
        match self.actual {
            Some(c) => write!(f, "got {}", Hex(c)),
            None => f.write_str("outside the buffer"),
        }
    }
}

/// Collects color expectations against one frame.
#[derive(Debug)]
pub struct Sampler<'a> {
    buffer: &'a PixelBuffer,
    tolerance: u8,
    failures: Vec<Mismatch>,
}

impl<'a> Sampler<'a> {
    /// Creates a sampler over `buffer`.
    #[must_use]
    pub fn new(buffer: &'a PixelBuffer, tolerance: u8) -> Self {
        Self {
            buffer,
            tolerance,
            failures: Vec::new(),
        }
    }

    /// Records a failure unless pixel `(x, y)` is close to `expected`.
    pub fn expect(&mut self, x: u32, y: u32, expected: Rgba8) -> &mut Self {
        let actual = self.buffer.get(x, y);
        if !actual.is_some_and(|c| colors_close(c, expected, self.tolerance)) {
            self.failures.push(Mismatch {
                x,
                y,
                expected,
                actual,
            });
        }
        self
    }

    /// The pixel at `(x, y)`.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba8> {
        self.buffer.get(x, y)
    }

    /// The frame being checked.
    #[must_use]
    pub fn buffer(&self) -> &PixelBuffer {
        self.buffer
    }

    /// Failures so far.
    #[must_use]
    pub fn failures(&self) -> &[Mismatch] {
        &self.failures
    }

    fn finish(self) -> Vec<Mismatch> {
        self.failures
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a harness run failed.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// Recording or playback of a frame failed.
    #[error("frame {frame}: {source}")]
    Render {
        /// Index of the failed frame within the run.
        frame: usize,
        /// The op-stream error.
        source: Error,
    },
    /// Some samples did not match.
    #[error("frame {frame}: {} sample(s) mismatched{}", .failures.len(), List(.failures))]
    Mismatch {
        /// Index of the failed frame within the run.
        frame: usize,
        /// Every failed sample, in call order.
        failures: Vec<Mismatch>,
        /// Where the frame was written, if it was.
        image: Option<PathBuf>,
    },
    /// A failure image could not be written.
    #[error("writing failure image: {0}")]
    Image(#[from] image::ImageError),
    /// The failure directory could not be created.
    #[error("creating failure directory: {0}")]
    Io(#[from] std::io::Error),
}

struct List<'a>(&'a [Mismatch]);

impl fmt::Display for List<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in self.0 {
            write!(f, "\n  {m}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

type RecordFn<'a> = Box<dyn FnOnce(&mut Ops) -> Result<(), Error> + 'a>;
type VerifyFn<'a> = Box<dyn FnOnce(&mut Sampler<'_>) + 'a>;

/// A recording callback paired with its verification callback.
pub struct Frame<'a> {
    record: RecordFn<'a>,
    verify: VerifyFn<'a>,
}

impl fmt::Debug for Frame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame").finish_non_exhaustive()
    }
}

/// Pairs `record` with `verify` for [`multi_run`] or [`Harness::run_all`].
pub fn frame<'a>(
    record: impl FnOnce(&mut Ops) -> Result<(), Error> + 'a,
    verify: impl FnOnce(&mut Sampler<'_>) + 'a,
) -> Frame<'a> {
    Frame {
        record: Box::new(record),
        verify: Box::new(verify),
    }
}

/// A persistent rasterizer plus comparison settings.
#[derive(Debug)]
pub struct Harness {
    config: HarnessConfig,
    name: String,
    raster: Rasterizer,
    frames: usize,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new(HarnessConfig::from_env())
    }
}

impl Harness {
    /// Creates a harness with a fresh rasterizer.
    #[must_use]
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            raster: Rasterizer::new(config.raster),
            config,
            name: String::from("frame"),
            frames: 0,
        }
    }

    /// Prefix for failure image file names.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// The rasterizer driving the frames.
    #[must_use]
    pub fn rasterizer(&self) -> &Rasterizer {
        &self.raster
    }

    /// The persistent arena, for recording macros between frames.
    pub fn ops_mut(&mut self) -> &mut Ops {
        self.raster.ops_mut()
    }

    /// Renders one frame and verifies it.
    pub fn frame(
        &mut self,
        record: impl FnOnce(&mut Ops) -> Result<(), Error>,
        verify: impl FnOnce(&mut Sampler<'_>),
    ) -> Result<(), HarnessError> {
        let index = self.frames;
        self.frames += 1;

        let rendered = if self.config.trace {
            let mut sink = PrettyPrintSink::stderr();
            let mut tracer = Tracer::new(&mut sink);
            self.raster.frame_traced(&mut tracer, record)
        } else {
            self.raster.frame(record)
        };
        let buffer = rendered.map_err(|source| HarnessError::Render {
            frame: index,
            source,
        })?;

        let mut sampler = Sampler::new(buffer, self.config.tolerance);
        verify(&mut sampler);
        let failures = sampler.finish();
        if failures.is_empty() {
            return Ok(());
        }

        let image = match &self.config.failure_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                let path = dir.join(format!("{}-{index}.png", self.name));
                save_png(buffer, &path)?;
                Some(path)
            }
            None => None,
        };
        Err(HarnessError::Mismatch {
            frame: index,
            failures,
            image,
        })
    }

    /// Renders and verifies each frame in order, stopping at the first
    /// failure.
    pub fn run_all<'a>(
        &mut self,
        frames: impl IntoIterator<Item = Frame<'a>>,
    ) -> Result<(), HarnessError> {
        for Frame { record, verify } in frames {
            self.frame(record, verify)?;
        }
        Ok(())
    }
}

/// Renders a single frame with [`HarnessConfig::from_env`] and verifies it.
pub fn run(
    record: impl FnOnce(&mut Ops) -> Result<(), Error>,
    verify: impl FnOnce(&mut Sampler<'_>),
) -> Result<(), HarnessError> {
    Harness::default().frame(record, verify)
}

/// Runs `frames` in order against one persistent rasterizer.
pub fn multi_run<'a>(frames: impl IntoIterator<Item = Frame<'a>>) -> Result<(), HarnessError> {
    Harness::default().run_all(frames)
}
