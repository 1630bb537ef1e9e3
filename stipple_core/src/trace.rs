// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for frames and playback.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! frame sequencer and playback call at each stage. All method bodies default
//! to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies (one branch per call).

use crate::error::Error;
use crate::ops::MacroId;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Why a `Commit` produced no paint item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The ambient clip had collapsed to nothing.
    EmptyClip,
    /// The ambient transform could not be inverted.
    SingularTransform,
}

/// Which kind of source a paint resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// A constant color.
    Solid,
    /// A two-stop linear gradient.
    Linear,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when the sequencer starts a frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameBeginEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Buffer width in pixels.
    pub width: u32,
    /// Buffer height in pixels.
    pub height: u32,
}

/// Emitted when the sequencer has finished a frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameEndEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Paint items rasterized.
    pub painted: usize,
    /// Commits that produced no item.
    pub skipped: usize,
    /// Whether the frame ended with an error instead of a buffer.
    pub failed: bool,
}

/// Emitted each time playback starts expanding a macro.
#[derive(Clone, Copy, Debug)]
pub struct MacroExpandEvent {
    /// The macro being expanded.
    pub id: MacroId,
    /// Macros already on the invocation path.
    pub depth: usize,
    /// Number of ops in the macro.
    pub op_count: usize,
    /// Whether the expansion came from the deferred queue.
    pub deferred: bool,
}

/// Emitted when a `Defer` op queues a macro.
#[derive(Clone, Copy, Debug)]
pub struct DeferEvent {
    /// The queued macro.
    pub target: MacroId,
    /// Session holding the `Defer` op.
    pub session: MacroId,
    /// Index of the `Defer` op.
    pub op_index: usize,
    /// Queue length after this entry was added.
    pub queue_len: usize,
}

/// Emitted when a `Commit` becomes a paint item.
#[derive(Clone, Copy, Debug)]
pub struct PaintEvent {
    /// Session holding the `Commit`.
    pub session: MacroId,
    /// Index of the `Commit`.
    pub op_index: usize,
    /// Source kind.
    pub source: SourceKind,
    /// Whether the paint belongs to the deferred pass.
    pub deferred: bool,
}

/// Emitted when a `Commit` is dropped.
#[derive(Clone, Copy, Debug)]
pub struct PaintSkipEvent {
    /// Session holding the `Commit`.
    pub session: MacroId,
    /// Index of the `Commit`.
    pub op_index: usize,
    /// Why nothing was painted.
    pub reason: SkipReason,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from frames and playback.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a frame starts.
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        _ = e;
    }

    /// Called when a frame has been rasterized.
    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        _ = e;
    }

    /// Called when a macro expansion starts.
    fn on_macro_expand(&mut self, e: &MacroExpandEvent) {
        _ = e;
    }

    /// Called when a macro is deferred.
    fn on_defer(&mut self, e: &DeferEvent) {
        _ = e;
    }

    /// Called when a commit is planned.
    fn on_paint(&mut self, e: &PaintEvent) {
        _ = e;
    }

    /// Called when a commit is skipped.
    fn on_paint_skip(&mut self, e: &PaintSkipEvent) {
        _ = e;
    }

    /// Called when a pass aborts with a fatal error.
    fn on_error(&mut self, e: &Error) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`FrameBeginEvent`].
    #[inline]
    pub fn frame_begin(&mut self, e: &FrameBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameEndEvent`].
    #[inline]
    pub fn frame_end(&mut self, e: &FrameEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`MacroExpandEvent`].
    #[inline]
    pub fn macro_expand(&mut self, e: &MacroExpandEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_macro_expand(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DeferEvent`].
    #[inline]
    pub fn defer(&mut self, e: &DeferEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_defer(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PaintEvent`].
    #[inline]
    pub fn paint(&mut self, e: &PaintEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_paint(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PaintSkipEvent`].
    #[inline]
    pub fn paint_skip(&mut self, e: &PaintSkipEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_paint_skip(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Reports a fatal error.
    #[inline]
    pub fn error(&mut self, e: &Error) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_error(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
