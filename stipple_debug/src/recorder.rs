// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timestamped in-memory event capture.
//!
//! [`RecorderSink`] implements [`TraceSink`] and stores every event, stamped
//! with microseconds since the recorder was created, for later inspection or
//! export through [`chrome::export`](crate::chrome::export).

use std::time::Instant;

use stipple_core::Error;
use stipple_core::trace::{
    DeferEvent, FrameBeginEvent, FrameEndEvent, MacroExpandEvent, PaintEvent, PaintSkipEvent,
    TraceSink,
};

/// One captured event.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// See [`TraceSink::on_frame_begin`].
    FrameBegin(FrameBeginEvent),
    /// See [`TraceSink::on_frame_end`].
    FrameEnd(FrameEndEvent),
    /// See [`TraceSink::on_macro_expand`].
    MacroExpand(MacroExpandEvent),
    /// See [`TraceSink::on_defer`].
    Defer(DeferEvent),
    /// See [`TraceSink::on_paint`].
    Paint(PaintEvent),
    /// See [`TraceSink::on_paint_skip`].
    PaintSkip(PaintSkipEvent),
    /// See [`TraceSink::on_error`].
    Error(Error),
}

/// A [`RecordedEvent`] with its capture time.
#[derive(Clone, Debug)]
pub struct Stamped {
    /// Microseconds since the recorder was created.
    pub at_us: f64,
    /// The event.
    pub event: RecordedEvent,
}

/// A [`TraceSink`] that keeps every event in memory.
#[derive(Debug)]
pub struct RecorderSink {
    origin: Instant,
    events: Vec<Stamped>,
}

impl Default for RecorderSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecorderSink {
    /// Creates an empty recorder whose clock starts now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            events: Vec::new(),
        }
    }

    /// Events captured so far, in arrival order.
    #[must_use]
    pub fn events(&self) -> &[Stamped] {
        &self.events
    }

    /// Consumes the recorder and returns the captured events.
    #[must_use]
    pub fn into_events(self) -> Vec<Stamped> {
        self.events
    }

    /// Drops captured events without resetting the clock.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    fn push(&mut self, event: RecordedEvent) {
        let at_us = self.origin.elapsed().as_secs_f64() * 1e6;
        self.events.push(Stamped { at_us, event });
    }
}

impl TraceSink for RecorderSink {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        self.push(RecordedEvent::FrameBegin(*e));
    }

    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        self.push(RecordedEvent::FrameEnd(*e));
    }

    fn on_macro_expand(&mut self, e: &MacroExpandEvent) {
        self.push(RecordedEvent::MacroExpand(*e));
    }

    fn on_defer(&mut self, e: &DeferEvent) {
        self.push(RecordedEvent::Defer(*e));
    }

    fn on_paint(&mut self, e: &PaintEvent) {
        self.push(RecordedEvent::Paint(*e));
    }

    fn on_paint_skip(&mut self, e: &PaintSkipEvent) {
        self.push(RecordedEvent::PaintSkip(*e));
    }

    fn on_error(&mut self, e: &Error) {
        self.push(RecordedEvent::Error(*e));
    }
}
