// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Expansion
//! lines are indented by invocation depth.

use std::io::Write;

use stipple_core::Error;
use stipple_core::trace::{
    DeferEvent, FrameBeginEvent, FrameEndEvent, MacroExpandEvent, PaintEvent, PaintSkipEvent,
    SkipReason, SourceKind, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    /// Skip per-paint lines, keeping frame and error lines.
    quiet: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("quiet", &self.quiet)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            quiet: false,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            quiet: false,
        }
    }

    /// Only print frame and error lines.
    #[must_use]
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn source_name(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Solid => "solid",
        SourceKind::Linear => "linear",
    }
}

fn skip_name(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::EmptyClip => "empty-clip",
        SkipReason::SingularTransform => "singular-transform",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[frame:begin] frame={} size={}x{}",
            e.frame_index, e.width, e.height,
        );
    }

    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        let _ = writeln!(
            self.writer,
            "[frame:end] frame={} painted={} skipped={}{}",
            e.frame_index,
            e.painted,
            e.skipped,
            if e.failed { " failed" } else { "" },
        );
    }

    fn on_macro_expand(&mut self, e: &MacroExpandEvent) {
        if self.quiet {
            return;
        }
        let pass = if e.deferred { " deferred" } else { "" };
        let _ = writeln!(
            self.writer,
            "{:indent$}[expand] {} ops={}{pass}",
            "",
            e.id,
            e.op_count,
            indent = e.depth * 2,
        );
    }

    fn on_defer(&mut self, e: &DeferEvent) {
        if self.quiet {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[defer] {} from {}[{}] queue={}",
            e.target, e.session, e.op_index, e.queue_len,
        );
    }

    fn on_paint(&mut self, e: &PaintEvent) {
        if self.quiet {
            return;
        }
        let pass = if e.deferred { " deferred" } else { "" };
        let _ = writeln!(
            self.writer,
            "[paint] {}[{}] {}{pass}",
            e.session,
            e.op_index,
            source_name(e.source),
        );
    }

    fn on_paint_skip(&mut self, e: &PaintSkipEvent) {
        if self.quiet {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[skip] {}[{}] {}",
            e.session,
            e.op_index,
            skip_name(e.reason),
        );
    }

    fn on_error(&mut self, e: &Error) {
        let _ = writeln!(self.writer, "[error] {e}");
    }
}

#[cfg(test)]
mod tests {
    use stipple_core::Ops;
    use stipple_core::trace::Tracer;

    use super::*;

    #[test]
    fn frame_lines() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_frame_begin(&FrameBeginEvent {
            frame_index: 3,
            width: 128,
            height: 64,
        });
        sink.on_frame_end(&FrameEndEvent {
            frame_index: 3,
            painted: 2,
            skipped: 1,
            failed: false,
        });
        sink.on_frame_end(&FrameEndEvent {
            frame_index: 4,
            painted: 0,
            skipped: 0,
            failed: true,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("[frame:begin] frame=3 size=128x64"), "got: {output}");
        assert!(output.contains("painted=2 skipped=1\n"), "got: {output}");
        assert!(output.contains("[frame:end] frame=4 painted=0 skipped=0 failed"), "got: {output}");
    }

    #[test]
    fn playback_is_printed_with_nesting() {
        let mut ops = Ops::new();
        let inner = ops.record(Ops::paint).unwrap();
        let root = ops.record(|ops| ops.invoke(inner)).unwrap();

        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        ops.play(root, &mut Tracer::new(&mut sink)).unwrap();
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(
            output.starts_with(&format!("[expand] {} ops=1", root.id())),
            "got: {output}"
        );
        assert!(
            output.contains(&format!("\n  [expand] {} ops=1", inner.id())),
            "got: {output}"
        );
        assert!(output.contains("solid"), "got: {output}");
    }

    #[test]
    fn quiet_keeps_errors() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new()).quiet();
        sink.on_paint(&PaintEvent {
            session: Ops::new().begin(),
            op_index: 0,
            source: SourceKind::Solid,
            deferred: false,
        });
        sink.on_error(&Error::NoActiveRecording);
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(!output.contains("[paint]"), "got: {output}");
        assert!(output.starts_with("[error] "), "got: {output}");
    }
}
