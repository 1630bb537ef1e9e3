// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads events captured by a
//! [`RecorderSink`](super::recorder::RecorderSink) and writes
//! [Chrome Trace Event Format][format] JSON to the given writer. Frames become
//! duration slices; playback events become instants inside them.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, Stamped};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
pub fn export(events: &[Stamped], writer: &mut dyn Write) -> io::Result<()> {
    let events: Vec<Value> = events.iter().map(to_json).collect();
    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn to_json(stamped: &Stamped) -> Value {
    let ts = stamped.at_us;
    match &stamped.event {
        RecordedEvent::FrameBegin(e) => json!({
            "ph": "B",
            "name": "Frame",
            "cat": "Frame",
            "ts": ts,
            "pid": 0,
            "tid": 0,
            "args": {
                "frame_index": e.frame_index,
                "width": e.width,
                "height": e.height,
            }
        }),
        RecordedEvent::FrameEnd(e) => json!({
            "ph": "E",
            "name": "Frame",
            "cat": "Frame",
            "ts": ts,
            "pid": 0,
            "tid": 0,
            "args": {
                "frame_index": e.frame_index,
                "painted": e.painted,
                "skipped": e.skipped,
                "failed": e.failed,
            }
        }),
        RecordedEvent::MacroExpand(e) => json!({
            "ph": "i",
            "name": "Expand",
            "cat": "Playback",
            "ts": ts,
            "pid": 0,
            "tid": 0,
            "s": "t",
            "args": {
                "macro": e.id.to_string(),
                "depth": e.depth,
                "ops": e.op_count,
                "deferred": e.deferred,
            }
        }),
        RecordedEvent::Defer(e) => json!({
            "ph": "i",
            "name": "Defer",
            "cat": "Playback",
            "ts": ts,
            "pid": 0,
            "tid": 0,
            "s": "t",
            "args": {
                "target": e.target.to_string(),
                "session": e.session.to_string(),
                "op_index": e.op_index,
                "queue_len": e.queue_len,
            }
        }),
        RecordedEvent::Paint(e) => json!({
            "ph": "i",
            "name": "Paint",
            "cat": "Paint",
            "ts": ts,
            "pid": 0,
            "tid": 0,
            "s": "t",
            "args": {
                "session": e.session.to_string(),
                "op_index": e.op_index,
                "source": format!("{:?}", e.source),
                "deferred": e.deferred,
            }
        }),
        RecordedEvent::PaintSkip(e) => json!({
            "ph": "i",
            "name": "PaintSkip",
            "cat": "Paint",
            "ts": ts,
            "pid": 0,
            "tid": 0,
            "s": "t",
            "args": {
                "session": e.session.to_string(),
                "op_index": e.op_index,
                "reason": format!("{:?}", e.reason),
            }
        }),
        RecordedEvent::Error(e) => json!({
            "ph": "i",
            "name": "Error",
            "cat": "Error",
            "ts": ts,
            "pid": 0,
            "tid": 0,
            "s": "g",
            "args": {
                "message": e.to_string(),
            }
        }),
    }
}
