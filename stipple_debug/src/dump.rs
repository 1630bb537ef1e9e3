// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text listings of recorded op streams.
//!
//! ```text
//! #0@0 frozen ops=3
//!   0 clip rect (0,0)-(10,10)
//!   1 source solid #ff0000ff
//!   2 commit
//! ```

use std::fmt::{self, Write as _};

use stipple_core::{ClipShape, MacroId, Op, Ops, PaintSource, Rgba8};

/// Lists every live session of `ops`, one op per line.
#[must_use]
pub fn dump_ops(ops: &Ops) -> String {
    let mut out = String::new();
    for id in ops.sessions() {
        let _ = write_session(&mut out, ops, id);
    }
    out
}

/// Lists one session. Unknown handles produce a single `unknown` line.
#[must_use]
pub fn dump_session(ops: &Ops, id: MacroId) -> String {
    let mut out = String::new();
    let _ = write_session(&mut out, ops, id);
    out
}

fn write_session(out: &mut String, ops: &Ops, id: MacroId) -> fmt::Result {
    let Ok(list) = ops.session_ops(id) else {
        return writeln!(out, "{id} unknown");
    };
    let state = if ops.is_frozen(id) { "frozen" } else { "open" };
    writeln!(out, "{id} {state} ops={}", list.len())?;
    for (i, op) in list.iter().enumerate() {
        write!(out, "  {i} ")?;
        write_op(out, op)?;
        out.push('\n');
    }
    Ok(())
}

fn write_op(out: &mut String, op: &Op) -> fmt::Result {
    out.push_str(op.name());
    match op {
        Op::Transform(m) => {
            let [a, b, c, d, e, f] = m.as_coeffs();
            write!(out, " [{a} {b} {c} {d} {e} {f}]")
        }
        Op::Clip(shape) => write_clip(out, shape),
        Op::SetPaintSource(PaintSource::Solid(c)) => {
            out.push_str(" solid ");
            write_color(out, *c)
        }
        Op::SetPaintSource(PaintSource::Linear(g)) => {
            write!(out, " linear ({},{}) ", g.start.x, g.start.y)?;
            write_color(out, g.start_color)?;
            write!(out, " -> ({},{}) ", g.end.x, g.end.y)?;
            write_color(out, g.end_color)
        }
        Op::MacroRef(id) | Op::Defer(id) => write!(out, " {id}"),
        Op::Commit | Op::PushState | Op::PopState => Ok(()),
    }
}

fn write_clip(out: &mut String, shape: &ClipShape) -> fmt::Result {
    match shape {
        ClipShape::Rect(r) => write!(out, " rect ({},{})-({},{})", r.x0, r.y0, r.x1, r.y1),
        ClipShape::RoundedRect(rr) => {
            let r = rr.rect();
            let radii = rr.radii();
            write!(
                out,
                " rrect ({},{})-({},{}) radii [{} {} {} {}]",
                r.x0,
                r.y0,
                r.x1,
                r.y1,
                radii.top_left,
                radii.top_right,
                radii.bottom_right,
                radii.bottom_left,
            )
        }
        ClipShape::Outline(path) => {
            let b = path.bounding_box();
            write!(
                out,
                " outline elements={} bbox ({},{})-({},{})",
                path.as_bez_path().elements().len(),
                b.x0,
                b.y0,
                b.x1,
                b.y1,
            )
        }
    }
}

fn write_color(out: &mut String, c: Rgba8) -> fmt::Result {
    write!(out, "#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a)
}
