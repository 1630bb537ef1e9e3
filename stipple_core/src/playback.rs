// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Macro expansion into a [`PaintPlan`].
//!
//! Playback walks a frozen root macro op by op against a fresh
//! [`StateStack`]:
//!
//! 1. **Immediate pass**: `Transform`, `Clip`, `PushState` and `PopState` drive
//!    the stack, `SetPaintSource` replaces the current source, and `Commit`
//!    resolves the source against the ambient snapshot into a [`PaintItem`].
//!    `MacroRef` expands the target inline with no implicit save, exactly as
//!    if its ops had been recorded at the call site.
//! 2. **Deferred pass**: every `Defer` queued a (macro, snapshot, source)
//!    entry. Once the root is exhausted, entries are expanded first-in
//!    first-out, each starting from the snapshot captured when it was
//!    deferred. Defers reached during this pass join the back of the queue.
//!
//! Expansion keeps its own stack of macro frames, so call depth is bounded
//! by memory rather than by the native stack.
//!
//! A per-slot flag marks the macros on the current invocation path. Reaching
//! a flagged macro again is a [`MacroCycle`](Error::MacroCycle). Deferred
//! entries remember the path that queued them, so a macro deferring itself
//! is caught the same way.
//!
//! Playback only reads the arena. The same macro can be expanded under any
//! number of ambient transforms, and independent passes can share one
//! `&Ops`.

use alloc::collections::VecDeque;
use alloc::vec;
use alloc::vec::Vec;

use crate::clip::is_invertible;
use crate::error::{Error, ImbalanceKind, OpSite};
use crate::ops::{Macro, MacroId, Op, Ops};
use crate::paint::PaintSource;
use crate::plan::{PaintItem, PaintPlan};
use crate::state::{Snapshot, StateStack};
use crate::trace::{
    DeferEvent, MacroExpandEvent, PaintEvent, PaintSkipEvent, SkipReason, SourceKind, Tracer,
};

/// A macro waiting for the deferred pass.
#[derive(Debug)]
struct Deferred {
    target: MacroId,
    snapshot: Snapshot,
    source: PaintSource,
    /// Invocation path at the `Defer` op.
    chain: Vec<MacroId>,
    site: OpSite,
}

impl Ops {
    /// Expands `root` into a back-to-front [`PaintPlan`].
    pub fn play(&self, root: Macro, tracer: &mut Tracer<'_>) -> Result<PaintPlan, Error> {
        let mut plan = PaintPlan::new();
        self.play_into(root, &mut plan, tracer)?;
        Ok(plan)
    }

    /// Like [`play`](Self::play), but reuses a caller-provided plan.
    ///
    /// On error the plan holds whatever was resolved before the failure.
    pub fn play_into(
        &self,
        root: Macro,
        plan: &mut PaintPlan,
        tracer: &mut Tracer<'_>,
    ) -> Result<(), Error> {
        plan.clear();
        let mut pass = Pass {
            ops: self,
            state: StateStack::new(),
            source: PaintSource::default(),
            queue: VecDeque::new(),
            expanding: vec![false; self.len as usize],
            path: Vec::new(),
            frames: Vec::new(),
            flushing: false,
            plan,
        };
        let result = pass.run(root.id(), tracer);
        if let Err(e) = &result {
            tracer.error(e);
        }
        result
    }
}

struct Pass<'a> {
    ops: &'a Ops,
    state: StateStack,
    source: PaintSource,
    queue: VecDeque<Deferred>,
    /// Macros on `path`, by slot.
    expanding: Vec<bool>,
    /// Invocation path: a deferred entry's chain, then one id per frame.
    path: Vec<MacroId>,
    /// Macros being expanded, innermost last.
    frames: Vec<Frame<'a>>,
    flushing: bool,
    plan: &'a mut PaintPlan,
}

/// Expansion cursor into one macro's ops.
struct Frame<'a> {
    id: MacroId,
    ops: &'a [Op],
    next: usize,
}

impl<'a> Pass<'a> {
    fn run(&mut self, root: MacroId, tracer: &mut Tracer<'_>) -> Result<(), Error> {
        self.expand(root, None, tracer)?;

        self.flushing = true;
        while let Some(entry) = self.queue.pop_front() {
            self.state = StateStack::with_base(entry.snapshot);
            self.source = entry.source;
            for id in &entry.chain {
                self.expanding[id.idx as usize] = true;
            }
            self.path = entry.chain;
            let result = self.expand(entry.target, Some(entry.site), tracer);
            for id in self.path.drain(..) {
                self.expanding[id.idx as usize] = false;
            }
            result?;
        }
        Ok(())
    }

    /// Expands `id` and every macro it calls, without recursing.
    fn expand(
        &mut self,
        id: MacroId,
        at: Option<OpSite>,
        tracer: &mut Tracer<'_>,
    ) -> Result<(), Error> {
        self.enter(id, at, tracer)?;
        while let Some(frame) = self.frames.last_mut() {
            let (session, ops, op_index) = (frame.id, frame.ops, frame.next);
            frame.next += 1;
            match ops.get(op_index) {
                Some(op) => self.step(session, op_index, op, tracer)?,
                None => self.leave(),
            }
        }
        Ok(())
    }

    fn enter(
        &mut self,
        id: MacroId,
        at: Option<OpSite>,
        tracer: &mut Tracer<'_>,
    ) -> Result<(), Error> {
        let arena: &'a Ops = self.ops;
        let ops = arena.resolve(id, at)?;
        let slot = id.idx as usize;
        if self.expanding[slot] {
            return Err(Error::MacroCycle {
                id,
                depth: self.path.len(),
                at,
            });
        }
        tracer.macro_expand(&MacroExpandEvent {
            id,
            depth: self.path.len(),
            op_count: ops.len(),
            deferred: self.flushing,
        });
        self.expanding[slot] = true;
        self.path.push(id);
        self.frames.push(Frame { id, ops, next: 0 });
        Ok(())
    }

    fn leave(&mut self) {
        self.frames.pop();
        if let Some(done) = self.path.pop() {
            self.expanding[done.idx as usize] = false;
        }
    }

    fn step(
        &mut self,
        session: MacroId,
        op_index: usize,
        op: &Op,
        tracer: &mut Tracer<'_>,
    ) -> Result<(), Error> {
        let site = OpSite { session, op_index };
        match op {
            Op::Transform(m) => self.state.apply_affine(*m),
            Op::Clip(shape) => self.state.apply_clip(shape.clone()),
            Op::SetPaintSource(source) => self.source = *source,
            Op::Commit => self.commit(site, tracer),
            Op::PushState => self.state.push(),
            Op::PopState => {
                if self.state.pop().is_none() {
                    return Err(Error::StateImbalance {
                        session,
                        op_index,
                        kind: ImbalanceKind::PopWithoutPush,
                    });
                }
            }
            Op::MacroRef(target) => self.enter(*target, Some(site), tracer)?,
            Op::Defer(target) => {
                self.queue.push_back(Deferred {
                    target: *target,
                    snapshot: self.state.current().clone(),
                    source: self.source,
                    chain: self.path.clone(),
                    site,
                });
                tracer.defer(&DeferEvent {
                    target: *target,
                    session,
                    op_index,
                    queue_len: self.queue.len(),
                });
            }
        }
        Ok(())
    }

    fn commit(&mut self, site: OpSite, tracer: &mut Tracer<'_>) {
        let snapshot = self.state.current();
        let skip = if snapshot.clip.is_empty() {
            Some(SkipReason::EmptyClip)
        } else if !is_invertible(snapshot.transform) {
            Some(SkipReason::SingularTransform)
        } else {
            None
        };
        if let Some(reason) = skip {
            self.plan.skipped += 1;
            tracer.paint_skip(&PaintSkipEvent {
                session: site.session,
                op_index: site.op_index,
                reason,
            });
            return;
        }

        tracer.paint(&PaintEvent {
            session: site.session,
            op_index: site.op_index,
            source: match self.source {
                PaintSource::Solid(_) => SourceKind::Solid,
                PaintSource::Linear(_) => SourceKind::Linear,
            },
            deferred: self.flushing,
        });
        self.plan.items.push(PaintItem {
            transform: snapshot.transform,
            clip: snapshot.clip.clone(),
            source: self.source,
            deferred: self.flushing,
            session: site.session,
            op_index: site.op_index,
        });
    }
}
