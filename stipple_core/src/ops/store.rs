// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays session storage with allocation, recording, and freezing.

use alloc::vec::Vec;

use color::Rgba8;
use kurbo::{Affine, Vec2};

use super::id::{Macro, MacroId};
use super::op::Op;
use crate::clip::ClipShape;
use crate::error::{Error, ImbalanceKind, OpSite};
use crate::paint::{LinearGradient, PaintSource};

/// Arena of recording sessions.
///
/// Sessions are addressed by [`MacroId`] handles. Internally, each session
/// occupies a slot in parallel arrays. Released sessions are recycled via a
/// free list, and generation counters reject stale handles.
#[derive(Debug, Default)]
pub struct Ops {
    // -- Content --
    pub(crate) ops: Vec<Vec<Op>>,

    // -- Recording state --
    pub(crate) frozen: Vec<bool>,
    /// Unmatched `PushState`s per session.
    pub(crate) depth: Vec<u32>,

    // -- Allocation --
    pub(crate) alive: Vec<bool>,
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Lifetime --
    /// Allocation serial of each slot's current session.
    pub(crate) born: Vec<u64>,
    /// Sessions kept alive past the scope they were recorded in.
    pub(crate) retained: Vec<bool>,
    pub(crate) serial: u64,

    // -- Open sessions, innermost last --
    pub(crate) open: Vec<u32>,
}

/// A point in session allocation order, taken by [`Ops::scope_mark`].
///
/// Every session begun after the mark belongs to its scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScopeMark(u64);

impl Ops {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Session API --

    /// Opens a new session nested inside the current one and returns its id.
    ///
    /// Ops appended from now on land in the new session until it is frozen.
    pub fn begin(&mut self) -> MacroId {
        let serial = self.serial;
        self.serial += 1;
        let idx = if let Some(idx) = self.free_list.pop() {
            let i = idx as usize;
            self.ops[i].clear();
            self.frozen[i] = false;
            self.depth[i] = 0;
            self.alive[i] = true;
            self.born[i] = serial;
            self.retained[i] = false;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.ops.push(Vec::new());
            self.frozen.push(false);
            self.depth.push(0);
            self.alive.push(true);
            self.generation.push(0);
            self.born.push(serial);
            self.retained.push(false);
            idx
        };
        self.open.push(idx);
        MacroId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Appends `op` to the innermost open session.
    ///
    /// A `PopState` without a matching `PushState` earlier in the same
    /// session is rejected and not appended.
    pub fn append(&mut self, op: Op) -> Result<(), Error> {
        let &idx = self.open.last().ok_or(Error::NoActiveRecording)?;
        let i = idx as usize;
        match op {
            Op::PushState => self.depth[i] += 1,
            Op::PopState => {
                if self.depth[i] == 0 {
                    return Err(Error::StateImbalance {
                        session: self.id_at(idx),
                        op_index: self.ops[i].len(),
                        kind: ImbalanceKind::PopWithoutPush,
                    });
                }
                self.depth[i] -= 1;
            }
            _ => {}
        }
        self.ops[i].push(op);
        Ok(())
    }

    /// Closes session `id` and returns it as an immutable [`Macro`].
    ///
    /// `id` must be the innermost open session, and every `PushState` it
    /// recorded must have been popped.
    pub fn freeze(&mut self, id: MacroId) -> Result<Macro, Error> {
        let i = self.slot(id, None)?;
        if self.frozen[i] {
            return Err(Error::MacroNotFinalized { id, at: None });
        }
        let innermost = self.innermost().ok_or(Error::NoActiveRecording)?;
        if innermost != id {
            return Err(Error::RecordingOrder { id, innermost });
        }
        if self.depth[i] != 0 {
            return Err(Error::StateImbalance {
                session: id,
                op_index: self.ops[i].len(),
                kind: ImbalanceKind::UnpoppedAtFreeze {
                    open: self.depth[i],
                },
            });
        }
        self.open.pop();
        self.frozen[i] = true;
        Ok(Macro(id))
    }

    /// Frees a frozen macro's slot.
    ///
    /// Sessions that still reference it fail with [`Error::UnknownMacro`] when
    /// played back.
    pub fn release(&mut self, m: Macro) -> Result<(), Error> {
        let i = self.slot(m.0, None)?;
        debug_assert!(self.frozen[i], "Macro handles only exist for frozen sessions");
        self.free(m.0.idx);
        Ok(())
    }

    /// Drops a session whether open or frozen.
    ///
    /// Discarding an open session also discards every session opened inside
    /// it that is still open.
    pub fn discard(&mut self, id: MacroId) -> Result<(), Error> {
        let i = self.slot(id, None)?;
        if self.frozen[i] {
            self.free(id.idx);
            return Ok(());
        }
        if let Some(pos) = self.open.iter().position(|&o| o == id.idx) {
            let nested: Vec<u32> = self.open.drain(pos..).collect();
            for idx in nested {
                self.free(idx);
            }
        }
        Ok(())
    }

    /// Marks the current point in session allocation order.
    ///
    /// [`release_scope`](Self::release_scope) later frees the frozen sessions
    /// begun after the mark.
    #[must_use]
    pub fn scope_mark(&self) -> ScopeMark {
        ScopeMark(self.serial)
    }

    /// Keeps a macro alive when the scope it was recorded in is released.
    ///
    /// A retained macro lives until an explicit [`release`](Self::release).
    /// Macros it references are not retained with it.
    pub fn retain(&mut self, m: Macro) -> Result<(), Error> {
        let i = self.slot(m.0, None)?;
        self.retained[i] = true;
        Ok(())
    }

    /// Returns whether the handle refers to a live, retained session.
    #[must_use]
    pub fn is_retained(&self, id: MacroId) -> bool {
        self.slot(id, None).is_ok_and(|i| self.retained[i])
    }

    /// Frees every frozen, unretained session begun after `mark`.
    ///
    /// Open sessions are left alone. Returns the number of sessions freed.
    pub fn release_scope(&mut self, mark: ScopeMark) -> usize {
        let mut released = 0;
        for idx in 0..self.len {
            let i = idx as usize;
            if self.alive[i] && self.frozen[i] && !self.retained[i] && self.born[i] >= mark.0 {
                self.free(idx);
                released += 1;
            }
        }
        released
    }

    /// Returns whether the handle refers to a live session.
    #[must_use]
    pub fn is_alive(&self, id: MacroId) -> bool {
        self.slot(id, None).is_ok()
    }

    /// Returns whether the handle refers to a live, frozen session.
    #[must_use]
    pub fn is_frozen(&self, id: MacroId) -> bool {
        self.slot(id, None).is_ok_and(|i| self.frozen[i])
    }

    /// Whether any session is open.
    #[inline]
    #[must_use]
    pub fn is_recording(&self) -> bool {
        !self.open.is_empty()
    }

    /// The session currently receiving appended ops.
    #[must_use]
    pub fn innermost(&self) -> Option<MacroId> {
        self.open.last().map(|&idx| self.id_at(idx))
    }

    /// Number of open sessions.
    #[inline]
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    /// Number of live sessions, open or frozen.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.alive.iter().filter(|&&a| a).count()
    }

    /// Number of slots ever allocated, live or free.
    #[inline]
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.len as usize
    }

    /// Handles of every live session, in slot order.
    pub fn sessions(&self) -> impl Iterator<Item = MacroId> + '_ {
        (0..self.len)
            .filter(|&idx| self.alive[idx as usize])
            .map(|idx| self.id_at(idx))
    }

    /// The ops recorded so far in a live session, open or frozen.
    pub fn session_ops(&self, id: MacroId) -> Result<&[Op], Error> {
        let i = self.slot(id, None)?;
        Ok(&self.ops[i])
    }

    /// The ops of a frozen macro.
    pub fn macro_ops(&self, m: Macro) -> Result<&[Op], Error> {
        self.resolve(m.0, None)
    }

    // -- Recording conveniences --

    /// Appends [`Op::PushState`].
    pub fn push_state(&mut self) -> Result<(), Error> {
        self.append(Op::PushState)
    }

    /// Appends [`Op::PopState`].
    pub fn pop_state(&mut self) -> Result<(), Error> {
        self.append(Op::PopState)
    }

    /// Appends a translation.
    pub fn offset(&mut self, v: impl Into<Vec2>) -> Result<(), Error> {
        self.append(Op::Transform(Affine::translate(v)))
    }

    /// Appends an affine transform.
    pub fn transform(&mut self, m: Affine) -> Result<(), Error> {
        self.append(Op::Transform(m))
    }

    /// Appends a clip.
    pub fn clip(&mut self, shape: impl Into<ClipShape>) -> Result<(), Error> {
        self.append(Op::Clip(shape.into()))
    }

    /// Sets the paint source.
    pub fn set_source(&mut self, source: impl Into<PaintSource>) -> Result<(), Error> {
        self.append(Op::SetPaintSource(source.into()))
    }

    /// Sets a solid paint color.
    pub fn set_color(&mut self, color: Rgba8) -> Result<(), Error> {
        self.set_source(color)
    }

    /// Sets a linear gradient paint source.
    pub fn set_linear_gradient(&mut self, gradient: LinearGradient) -> Result<(), Error> {
        self.set_source(gradient)
    }

    /// Appends [`Op::Commit`].
    pub fn paint(&mut self) -> Result<(), Error> {
        self.append(Op::Commit)
    }

    /// Fills the current clip with `color`.
    ///
    /// The paint source stays `color` afterwards.
    pub fn fill(&mut self, color: Rgba8) -> Result<(), Error> {
        self.set_color(color)?;
        self.paint()
    }

    /// Fills `shape` with `color` without changing the ambient clip.
    pub fn fill_shape(&mut self, shape: impl Into<ClipShape>, color: Rgba8) -> Result<(), Error> {
        self.push_state()?;
        self.clip(shape)?;
        self.fill(color)?;
        self.pop_state()
    }

    /// Appends a call to another session.
    pub fn invoke(&mut self, target: impl Into<MacroId>) -> Result<(), Error> {
        self.append(Op::MacroRef(target.into()))
    }

    /// Queues another session for after all immediate ops.
    pub fn defer(&mut self, target: impl Into<MacroId>) -> Result<(), Error> {
        self.append(Op::Defer(target.into()))
    }

    /// Runs `f` between a push and its matching pop.
    pub fn save<R>(&mut self, f: impl FnOnce(&mut Self) -> Result<R, Error>) -> Result<R, Error> {
        self.push_state()?;
        let out = f(self)?;
        self.pop_state()?;
        Ok(out)
    }

    /// Records `f` into a new nested session and freezes it.
    ///
    /// On error the session, and anything `f` left open inside it, is
    /// discarded.
    pub fn record(&mut self, f: impl FnOnce(&mut Self) -> Result<(), Error>) -> Result<Macro, Error> {
        let id = self.begin();
        match f(self).and_then(|()| self.freeze(id)) {
            Ok(m) => Ok(m),
            Err(e) => {
                self.discard(id)?;
                Err(e)
            }
        }
    }

    // -- Internal helpers --

    /// Validates a handle and returns its slot.
    pub(crate) fn slot(&self, id: MacroId, at: Option<OpSite>) -> Result<usize, Error> {
        let i = id.idx as usize;
        if id.idx < self.len && self.alive[i] && self.generation[i] == id.generation {
            Ok(i)
        } else {
            Err(Error::UnknownMacro { id, at })
        }
    }

    /// Returns the ops of a frozen session.
    pub(crate) fn resolve(&self, id: MacroId, at: Option<OpSite>) -> Result<&[Op], Error> {
        let i = self.slot(id, at)?;
        if !self.frozen[i] {
            return Err(Error::MacroNotFinalized { id, at });
        }
        Ok(&self.ops[i])
    }

    fn id_at(&self, idx: u32) -> MacroId {
        MacroId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    fn free(&mut self, idx: u32) {
        let i = idx as usize;
        self.ops[i].clear();
        self.frozen[i] = false;
        self.depth[i] = 0;
        self.alive[i] = false;
        self.retained[i] = false;
        // Bump generation so old handles immediately fail validation.
        self.generation[i] = self.generation[i].wrapping_add(1);
        self.free_list.push(idx);
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::*;

    const RED: Rgba8 = Rgba8 {
        r: 255,
        g: 0,
        b: 0,
        a: 255,
    };

    #[test]
    fn begin_append_freeze() {
        let mut ops = Ops::new();
        let id = ops.begin();
        ops.paint().unwrap();
        ops.paint().unwrap();
        let m = ops.freeze(id).unwrap();
        assert_eq!(m.id(), id);
        assert!(ops.is_frozen(id));
        assert!(!ops.is_recording());
        assert_eq!(ops.macro_ops(m).unwrap(), &[Op::Commit, Op::Commit]);
    }

    #[test]
    fn append_without_session_fails() {
        let mut ops = Ops::new();
        assert_eq!(ops.paint(), Err(Error::NoActiveRecording));
    }

    #[test]
    fn nested_session_captures_appends() {
        let mut ops = Ops::new();
        let outer = ops.begin();
        ops.push_state().unwrap();
        let inner = ops.begin();
        assert_eq!(ops.innermost(), Some(inner));
        ops.fill(RED).unwrap();
        let m = ops.freeze(inner).unwrap();
        ops.invoke(m).unwrap();
        ops.pop_state().unwrap();
        let outer = ops.freeze(outer).unwrap();

        assert_eq!(ops.macro_ops(m).unwrap().len(), 2);
        assert_eq!(
            ops.macro_ops(outer).unwrap(),
            &[Op::PushState, Op::MacroRef(inner), Op::PopState]
        );
    }

    #[test]
    fn freezing_twice_is_not_finalized() {
        let mut ops = Ops::new();
        let id = ops.begin();
        ops.freeze(id).unwrap();
        assert_eq!(
            ops.freeze(id),
            Err(Error::MacroNotFinalized { id, at: None })
        );
    }

    #[test]
    fn freezing_outer_before_inner_fails() {
        let mut ops = Ops::new();
        let outer = ops.begin();
        let inner = ops.begin();
        assert_eq!(
            ops.freeze(outer),
            Err(Error::RecordingOrder {
                id: outer,
                innermost: inner
            })
        );
        // Both sessions are still open and usable.
        ops.freeze(inner).unwrap();
        ops.freeze(outer).unwrap();
    }

    #[test]
    fn pop_without_push_fails_at_append() {
        let mut ops = Ops::new();
        let id = ops.begin();
        ops.paint().unwrap();
        assert_eq!(
            ops.pop_state(),
            Err(Error::StateImbalance {
                session: id,
                op_index: 1,
                kind: ImbalanceKind::PopWithoutPush,
            })
        );
        // The rejected op was not recorded.
        assert_eq!(ops.session_ops(id).unwrap(), &[Op::Commit]);
    }

    #[test]
    fn balance_is_per_session() {
        let mut ops = Ops::new();
        let _outer = ops.begin();
        ops.push_state().unwrap();
        let inner = ops.begin();
        // The outer push does not license a pop in the inner session.
        assert!(matches!(
            ops.pop_state(),
            Err(Error::StateImbalance { session, .. }) if session == inner
        ));
    }

    #[test]
    fn unpopped_push_fails_at_freeze() {
        let mut ops = Ops::new();
        let id = ops.begin();
        ops.push_state().unwrap();
        ops.push_state().unwrap();
        ops.pop_state().unwrap();
        assert_eq!(
            ops.freeze(id),
            Err(Error::StateImbalance {
                session: id,
                op_index: 3,
                kind: ImbalanceKind::UnpoppedAtFreeze { open: 1 },
            })
        );
    }

    #[test]
    fn release_invalidates_handle() {
        let mut ops = Ops::new();
        let id = ops.begin();
        let m = ops.freeze(id).unwrap();
        ops.release(m).unwrap();
        assert!(!ops.is_alive(id));
        assert_eq!(ops.macro_ops(m), Err(Error::UnknownMacro { id, at: None }));
        assert_eq!(ops.release(m), Err(Error::UnknownMacro { id, at: None }));
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut ops = Ops::new();
        let id1 = ops.begin();
        let m1 = ops.freeze(id1).unwrap();
        ops.release(m1).unwrap();
        let id2 = ops.begin();
        // id2 reuses the same slot but has a different generation.
        assert!(!ops.is_alive(id1));
        assert!(ops.is_alive(id2));
        assert_eq!(id1.idx, id2.idx);
        assert_ne!(id1.generation, id2.generation);
        assert!(ops.session_ops(id2).unwrap().is_empty());
    }

    #[test]
    fn discard_closes_nested_open_sessions() {
        let mut ops = Ops::new();
        let root = ops.begin();
        let kept = ops.record(|ops| ops.paint()).unwrap();
        let left_open = ops.begin();
        ops.discard(root).unwrap();
        assert!(!ops.is_recording());
        assert!(!ops.is_alive(root));
        assert!(!ops.is_alive(left_open));
        // Macros frozen inside the discarded session survive.
        assert!(ops.is_frozen(kept.id()));
        assert_eq!(ops.live_count(), 1);
        assert_eq!(ops.sessions().collect::<Vec<_>>(), [kept.id()]);
    }

    #[test]
    fn record_discards_on_error() {
        let mut ops = Ops::new();
        let root = ops.begin();
        let err = ops.record(|ops| {
            ops.push_state()?;
            ops.paint()
        });
        assert!(matches!(err, Err(Error::StateImbalance { .. })));
        assert_eq!(ops.innermost(), Some(root));
        assert_eq!(ops.live_count(), 1);
    }

    #[test]
    fn fill_shape_expands_to_scoped_paint() {
        let mut ops = Ops::new();
        let id = ops.begin();
        let r = Rect::new(0.0, 0.0, 128.0, 50.0);
        ops.fill_shape(r, RED).unwrap();
        assert_eq!(
            ops.session_ops(id).unwrap(),
            &[
                Op::PushState,
                Op::Clip(ClipShape::Rect(r)),
                Op::SetPaintSource(PaintSource::Solid(RED)),
                Op::Commit,
                Op::PopState,
            ]
        );
    }

    #[test]
    fn save_wraps_closure_in_push_pop() {
        let mut ops = Ops::new();
        let id = ops.begin();
        let n = ops
            .save(|ops| {
                ops.offset((0.0, 50.0))?;
                Ok(7)
            })
            .unwrap();
        assert_eq!(n, 7);
        let recorded = ops.session_ops(id).unwrap();
        assert_eq!(recorded.first(), Some(&Op::PushState));
        assert_eq!(recorded.last(), Some(&Op::PopState));
        assert!(ops.freeze(id).is_ok());
    }

    #[test]
    fn release_scope_frees_sessions_begun_after_the_mark() {
        let mut ops = Ops::new();
        let before = ops.record(|ops| ops.paint()).unwrap();
        let mark = ops.scope_mark();
        let root = ops.begin();
        let local = ops.record(|ops| ops.paint()).unwrap();
        let kept = ops.record(|ops| ops.paint()).unwrap();
        ops.retain(kept).unwrap();
        let root = ops.freeze(root).unwrap();

        assert_eq!(ops.release_scope(mark), 2);
        assert!(!ops.is_alive(root.id()));
        assert!(!ops.is_alive(local.id()));
        assert!(ops.is_frozen(kept.id()));
        assert!(ops.is_retained(kept.id()));
        assert!(ops.is_frozen(before.id()));
    }

    #[test]
    fn release_scope_leaves_open_sessions() {
        let mut ops = Ops::new();
        let mark = ops.scope_mark();
        let open = ops.begin();
        let inner = ops.record(|ops| ops.paint()).unwrap();
        assert_eq!(ops.release_scope(mark), 1);
        assert!(!ops.is_alive(inner.id()));
        assert_eq!(ops.innermost(), Some(open));
    }

    #[test]
    fn reused_slot_is_not_retained() {
        let mut ops = Ops::new();
        let m = ops.record(|ops| ops.paint()).unwrap();
        ops.retain(m).unwrap();
        ops.release(m).unwrap();
        let next = ops.record(|ops| ops.paint()).unwrap();
        assert_eq!(next.id().idx, m.id().idx);
        assert!(!ops.is_retained(next.id()));
        assert_eq!(ops.retain(m), Err(Error::UnknownMacro { id: m.id(), at: None }));
    }

    #[test]
    fn referencing_an_open_session_is_allowed_while_recording() {
        let mut ops = Ops::new();
        let outer = ops.begin();
        ops.invoke(outer).unwrap();
        assert_eq!(ops.session_ops(outer).unwrap(), &[Op::MacroRef(outer)]);
    }
}
