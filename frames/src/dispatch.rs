//! Typed event-dispatch table for decoded stream frames.
//!
//! DESIGN
//! ======
//! Several features read the same project socket: the chat panel consumes
//! `chat_*` frames, the workspace consumes `skill_*` frames, and status views
//! watch `connection`. Each registers listeners keyed on [`FrameKind`] and
//! removes them by [`ListenerId`] on teardown, so no feature owns the
//! connection or displaces another feature's handling.
//!
//! Frames of a kind with no listener go to the fallback listeners registered
//! through [`Dispatcher::on_unhandled`].
//!
//! Dispatch snapshots the listener list first, which lets a listener register
//! or remove listeners while a frame is being delivered.

#[cfg(test)]
#[path = "dispatch_test.rs"]
mod dispatch_test;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::{Frame, FrameKind};

/// Callback invoked with each matching frame.
pub type Listener = Rc<dyn Fn(&Frame)>;

/// Handle returned on registration; pass it to [`Dispatcher::off`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Listener table keyed on frame kind.
#[derive(Default)]
pub struct Dispatcher {
    next_id: u64,
    routes: BTreeMap<FrameKind, Vec<(ListenerId, Listener)>>,
    fallback: Vec<(ListenerId, Listener)>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let routes: BTreeMap<_, _> = self.routes.iter().map(|(kind, list)| (kind, list.len())).collect();
        f.debug_struct("Dispatcher")
            .field("routes", &routes)
            .field("fallback", &self.fallback.len())
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> ListenerId {
        self.next_id += 1;
        ListenerId(self.next_id)
    }

    /// Register `listener` for one frame kind.
    pub fn on(&mut self, kind: FrameKind, listener: impl Fn(&Frame) + 'static) -> ListenerId {
        self.on_each(&[kind], listener)
    }

    /// Register one listener for several kinds under a single id.
    pub fn on_each(&mut self, kinds: &[FrameKind], listener: impl Fn(&Frame) + 'static) -> ListenerId {
        let id = self.allocate_id();
        let listener: Listener = Rc::new(listener);
        for kind in kinds {
            self.routes
                .entry(*kind)
                .or_default()
                .push((id, Rc::clone(&listener)));
        }
        id
    }

    /// Register a listener for frames no kind-specific listener handles.
    pub fn on_unhandled(&mut self, listener: impl Fn(&Frame) + 'static) -> ListenerId {
        let id = self.allocate_id();
        self.fallback.push((id, Rc::new(listener)));
        id
    }

    /// Remove every registration made under `id`. Returns `false` if nothing
    /// was registered under it.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let mut removed = false;
        for list in self.routes.values_mut() {
            let before = list.len();
            list.retain(|(entry, _)| *entry != id);
            removed |= list.len() != before;
        }
        self.routes.retain(|_, list| !list.is_empty());

        let before = self.fallback.len();
        self.fallback.retain(|(entry, _)| *entry != id);
        removed |= self.fallback.len() != before;
        removed
    }

    /// Listeners that would receive a frame of `kind`, in registration order.
    #[must_use]
    pub fn listeners_for(&self, kind: FrameKind) -> Vec<Listener> {
        match self.routes.get(&kind) {
            Some(list) if !list.is_empty() => list.iter().map(|(_, l)| Rc::clone(l)).collect(),
            _ => self.fallback.iter().map(|(_, l)| Rc::clone(l)).collect(),
        }
    }

    /// Whether any kind-specific listener is registered for `kind`.
    #[must_use]
    pub fn handles(&self, kind: FrameKind) -> bool {
        self.routes.get(&kind).is_some_and(|list| !list.is_empty())
    }

    /// Deliver `frame` to its listeners. Returns how many were invoked.
    pub fn dispatch(&self, frame: &Frame) -> usize {
        let listeners = self.listeners_for(frame.kind());
        for listener in &listeners {
            listener(frame);
        }
        listeners.len()
    }
}

/// Deliver `frame` through a shared dispatcher without holding the borrow
/// while listeners run.
pub fn dispatch_shared(dispatcher: &RefCell<Dispatcher>, frame: &Frame) -> usize {
    let listeners = dispatcher.borrow().listeners_for(frame.kind());
    for listener in &listeners {
        listener(frame);
    }
    listeners.len()
}
