//! Cancellable events with fork lineage.
//!
//! An [`Event`] is the mutable record handed to every listener of a
//! channel. Listeners may rewrite [`Event::data`] in place to redirect the
//! outcome, or stop the event to skip the remaining listeners and, for
//! [`Event::stop`], veto the default action of whoever triggered it.

use std::cell::Cell;
use std::rc::Rc;

/// Control value returned by a listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Flow {
    /// Keep delivering to the remaining listeners.
    #[default]
    Continue,
    /// Skip the remaining listeners. The default action still applies.
    StopImmediate,
    /// Skip the remaining listeners and veto the default action.
    Stop,
}

/// Hop counter shared between an event and the events forked from it.
#[derive(Debug, Default)]
struct Lineage {
    hops: Cell<u32>,
    parent: Option<Rc<Lineage>>,
}

impl Lineage {
    fn bump(&self) {
        self.hops.set(self.hops.get().saturating_add(1));
        if let Some(parent) = &self.parent {
            parent.bump();
        }
    }

    fn depth(&self) -> usize {
        self.parent.as_ref().map_or(0, |p| p.depth() + 1)
    }
}

/// A named event carrying a mutable payload.
#[derive(Debug)]
pub struct Event<T> {
    name: &'static str,
    /// The payload. Listeners may rewrite it to redirect the outcome.
    pub data: T,
    stopped: bool,
    stopped_immediate: bool,
    detached: bool,
    lineage: Rc<Lineage>,
}

impl<T> Event<T> {
    /// Create a root event.
    pub fn new(name: &'static str, data: T) -> Self {
        Self {
            name,
            data,
            stopped: false,
            stopped_immediate: false,
            detached: false,
            lineage: Rc::new(Lineage::default()),
        }
    }

    /// The event name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Veto the default action and skip the remaining listeners.
    pub fn stop(&mut self) {
        self.stop_immediate();
        self.stopped = true;
    }

    /// Skip the remaining listeners without vetoing the default action.
    pub fn stop_immediate(&mut self) {
        self.stopped_immediate = true;
    }

    /// Whether a listener vetoed the default action.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Whether delivery was cut short.
    pub fn is_stopped_immediate(&self) -> bool {
        self.stopped_immediate
    }

    /// Whether this event was forked without counting hops on its origin.
    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Number of deliveries of this event and of every attached fork.
    pub fn ttl(&self) -> u32 {
        self.lineage.hops.get()
    }

    /// Number of attached ancestors above this event.
    pub fn depth(&self) -> usize {
        self.lineage.depth()
    }

    /// Count one delivery. Attached ancestors are credited as well.
    pub fn propagate(&mut self) -> &mut Self {
        self.lineage.bump();
        self
    }

    /// Apply a listener's [`Flow`] to this event.
    pub fn apply(&mut self, flow: Flow) {
        match flow {
            Flow::Continue => {}
            Flow::StopImmediate => self.stop_immediate(),
            Flow::Stop => self.stop(),
        }
    }

    /// Create a child event.
    ///
    /// The fork counts as one delivery of `self`. Unless `detached`, every
    /// later delivery of the child is also credited to `self`.
    pub fn fork<U>(&mut self, name: &'static str, data: U, detached: bool) -> Event<U> {
        self.propagate();
        let parent = if detached {
            None
        } else {
            Some(Rc::clone(&self.lineage))
        };
        Event {
            name,
            data,
            stopped: false,
            stopped_immediate: false,
            detached,
            lineage: Rc::new(Lineage {
                hops: Cell::new(0),
                parent,
            }),
        }
    }
}
