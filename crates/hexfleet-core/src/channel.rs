//! Named publish/subscribe channels.
//!
//! A channel is created with a fixed set of event names. Listeners are
//! kept per name in registration order and receive the event together
//! with a mutable context `C`. When the channel lives inside `C` (a part
//! inside its vessel), take a [`Listeners`] snapshot first and dispatch
//! it against the context: the snapshot holds no borrow of the channel,
//! so listeners may freely mutate the owner and trigger further events.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::error::EventError;
use crate::event::{Event, Flow};

/// A subscribed callback.
pub type Listener<T, C, E> = Rc<dyn Fn(&mut Event<T>, &mut C) -> Result<Flow, E>>;

/// An ordered snapshot of the listeners registered for one event name.
pub struct Listeners<T, C, E>(SmallVec<[Listener<T, C, E>; 4]>);

impl<T, C, E> Listeners<T, C, E> {
    /// Number of listeners in the snapshot.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Deliver `event` to each listener in order.
    ///
    /// Every delivery counts one hop on the event. Delivery ends early
    /// once the event is stopped immediately. The first listener error
    /// aborts the dispatch and is returned.
    pub fn dispatch(&self, event: &mut Event<T>, ctx: &mut C) -> Result<(), E> {
        for listener in &self.0 {
            event.propagate();
            let flow = listener(event, ctx)?;
            event.apply(flow);
            if event.is_stopped_immediate() {
                break;
            }
        }
        Ok(())
    }
}

/// A set of named events with per-name listener lists.
pub struct EventChannel<T, C, E> {
    listeners: IndexMap<&'static str, Vec<Listener<T, C, E>>>,
}

impl<T, C, E> EventChannel<T, C, E> {
    /// Create a channel accepting exactly `names`.
    pub fn new(names: &[&'static str]) -> Self {
        let listeners = names.iter().map(|&n| (n, Vec::new())).collect();
        Self { listeners }
    }

    /// The event names this channel accepts, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.listeners.keys().copied()
    }

    fn slot(&self, name: &str) -> Result<usize, EventError> {
        self.listeners
            .get_index_of(name)
            .ok_or_else(|| EventError::UnknownEvent {
                name: name.to_string(),
                expected: self.names().collect(),
            })
    }

    /// Subscribe `listener` to `name`.
    pub fn on<F>(&mut self, name: &str, listener: F) -> Result<(), EventError>
    where
        F: Fn(&mut Event<T>, &mut C) -> Result<Flow, E> + 'static,
    {
        self.on_shared(name, Rc::new(listener))
    }

    /// Subscribe an already shared listener to `name`.
    pub fn on_shared(&mut self, name: &str, listener: Listener<T, C, E>) -> Result<(), EventError> {
        let idx = self.slot(name)?;
        if let Some((_, list)) = self.listeners.get_index_mut(idx) {
            list.push(listener);
        }
        Ok(())
    }

    /// Number of listeners subscribed to `name` (0 for unknown names).
    pub fn listener_count(&self, name: &str) -> usize {
        self.listeners.get(name).map_or(0, Vec::len)
    }

    /// Build a root event for `name`.
    pub fn event(&self, name: &str, data: T) -> Result<Event<T>, EventError> {
        let idx = self.slot(name)?;
        let key = self.key(idx);
        Ok(Event::new(key, data))
    }

    /// Fork a child of `parent` as event `name`.
    ///
    /// Fails if `parent` was stopped: a vetoed action has no follow-up.
    pub fn fork<U>(
        &self,
        parent: &mut Event<U>,
        name: &str,
        data: T,
        detached: bool,
    ) -> Result<Event<T>, EventError> {
        let idx = self.slot(name)?;
        if parent.is_stopped() {
            return Err(EventError::ForwardStopped {
                name: parent.name(),
            });
        }
        Ok(parent.fork(self.key(idx), data, detached))
    }

    fn key(&self, idx: usize) -> &'static str {
        self.listeners
            .get_index(idx)
            .map_or("", |(k, _)| *k)
    }

    /// Snapshot the listeners of `name`.
    pub fn listeners(&self, name: &str) -> Result<Listeners<T, C, E>, EventError> {
        let idx = self.slot(name)?;
        let list = self
            .listeners
            .get_index(idx)
            .map(|(_, l)| l.iter().cloned().collect())
            .unwrap_or_default();
        Ok(Listeners(list))
    }

    /// Build and deliver a root event for `name`.
    ///
    /// Use this when the channel is not owned by `ctx`.
    pub fn trigger(&self, name: &str, data: T, ctx: &mut C) -> Result<Event<T>, E>
    where
        E: From<EventError>,
    {
        let mut event = self.event(name, data)?;
        self.listeners(name)?.dispatch(&mut event, ctx)?;
        Ok(event)
    }

    /// Fork `parent` as event `name` and deliver it.
    pub fn forward<U>(
        &self,
        parent: &mut Event<U>,
        name: &str,
        data: T,
        detached: bool,
        ctx: &mut C,
    ) -> Result<Event<T>, E>
    where
        E: From<EventError>,
    {
        let mut event = self.fork(parent, name, data, detached)?;
        self.listeners(name)?.dispatch(&mut event, ctx)?;
        Ok(event)
    }
}

impl<T, C, E> fmt::Debug for EventChannel<T, C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, list) in &self.listeners {
            map.entry(name, &list.len());
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Log = Vec<&'static str>;
    type Chan = EventChannel<i32, Log, EventError>;

    fn chan() -> Chan {
        EventChannel::new(&["ping", "pong"])
    }

    #[test]
    fn unknown_names_are_rejected() {
        let mut c = chan();
        let err = c.on("nope", |_, _| Ok(Flow::Continue)).unwrap_err();
        assert_eq!(
            err,
            EventError::UnknownEvent {
                name: "nope".into(),
                expected: vec!["ping", "pong"],
            }
        );
        let mut log = Log::new();
        assert!(c.trigger("nope", 0, &mut log).is_err());
        assert!(c.listeners("nope").is_err());
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let mut c = chan();
        c.on("ping", |_, log: &mut Log| {
            log.push("a");
            Ok(Flow::Continue)
        })
        .unwrap();
        c.on("ping", |_, log: &mut Log| {
            log.push("b");
            Ok(Flow::Continue)
        })
        .unwrap();
        let mut log = Log::new();
        let evt = c.trigger("ping", 1, &mut log).unwrap();
        assert_eq!(log, vec!["a", "b"]);
        assert_eq!(evt.ttl(), 2);
        assert_eq!(c.listener_count("ping"), 2);
        assert_eq!(c.listener_count("pong"), 0);
    }

    #[test]
    fn stop_skips_remaining_and_marks_veto() {
        let mut c = chan();
        c.on("ping", |e, _| {
            e.data = 42;
            Ok(Flow::Stop)
        })
        .unwrap();
        c.on("ping", |_, log: &mut Log| {
            log.push("late");
            Ok(Flow::Continue)
        })
        .unwrap();
        let mut log = Log::new();
        let evt = c.trigger("ping", 1, &mut log).unwrap();
        assert!(log.is_empty());
        assert!(evt.is_stopped());
        assert_eq!(evt.data, 42);
    }

    #[test]
    fn stop_immediate_keeps_default_action() {
        let mut c = chan();
        c.on("ping", |e, _| {
            e.stop_immediate();
            Ok(Flow::Continue)
        })
        .unwrap();
        c.on("ping", |_, log: &mut Log| {
            log.push("late");
            Ok(Flow::Continue)
        })
        .unwrap();
        let mut log = Log::new();
        let evt = c.trigger("ping", 1, &mut log).unwrap();
        assert!(log.is_empty());
        assert!(evt.is_stopped_immediate());
        assert!(!evt.is_stopped());
    }

    #[test]
    fn forward_refuses_stopped_parent() {
        let c = chan();
        let mut parent = Event::new("ping", 0);
        parent.stop();
        let mut log = Log::new();
        let err = c.forward(&mut parent, "pong", 1, false, &mut log).unwrap_err();
        assert_eq!(err, EventError::ForwardStopped { name: "ping" });
    }

    #[test]
    fn forward_credits_parent() {
        let mut c = chan();
        c.on("pong", |_, _| Ok(Flow::Continue)).unwrap();
        let mut parent = c.event("ping", 0).unwrap();
        let mut log = Log::new();
        let child = c.forward(&mut parent, "pong", 5, false, &mut log).unwrap();
        assert_eq!(child.ttl(), 1);
        assert_eq!(parent.ttl(), 2);
        assert_eq!(child.name(), "pong");
    }

    #[test]
    fn listener_errors_abort_dispatch() {
        let mut c = chan();
        c.on("ping", |_, _| {
            Err(EventError::ForwardStopped { name: "ping" })
        })
        .unwrap();
        c.on("ping", |_, log: &mut Log| {
            log.push("never");
            Ok(Flow::Continue)
        })
        .unwrap();
        let mut log = Log::new();
        assert!(c.trigger("ping", 0, &mut log).is_err());
        assert!(log.is_empty());
    }

    #[test]
    fn snapshot_survives_context_mutation() {
        struct Owner {
            chan: EventChannel<u8, Owner, EventError>,
            hits: u8,
        }
        let mut owner = Owner {
            chan: EventChannel::new(&["tick"]),
            hits: 0,
        };
        owner
            .chan
            .on("tick", |_, o: &mut Owner| {
                o.hits += 1;
                o.chan.on("tick", |_, _| Ok(Flow::Continue))?;
                Ok(Flow::Continue)
            })
            .unwrap();
        let snapshot = owner.chan.listeners("tick").unwrap();
        let mut evt = owner.chan.event("tick", 0).unwrap();
        snapshot.dispatch(&mut evt, &mut owner).unwrap();
        assert_eq!(owner.hits, 1);
        assert_eq!(owner.chan.listener_count("tick"), 2);
    }
}
