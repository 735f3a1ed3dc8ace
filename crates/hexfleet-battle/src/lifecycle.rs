//! Lifecycle events and their acknowledgment.
//!
//! The loop broadcasts `turn`, `attack` and `end` through a
//! [`LifecycleChannel`] and then waits until one listener calls
//! [`Acknowledger::consume`]. Listeners may keep a clone of the
//! acknowledger and consume it later, which is how a presentation layer
//! paces the battle. Events nobody listens to are acknowledged at once.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use futures::channel::oneshot;

use hexfleet_core::EventChannel;

use crate::attack::Damage;
use crate::error::BattleError;
use crate::manager::BattleSummary;

/// Emitted before each turn.
pub const TURN: &str = "turn";
/// Emitted for each resolved attack.
pub const ATTACK: &str = "attack";
/// Emitted once the battle is over.
pub const END: &str = "end";

/// Every lifecycle event name.
pub const LIFECYCLE_EVENTS: [&str; 3] = [TURN, ATTACK, END];

/// Channel of lifecycle events. Listeners get the event's acknowledger.
pub type LifecycleChannel = EventChannel<LifecycleEvent, Acknowledger, BattleError>;

/// Lifecycle payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Turn `turn` is about to start.
    Turn {
        /// Zero-based turn number.
        turn: u32,
    },
    /// An attack was resolved.
    Attack {
        /// Turn of the attack.
        turn: u32,
        /// The resolution.
        damage: Damage,
    },
    /// The battle ended.
    End(BattleSummary),
}

/// Handle that releases the suspended battle loop.
///
/// Clones share one slot: the first `consume` wins.
#[derive(Clone)]
pub struct Acknowledger {
    slot: Rc<Cell<Option<oneshot::Sender<()>>>>,
}

impl Acknowledger {
    pub(crate) fn pair() -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        let ack = Self {
            slot: Rc::new(Cell::new(Some(tx))),
        };
        (ack, rx)
    }

    /// Release the loop. Returns `false` if it was already released.
    pub fn consume(&self) -> bool {
        match self.slot.take() {
            Some(tx) => tx.send(()).is_ok(),
            None => false,
        }
    }

    /// Whether some clone already consumed this acknowledgment.
    pub fn is_consumed(&self) -> bool {
        let tx = self.slot.take();
        let consumed = tx.is_none();
        self.slot.set(tx);
        consumed
    }
}

impl fmt::Debug for Acknowledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Acknowledger")
            .field("consumed", &self.is_consumed())
            .finish()
    }
}
