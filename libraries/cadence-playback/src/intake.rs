//! Event intake
//!
//! Single serialized path from the engine's callback thread into the
//! synchronizer. The engine side holds a cloneable [`EventSink`]; the
//! synchronizer owns the [`EventIntake`] and drains it in the application
//! context, so engine callbacks never touch playback state.

use crate::engine::{EngineEvent, EngineEventKind};
use crate::types::SessionId;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

/// Create a connected sink/intake pair
pub fn channel() -> (EventSink, EventIntake) {
    let (tx, rx) = unbounded();
    (EventSink { tx }, EventIntake { rx })
}

/// Sending half, handed to the engine
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: Sender<EngineEvent>,
}

impl EventSink {
    /// Queue an event; returns `false` once the synchronizer is gone
    pub fn send(&self, event: EngineEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// Shorthand for `send(EngineEvent::new(session, kind))`
    pub fn emit(&self, session: SessionId, kind: EngineEventKind) -> bool {
        self.send(EngineEvent::new(session, kind))
    }
}

/// Receiving half, owned by the synchronizer
#[derive(Debug)]
pub struct EventIntake {
    rx: Receiver<EngineEvent>,
}

impl EventIntake {
    /// Next queued event without blocking
    pub fn try_next(&self) -> Option<EngineEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Wait at most `timeout` for the next event
    pub fn next_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Number of events waiting
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}
