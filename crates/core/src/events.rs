//! Event System
//!
//! Pub/sub event bus used to report build progress and verbose tool
//! output to whoever is listening (CLI printer, tests).

use std::path::PathBuf;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::RwLock;
use tracing::debug;

/// Events emitted during a build or clean invocation
#[derive(Debug, Clone)]
pub enum Event {
    /// Build started for the given variant
    BuildStarted { variant: String },
    /// A line of output from the external build tool
    ToolOutput { line: String },
    /// Build completed
    BuildCompleted {
        success: bool,
        artifact: Option<PathBuf>,
    },
    /// Clean completed
    CleanCompleted,
    /// Generated file written or removed
    FileGenerated(PathBuf),
    /// Log message
    Log { level: LogLevel, message: String },
}

/// Log levels for log events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Verbose,
    Info,
    Warn,
    Error,
}

/// Subscriber handle for receiving events
#[derive(Clone)]
pub struct EventSubscription {
    receiver: Receiver<Event>,
}

impl EventSubscription {
    /// Receive the next event (blocking)
    pub fn recv(&self) -> Result<Event, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking)
    pub fn try_recv(&self) -> Result<Event, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Get an iterator over events
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.receiver.iter()
    }
}

/// Event bus for publish/subscribe pattern
pub struct EventBus {
    subscribers: RwLock<Vec<Sender<Event>>>,
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> EventSubscription {
        let (sender, receiver) = unbounded();
        self.subscribers.write().push(sender);
        EventSubscription { receiver }
    }

    /// Emit an event to all subscribers
    pub fn emit(&self, event: Event) -> usize {
        let subscribers = self.subscribers.read();
        let mut delivered = 0;

        for sender in subscribers.iter() {
            if sender.send(event.clone()).is_ok() {
                delivered += 1;
            }
        }

        debug!("Event {:?} delivered to {} subscribers", event, delivered);
        delivered
    }

    /// Emit a verbose log message
    pub fn verbose(&self, message: impl Into<String>) {
        self.emit(Event::Log {
            level: LogLevel::Verbose,
            message: message.into(),
        });
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
