//! Event publishing/subscription abstraction (mechanics only).
//!
//! The bus distributes events that have already been committed; it is not a
//! store. Delivery is best-effort fan-out: each subscription receives a copy of
//! every message published after it subscribed, in publication order for a
//! single publisher.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvError, RecvTimeoutError, TryRecvError};
use std::time::Duration;

/// A subscription to a bus.
///
/// Intended for single-threaded consumption; hand messages to other threads
/// through your own channel if needed.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Collect every message that is already queued, without blocking.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Publish/subscribe abstraction.
///
/// `publish()` may fail (poisoned lock, broken transport). Callers that publish
/// after a durable write decide whether that failure matters; the write itself
/// is never undone because of it.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + core::fmt::Display + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
