use std::sync::Arc;

use tokio::sync::broadcast;

use pagepilot_core_types::PilotError;

/// Trait implemented by payload types that can be carried on the bus.
pub trait Event: Clone + Send + Sync + std::fmt::Debug + 'static {}

impl<T> Event for T where T: Clone + Send + Sync + std::fmt::Debug + 'static {}

/// Publish/subscribe seam between the synchronous DOM and async waiters.
///
/// Publication is synchronous because DOM event dispatch happens inside
/// ordinary method calls; only the receiving side suspends.
pub trait EventBus<E>: Send + Sync
where
    E: Event,
{
    fn publish(&self, event: E) -> Result<(), PilotError>;
    fn subscribe(&self) -> broadcast::Receiver<E>;
}

/// Simple in-memory bus suitable for a single page lifetime.
pub struct InMemoryBus<E>
where
    E: Event,
{
    sender: broadcast::Sender<E>,
}

impl<E> InMemoryBus<E>
where
    E: Event,
{
    pub fn new(capacity: usize) -> Arc<Self> {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Arc::new(Self { sender })
    }

    /// Number of live subscribers; used by the document to skip dispatch
    /// bookkeeping when nobody is listening.
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<E> EventBus<E> for InMemoryBus<E>
where
    E: Event,
{
    fn publish(&self, event: E) -> Result<(), PilotError> {
        // A send error only means there are no subscribers right now; the
        // DOM keeps firing events regardless, so this is not a failure.
        if self.sender.receiver_count() == 0 {
            return Ok(());
        }
        self.sender
            .send(event)
            .map(|_| ())
            .map_err(|err| PilotError::new(err.to_string()))
    }

    fn subscribe(&self) -> broadcast::Receiver<E> {
        self.sender.subscribe()
    }
}
