//! Broadcast queue used to fan notifications out to UI subscribers.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::{Result, RuleflowError};

/// Broadcast queue for one-to-many message distribution.
///
/// Every subscriber receives every message sent after it subscribed.
/// Backed by tokio's broadcast channel.
#[derive(Clone)]
pub struct BroadcastQueue<T> {
    sender: Arc<broadcast::Sender<T>>,
}

impl<T: Clone> BroadcastQueue<T> {
    /// create a new broadcast queue
    pub fn new(cap: usize) -> Arc<Self> {
        let (tx, _) = broadcast::channel(cap);

        Arc::new(Self {
            sender: Arc::new(tx),
        })
    }

    /// send a message to the queue, fails when nobody is subscribed
    pub fn send(
        &self,
        msg: T,
    ) -> Result<()> {
        self.sender.send(msg).map_err(|e| RuleflowError::Queue(e.to_string()))?;
        Ok(())
    }

    /// subscribe to the queue
    pub fn subscribe(&self) -> broadcast::Receiver<T> {
        self.sender.subscribe()
    }

    /// number of live subscribers
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_without_subscribers_fails() {
        let queue = BroadcastQueue::<u32>::new(4);
        assert!(matches!(queue.send(1), Err(RuleflowError::Queue(_))));
    }

    #[test]
    fn test_every_subscriber_receives() {
        let queue = BroadcastQueue::<u32>::new(4);
        let mut a = queue.subscribe();
        let mut b = queue.subscribe();
        assert_eq!(queue.receiver_count(), 2);

        queue.send(7).unwrap();
        assert_eq!(a.try_recv().unwrap(), 7);
        assert_eq!(b.try_recv().unwrap(), 7);
    }
}
