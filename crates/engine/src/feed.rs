//! Change notifications for committed mutations.
//!
//! The feed replaces push-based live queries: every committed write
//! publishes the topics it touched, and a subscriber re-runs its query on
//! notification. Subscribers that fall behind observe a `Lagged` error from
//! the broadcast receiver and should simply re-query.

use tokio::sync::broadcast;

/// A collection whose contents changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topic {
    Workers,
    Buyers,
    Crops,
    Tasks,
    Payments,
    Sales,
    Collections,
    Expenses,
    Supervisors,
}

#[derive(Debug)]
pub struct ChangeFeed {
    sender: broadcast::Sender<Topic>,
}

impl ChangeFeed {
    pub(crate) fn new() -> Self {
        let (sender, _) = broadcast::channel(256);
        Self { sender }
    }

    /// Subscribe to change notifications. Only events published after the
    /// call are received.
    pub fn subscribe(&self) -> broadcast::Receiver<Topic> {
        self.sender.subscribe()
    }

    /// Publish after commit, never from inside a transaction body: a
    /// notification must imply the change is durable.
    pub(crate) fn publish(&self, topics: &[Topic]) {
        for topic in topics {
            // send only fails when there are no subscribers, which is fine.
            let _ = self.sender.send(*topic);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_topics_to_subscribers() {
        let feed = ChangeFeed::new();
        let mut rx = feed.subscribe();
        feed.publish(&[Topic::Tasks, Topic::Workers]);
        assert_eq!(rx.recv().await.unwrap(), Topic::Tasks);
        assert_eq!(rx.recv().await.unwrap(), Topic::Workers);
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        let feed = ChangeFeed::new();
        feed.publish(&[Topic::Expenses]);
    }
}
