use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

/// Messages a subscriber may have pending before further broadcasts are
/// dropped for it.
pub const SUBSCRIBER_QUEUE_CAPACITY: usize = 16;

// Process-wide suffix source. A plain counter (rather than a timestamp) means
// two simultaneous connections sharing a token can never collide.
static NEXT_SUFFIX: AtomicU64 = AtomicU64::new(0);

/// Unique identifier for a subscriber: the caller's opaque token plus a
/// counter suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriberId(String);

impl SubscriberId {
    fn next(token: &str) -> Self {
        let suffix = NEXT_SUFFIX.fetch_add(1, Ordering::Relaxed);
        Self(format!("{token}-{suffix}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered handle representing one live streaming connection.
///
/// The queue sender is owned by the Hub once registered; the matching
/// receiver stays with the stream endpoint, which is the queue's only reader.
#[derive(Debug)]
pub struct Subscriber {
    pub(crate) id: SubscriberId,
    pub(crate) queue: mpsc::Sender<String>,
}

impl Subscriber {
    /// Builds a subscriber with a fresh bounded outbound queue, returning the
    /// receiving half for the connection's relay loop.
    pub fn new(token: &str) -> (Self, mpsc::Receiver<String>) {
        let (queue, rx) = mpsc::channel(SUBSCRIBER_QUEUE_CAPACITY);
        (
            Self {
                id: SubscriberId::next(token),
                queue,
            },
            rx,
        )
    }

    pub fn id(&self) -> &SubscriberId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_for_the_same_token_never_collide() {
        let (first, _rx1) = Subscriber::new("alice");
        let (second, _rx2) = Subscriber::new("alice");

        assert_ne!(first.id(), second.id());
        assert!(first.id().as_str().starts_with("alice-"));
    }
}
