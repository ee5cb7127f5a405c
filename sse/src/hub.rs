use crate::subscriber::{Subscriber, SubscriberId};
use log::*;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Capacity of the hub's inbound broadcast queue. Broadcasts arriving while
/// the queue is full are dropped — producers must never stall behind the
/// coordinator.
pub const BROADCAST_QUEUE_CAPACITY: usize = 256;

enum Control {
    Register(Subscriber),
    Unregister(SubscriberId),
    Shutdown,
}

/// Cloneable handle to the broadcast hub.
///
/// All registry access is serialized through a single coordinator task; the
/// handle only enqueues commands. `register` and `unregister` always succeed
/// and never block (they ride an unbounded control channel, so they are safe
/// to call from synchronous code such as `Drop` impls). `broadcast` never
/// blocks either: it is best-effort and drops the message when the hub is
/// overloaded.
#[derive(Clone)]
pub struct Hub {
    control: mpsc::UnboundedSender<Control>,
    broadcasts: mpsc::Sender<String>,
}

impl Hub {
    /// Starts the coordinator task and returns a handle to it.
    pub fn spawn() -> Self {
        let (control, control_rx) = mpsc::unbounded_channel();
        let (broadcasts, broadcast_rx) = mpsc::channel(BROADCAST_QUEUE_CAPACITY);

        tokio::spawn(run(control_rx, broadcast_rx));

        Self {
            control,
            broadcasts,
        }
    }

    /// Adds a subscriber to the registry, making it eligible for every
    /// subsequent broadcast. A duplicate id overwrites the existing entry,
    /// closing the evicted subscriber's queue.
    pub fn register(&self, subscriber: Subscriber) {
        let _ = self.control.send(Control::Register(subscriber));
    }

    /// Removes a subscriber from the registry and closes its queue so any
    /// blocked or future reader observes end-of-stream. A no-op when the id
    /// is absent, so double-unregistration is safe.
    pub fn unregister(&self, id: &SubscriberId) {
        let _ = self.control.send(Control::Unregister(id.clone()));
    }

    /// Enqueues a message for delivery to every currently-registered
    /// subscriber. Returns immediately regardless of subscriber count or
    /// state; when the inbound queue is full the message is silently dropped.
    pub fn broadcast(&self, message: impl Into<String>) {
        if self.broadcasts.try_send(message.into()).is_err() {
            debug!("Hub inbound queue full, dropping broadcast");
        }
    }

    /// Stops the coordinator. The registry is dropped with it, closing every
    /// subscriber queue.
    pub fn shutdown(&self) {
        let _ = self.control.send(Control::Shutdown);
    }
}

/// Coordinator loop: the registry's single logical owner. Commands are
/// processed to completion one at a time, so a fan-out pass never interleaves
/// with a registry mutation.
async fn run(
    mut control_rx: mpsc::UnboundedReceiver<Control>,
    mut broadcast_rx: mpsc::Receiver<String>,
) {
    let mut subscribers: HashMap<SubscriberId, mpsc::Sender<String>> = HashMap::new();

    loop {
        tokio::select! {
            command = control_rx.recv() => match command {
                Some(Control::Register(subscriber)) => {
                    debug!("Registering subscriber {}", subscriber.id());
                    subscribers.insert(subscriber.id, subscriber.queue);
                }
                Some(Control::Unregister(id)) => {
                    if subscribers.remove(&id).is_some() {
                        debug!("Unregistered subscriber {id}");
                    }
                }
                Some(Control::Shutdown) | None => break,
            },
            message = broadcast_rx.recv() => match message {
                Some(message) => fan_out(&subscribers, &message),
                // Every handle has been dropped; nothing left to deliver.
                None => break,
            },
        }
    }

    info!(
        "Hub coordinator stopped, closing {} subscriber queue(s)",
        subscribers.len()
    );
}

/// Non-blocking delivery to every subscriber. A full queue drops the message
/// for that subscriber only; a closed queue belongs to a stream that is
/// already gone, with its unregister command still in flight.
fn fan_out(subscribers: &HashMap<SubscriberId, mpsc::Sender<String>>, message: &str) {
    for (id, queue) in subscribers {
        match queue.try_send(message.to_owned()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                debug!("Subscriber {id} queue full, dropping message");
            }
            Err(TrySendError::Closed(_)) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscriber::SUBSCRIBER_QUEUE_CAPACITY;
    use tokio::time::{sleep, timeout, Duration};

    // Gives the coordinator time to drain its command queues, mirroring the
    // registration/broadcast ordering a real caller sees.
    async fn settle() {
        sleep(Duration::from_millis(20)).await;
    }

    async fn recv(rx: &mut mpsc::Receiver<String>) -> Option<String> {
        timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("timed out waiting for a broadcast")
    }

    #[tokio::test]
    async fn broadcast_reaches_every_registered_subscriber_in_order() {
        let hub = Hub::spawn();
        let (client1, mut rx1) = Subscriber::new("client1");
        let (client2, mut rx2) = Subscriber::new("client2");

        hub.register(client1);
        hub.register(client2);
        settle().await;

        hub.broadcast("test message");
        hub.broadcast("second message");

        for rx in [&mut rx1, &mut rx2] {
            assert_eq!(recv(rx).await.as_deref(), Some("test message"));
            assert_eq!(recv(rx).await.as_deref(), Some("second message"));
        }
    }

    #[tokio::test]
    async fn unregistered_subscriber_receives_nothing_further() {
        let hub = Hub::spawn();
        let (client1, mut rx1) = Subscriber::new("client1");
        let client1_id = client1.id().clone();
        let (client2, mut rx2) = Subscriber::new("client2");

        hub.register(client1);
        hub.register(client2);
        settle().await;

        hub.broadcast("test message");
        assert_eq!(recv(&mut rx1).await.as_deref(), Some("test message"));
        assert_eq!(recv(&mut rx2).await.as_deref(), Some("test message"));

        hub.unregister(&client1_id);
        settle().await;

        hub.broadcast("second message");
        assert_eq!(recv(&mut rx2).await.as_deref(), Some("second message"));
        // client1's queue is closed with nothing pending.
        assert_eq!(recv(&mut rx1).await, None);
    }

    #[tokio::test]
    async fn double_unregister_is_idempotent() {
        let hub = Hub::spawn();
        let (client, _rx) = Subscriber::new("client");
        let id = client.id().clone();

        hub.register(client);
        settle().await;

        hub.unregister(&id);
        hub.unregister(&id);
        settle().await;

        // The hub still works after the redundant unregister.
        let (survivor, mut survivor_rx) = Subscriber::new("survivor");
        hub.register(survivor);
        settle().await;
        hub.broadcast("still alive");

        assert_eq!(recv(&mut survivor_rx).await.as_deref(), Some("still alive"));
    }

    #[tokio::test]
    async fn full_queue_drops_only_for_that_subscriber() {
        let hub = Hub::spawn();
        let (slow, mut slow_rx) = Subscriber::new("slow");
        let (fast, mut fast_rx) = Subscriber::new("fast");

        hub.register(slow);
        hub.register(fast);
        settle().await;

        // Fill both queues to the brim.
        for n in 0..SUBSCRIBER_QUEUE_CAPACITY {
            hub.broadcast(format!("msg-{n}"));
        }
        settle().await;

        // The fast consumer drains; the slow one leaves its queue full.
        for n in 0..SUBSCRIBER_QUEUE_CAPACITY {
            assert_eq!(recv(&mut fast_rx).await, Some(format!("msg-{n}")));
        }

        hub.broadcast("overflow");
        settle().await;

        // Delivered to the subscriber with room, dropped for the full one.
        assert_eq!(recv(&mut fast_rx).await.as_deref(), Some("overflow"));
        for n in 0..SUBSCRIBER_QUEUE_CAPACITY {
            assert_eq!(recv(&mut slow_rx).await, Some(format!("msg-{n}")));
        }
        assert!(slow_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn broadcast_with_no_subscribers_is_a_no_op() {
        let hub = Hub::spawn();

        hub.broadcast("into the void");
        settle().await;

        // A later subscriber only sees messages broadcast after registration.
        let (late, mut late_rx) = Subscriber::new("late");
        hub.register(late);
        settle().await;
        hub.broadcast("fresh message");

        assert_eq!(recv(&mut late_rx).await.as_deref(), Some("fresh message"));
        assert!(late_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn shutdown_closes_every_subscriber_queue() {
        let hub = Hub::spawn();
        let (client1, mut rx1) = Subscriber::new("client1");
        let (client2, mut rx2) = Subscriber::new("client2");

        hub.register(client1);
        hub.register(client2);
        settle().await;

        hub.shutdown();

        assert_eq!(recv(&mut rx1).await, None);
        assert_eq!(recv(&mut rx2).await, None);
    }
}
