//! Periodic device presence broadcasts.
//!
//! Each attached listener gets its own broadcast loop: an immediate
//! device list on attach, then a fresh one every poll interval. A
//! listener that reports itself closed is deregistered; nobody else's
//! updates are affected.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use crate::adb::DeviceBridge;
use crate::devices::DeviceRegistry;
use protocol::PresenceUpdate;

/// Default delay between device list broadcasts.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Returned by a listener that will accept no further updates.
#[derive(Debug, Error)]
#[error("listener closed")]
pub struct ListenerClosed;

/// Sink for device presence updates.
#[async_trait]
pub trait PresenceListener: Send + Sync + 'static {
    /// Deliver one update. Returning `Err` deregisters the listener.
    async fn send(&self, update: PresenceUpdate) -> Result<(), ListenerClosed>;
}

/// Polls the device table and fans updates out to attached listeners.
pub struct PresenceBroadcaster<B: DeviceBridge> {
    registry: Arc<DeviceRegistry<B>>,
    interval: Duration,
    listeners: Arc<DashMap<Uuid, CancellationToken>>,
}

impl<B: DeviceBridge> PresenceBroadcaster<B> {
    /// Create a broadcaster polling through the given registry.
    pub fn new(registry: Arc<DeviceRegistry<B>>, interval: Duration) -> Self {
        Self {
            registry,
            interval,
            listeners: Arc::new(DashMap::new()),
        }
    }

    /// Attach a listener.
    ///
    /// The listener receives a device list right away and another one per
    /// interval until the returned subscription is dropped or the listener
    /// reports itself closed.
    pub fn attach<L: PresenceListener>(&self, listener: L) -> PresenceSubscription {
        let id = Uuid::new_v4();
        let token = CancellationToken::new();
        self.listeners.insert(id, token.clone());

        let registry = Arc::clone(&self.registry);
        let listeners = Arc::clone(&self.listeners);
        let interval = self.interval;
        let loop_token = token.clone();
        let handle = tokio::spawn(async move {
            run_listener(registry, listeners, interval, id, listener, loop_token).await;
        });
        debug!(listener_id = %id, "Presence listener attached");

        PresenceSubscription {
            id,
            token,
            handle: Some(handle),
        }
    }

    /// Number of currently attached listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

async fn run_listener<B: DeviceBridge, L: PresenceListener>(
    registry: Arc<DeviceRegistry<B>>,
    listeners: Arc<DashMap<Uuid, CancellationToken>>,
    interval: Duration,
    id: Uuid,
    listener: L,
    token: CancellationToken,
) {
    // First tick completes immediately, so attach implies one update.
    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                let devices = registry.enumerate().await;
                if listener.send(PresenceUpdate::device_list(devices)).await.is_err() {
                    debug!(listener_id = %id, "Presence listener closed");
                    break;
                }
            }
        }
    }
    listeners.remove(&id);
    debug!(listener_id = %id, "Presence listener deregistered");
}

/// Handle for an attached listener. Dropping it stops the broadcast loop.
pub struct PresenceSubscription {
    id: Uuid,
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl PresenceSubscription {
    /// Identifier assigned to the listener.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Detach the listener and wait for its broadcast loop to finish.
    pub async fn disconnect(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }

    /// Wait for the broadcast loop to exit on its own, which happens once
    /// the listener reports itself closed.
    pub async fn closed(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for PresenceSubscription {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adb::fake::{FakeBridge, FakeDevice};
    use tokio::sync::mpsc;

    struct ChannelListener {
        tx: mpsc::UnboundedSender<PresenceUpdate>,
    }

    #[async_trait]
    impl PresenceListener for ChannelListener {
        async fn send(&self, update: PresenceUpdate) -> Result<(), ListenerClosed> {
            self.tx.send(update).map_err(|_| ListenerClosed)
        }
    }

    fn broadcaster_for(bridge: FakeBridge) -> Arc<PresenceBroadcaster<FakeBridge>> {
        let registry = Arc::new(DeviceRegistry::new(Arc::new(bridge)));
        Arc::new(PresenceBroadcaster::new(registry, DEFAULT_POLL_INTERVAL))
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_update_arrives_on_attach() {
        let broadcaster = broadcaster_for(FakeBridge::new().with_device(FakeDevice::new("abc123")));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _subscription = broadcaster.attach(ChannelListener { tx });

        let PresenceUpdate::DeviceList { devices } = rx.recv().await.unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].serial, "abc123");
    }

    #[tokio::test(start_paused = true)]
    async fn test_updates_repeat_on_the_interval() {
        let broadcaster = broadcaster_for(FakeBridge::new().with_device(FakeDevice::new("abc123")));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _subscription = broadcaster.attach(ChannelListener { tx });

        let PresenceUpdate::DeviceList { devices } = rx.recv().await.unwrap();
        assert_eq!(devices.len(), 1);

        tokio::time::advance(DEFAULT_POLL_INTERVAL).await;
        let PresenceUpdate::DeviceList { devices } = rx.recv().await.unwrap();
        assert_eq!(devices.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enumeration_failure_broadcasts_empty_list() {
        let broadcaster = broadcaster_for(FakeBridge::failing());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _subscription = broadcaster.attach(ChannelListener { tx });

        let PresenceUpdate::DeviceList { devices } = rx.recv().await.unwrap();
        assert!(devices.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_listener_gets_its_own_updates() {
        let broadcaster = broadcaster_for(FakeBridge::new().with_device(FakeDevice::new("abc123")));
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        let _sub_a = broadcaster.attach(ChannelListener { tx: tx_a });
        let _sub_b = broadcaster.attach(ChannelListener { tx: tx_b });

        assert!(rx_a.recv().await.is_some());
        assert!(rx_b.recv().await.is_some());
        assert_eq!(broadcaster.listener_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_listener_is_deregistered() {
        let broadcaster = broadcaster_for(FakeBridge::new().with_device(FakeDevice::new("abc123")));
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        let mut subscription = broadcaster.attach(ChannelListener { tx });
        subscription.closed().await;
        assert_eq!(broadcaster.listener_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_deregisters() {
        let broadcaster = broadcaster_for(FakeBridge::new().with_device(FakeDevice::new("abc123")));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let subscription = broadcaster.attach(ChannelListener { tx });

        assert!(rx.recv().await.is_some());
        assert_eq!(broadcaster.listener_count(), 1);

        subscription.disconnect().await;
        assert_eq!(broadcaster.listener_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_the_subscription_cancels_its_loop() {
        let broadcaster = broadcaster_for(FakeBridge::new().with_device(FakeDevice::new("abc123")));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let subscription = broadcaster.attach(ChannelListener { tx });

        assert!(rx.recv().await.is_some());
        let token = subscription.token.clone();
        drop(subscription);
        assert!(token.is_cancelled());
    }
}
