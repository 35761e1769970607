//! # Transport
//!
//! Fire-and-forget delivery of [`ViewerPacket`]s. The engine never waits
//! for an acknowledgement and never retries; a viewer that misses a packet
//! catches up on its next full render.

use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use tracing::{trace, warn};
use wraith_core::HostTypes;

use crate::packet::ViewerPacket;

/// Delivers packets to viewers.
///
/// Called with the tracker lock held: implementations must not call back
/// into the tracker.
pub trait FieldTransport<H: HostTypes>: Send + Sync {
    /// Hands `packet` off for delivery to every viewer in `viewers`.
    fn dispatch(&self, viewers: &[H::Viewer], packet: ViewerPacket<H>);
}

/// One dispatched packet and its audience.
#[derive(Clone, Debug)]
pub struct Delivery<H: HostTypes> {
    /// Recipients.
    pub viewers: Vec<H::Viewer>,
    /// Payload.
    pub packet: ViewerPacket<H>,
}

/// Transport counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransportStats {
    /// Deliveries queued.
    pub sent: u64,
    /// Deliveries dropped because the channel was full or closed.
    pub dropped: u64,
}

/// Transport backed by a bounded channel. The host drains the receiver on
/// its network thread.
pub struct ChannelTransport<H: HostTypes> {
    tx: Sender<Delivery<H>>,
    sent: AtomicU64,
    dropped: AtomicU64,
}

impl<H: HostTypes> ChannelTransport<H> {
    /// Creates a transport and the receiving end of its channel.
    #[must_use]
    pub fn new(capacity: usize) -> (Self, Receiver<Delivery<H>>) {
        let (tx, rx) = bounded(capacity);
        let transport = Self {
            tx,
            sent: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        };
        (transport, rx)
    }

    /// Counter snapshot.
    #[must_use]
    pub fn stats(&self) -> TransportStats {
        TransportStats {
            sent: self.sent.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

impl<H: HostTypes> FieldTransport<H> for ChannelTransport<H> {
    fn dispatch(&self, viewers: &[H::Viewer], packet: ViewerPacket<H>) {
        if viewers.is_empty() {
            return;
        }

        let entity_id = packet.entity_id();
        let kind = packet.name();
        let delivery = Delivery {
            viewers: viewers.to_vec(),
            packet,
        };

        match self.tx.try_send(delivery) {
            Ok(()) => {
                self.sent.fetch_add(1, Ordering::Relaxed);
                trace!(%entity_id, kind, viewers = viewers.len(), "Queued packet");
            }
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(%entity_id, kind, "Transport channel full, dropping packet");
            }
            Err(TrySendError::Disconnected(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(%entity_id, kind, "Transport receiver gone, dropping packet");
            }
        }
    }
}
