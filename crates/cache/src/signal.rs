//! Single-slot wake-up channel from the cache refresher to the monitor.
//!
//! Backed by a bounded `mpsc` channel of capacity one. A send never blocks:
//! if a wake-up is already waiting, the new one is folded into it. The
//! monitor therefore runs at most one extra pass however many refreshes
//! completed while it was busy.

use tokio::sync::mpsc;

/// Outcome of [`RefreshSignal::notify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalDelivery {
    /// The slot was free; the listener will wake.
    Queued,
    /// A wake-up was already pending and absorbs this one.
    Coalesced,
    /// The listener is gone.
    Closed,
}

/// Create a connected signal / listener pair.
pub fn refresh_signal() -> (RefreshSignal, RefreshListener) {
    let (tx, rx) = mpsc::channel(1);
    (RefreshSignal { tx }, RefreshListener { rx })
}

/// Sending half, held by the refresher.
#[derive(Debug, Clone)]
pub struct RefreshSignal {
    tx: mpsc::Sender<()>,
}

impl RefreshSignal {
    /// Announce that fresh data is available.
    pub fn notify(&self) -> SignalDelivery {
        match self.tx.try_send(()) {
            Ok(()) => SignalDelivery::Queued,
            Err(mpsc::error::TrySendError::Full(())) => {
                tracing::debug!("Refresh signal already pending, coalescing");
                SignalDelivery::Coalesced
            }
            Err(mpsc::error::TrySendError::Closed(())) => {
                tracing::debug!("Refresh signal has no listener");
                SignalDelivery::Closed
            }
        }
    }
}

/// Receiving half, held by the monitor.
#[derive(Debug)]
pub struct RefreshListener {
    rx: mpsc::Receiver<()>,
}

impl RefreshListener {
    /// Wait for the next wake-up. Returns `false` once every
    /// [`RefreshSignal`] has been dropped and nothing is pending.
    pub async fn wait(&mut self) -> bool {
        self.rx.recv().await.is_some()
    }

    /// Consume a pending wake-up without waiting.
    pub fn try_take(&mut self) -> bool {
        self.rx.try_recv().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rapid_notifications_coalesce_into_one() {
        let (signal, mut listener) = refresh_signal();

        assert_eq!(signal.notify(), SignalDelivery::Queued);
        assert_eq!(signal.notify(), SignalDelivery::Coalesced);
        assert_eq!(signal.notify(), SignalDelivery::Coalesced);

        assert!(listener.wait().await);
        assert!(!listener.try_take(), "only one wake-up should be pending");
    }

    #[tokio::test]
    async fn signal_after_consumption_queues_again() {
        let (signal, mut listener) = refresh_signal();

        signal.notify();
        assert!(listener.wait().await);
        assert_eq!(signal.notify(), SignalDelivery::Queued);
        assert!(listener.try_take());
    }

    #[tokio::test]
    async fn pending_signal_survives_sender_drop() {
        let (signal, mut listener) = refresh_signal();
        signal.notify();
        drop(signal);

        assert!(listener.wait().await);
        assert!(!listener.wait().await);
    }

    #[test]
    fn notify_without_listener_reports_closed() {
        let (signal, listener) = refresh_signal();
        drop(listener);
        assert_eq!(signal.notify(), SignalDelivery::Closed);
    }
}
