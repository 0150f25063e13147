//! Outbound alert channels.
//!
//! A [`Notifier`] makes exactly one delivery attempt per call. Retrying is
//! left to the monitor, which keeps an undelivered threshold pending and
//! evaluates it again on the next refresh.

use async_trait::async_trait;

pub mod email;
pub mod log;
pub mod pushbullet;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for alert delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The notification service answered with a non-2xx status code.
    #[error("Notification service returned HTTP {0}")]
    HttpStatus(u16),

    /// SMTP delivery failed.
    #[error(transparent)]
    Email(#[from] email::EmailError),
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short channel name used in logs.
    fn name(&self) -> &'static str;

    /// Deliver one alert to `subscriber`.
    async fn send(&self, subscriber: &str, title: &str, body: &str) -> Result<(), NotifyError>;
}
