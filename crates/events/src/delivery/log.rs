//! Development channel: alerts only go to the log.

use async_trait::async_trait;

use super::{Notifier, NotifyError};

#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send(&self, subscriber: &str, title: &str, body: &str) -> Result<(), NotifyError> {
        tracing::info!(subscriber, title, body, "Alert");
        Ok(())
    }
}
