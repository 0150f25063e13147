//! Notifier selection.
//!
//! The channel is chosen once at startup; the monitor only ever sees an
//! `Arc<dyn Notifier>`.

use std::sync::Arc;

use crate::delivery::email::{EmailConfig, EmailNotifier};
use crate::delivery::log::LogNotifier;
use crate::delivery::pushbullet::PushbulletNotifier;
use crate::delivery::{Notifier, NotifyError};

#[derive(Debug, thiserror::Error)]
pub enum NotifierConfigError {
    #[error("Unknown NOTIFIER '{0}', expected pushbullet, email or log")]
    UnknownChannel(String),

    #[error("{channel} notifier requires {variable}")]
    Missing {
        channel: &'static str,
        variable: &'static str,
    },
}

/// Which channel delivers alerts.
#[derive(Debug, Clone)]
pub enum NotifierConfig {
    Log,
    Pushbullet { token: String },
    Email(EmailConfig),
}

impl NotifierConfig {
    /// Load the notifier choice from the environment.
    ///
    /// | Variable           | Required             | Default |
    /// |--------------------|----------------------|---------|
    /// | `NOTIFIER`         | no                   | `log`   |
    /// | `PUSHBULLET_TOKEN` | if `pushbullet`      |         |
    ///
    /// The `email` channel reads its settings through [`EmailConfig::from_env`].
    pub fn from_env() -> Result<Self, NotifierConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, NotifierConfigError> {
        let channel = var("NOTIFIER").unwrap_or_else(|| "log".to_string());
        match channel.trim().to_ascii_lowercase().as_str() {
            "log" => Ok(Self::Log),
            "pushbullet" => var("PUSHBULLET_TOKEN")
                .filter(|t| !t.is_empty())
                .map(|token| Self::Pushbullet { token })
                .ok_or(NotifierConfigError::Missing {
                    channel: "pushbullet",
                    variable: "PUSHBULLET_TOKEN",
                }),
            "email" => EmailConfig::from_lookup(&var)
                .map(Self::Email)
                .ok_or(NotifierConfigError::Missing {
                    channel: "email",
                    variable: "SMTP_HOST",
                }),
            _ => Err(NotifierConfigError::UnknownChannel(channel)),
        }
    }
}

/// Construct the configured notifier.
pub fn build_notifier(config: NotifierConfig) -> Result<Arc<dyn Notifier>, NotifyError> {
    let notifier: Arc<dyn Notifier> = match config {
        NotifierConfig::Log => Arc::new(LogNotifier),
        NotifierConfig::Pushbullet { token } => Arc::new(PushbulletNotifier::new(token)?),
        NotifierConfig::Email(email) => Arc::new(EmailNotifier::new(email)),
    };
    tracing::info!(channel = notifier.name(), "Alert notifier configured");
    Ok(notifier)
}
