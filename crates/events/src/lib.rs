//! Threshold alerting.
//!
//! - [`Notifier`]: outbound alert channel; Pushbullet, SMTP email or log.
//! - [`NotifierConfig`]: picks the channel from the environment.
//! - [`MonitorService`]: evaluates every pending threshold after each cache
//!   refresh and notifies subscribers whose limit was exceeded.

pub mod config;
pub mod delivery;
pub mod monitor;

pub use config::{build_notifier, NotifierConfig, NotifierConfigError};
pub use delivery::email::{EmailConfig, EmailNotifier};
pub use delivery::log::LogNotifier;
pub use delivery::pushbullet::PushbulletNotifier;
pub use delivery::{Notifier, NotifyError};
pub use monitor::{MonitorService, PassReport};
