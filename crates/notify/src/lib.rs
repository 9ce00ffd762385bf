//! Notification sink for batch tool outcomes.
//!
//! Sends run summaries and failure reports to messaging platforms. Channels
//! are trait objects behind [`NotifyChannel`]; [`SlackChannel`] implements
//! Slack incoming-webhook delivery.
//!
//! # Usage
//!
//! ```no_run
//! use notify::{Notifier, NotifyEvent, Severity};
//!
//! # async fn example() {
//! let notifier = Notifier::from_env();
//!
//! notifier
//!     .notify_and_wait(NotifyEvent::RunReport {
//!         tool: "error-resetter".to_string(),
//!         message: "Performed reset of nodes".to_string(),
//!         severity: Severity::Info,
//!         timestamp: chrono::Utc::now(),
//!     })
//!     .await;
//! # }
//! ```
//!
//! Delivery is awaited rather than fire-and-forget: a short-lived batch
//! process would otherwise exit before the webhook request completes.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod channels;
pub mod error;
pub mod events;

pub use channels::slack::SlackChannel;
pub use channels::NotifyChannel;
pub use error::ChannelError;
pub use events::{NotifyEvent, Severity};

use std::sync::Arc;
use tracing::{debug, info, warn};

/// Environment variable to disable all notifications.
const ENV_NOTIFY_DISABLED: &str = "NOTIFY_DISABLED";

/// Central notification dispatcher.
pub struct Notifier {
    channels: Vec<Arc<dyn NotifyChannel>>,
    disabled: bool,
}

impl Notifier {
    /// Create a new notifier from environment variables.
    ///
    /// Auto-detects which channels are configured and enables them.
    #[must_use]
    pub fn from_env() -> Self {
        let disabled = std::env::var(ENV_NOTIFY_DISABLED)
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        if disabled {
            info!("Notifications disabled via NOTIFY_DISABLED");
            return Self {
                channels: vec![],
                disabled: true,
            };
        }

        let mut channels: Vec<Arc<dyn NotifyChannel>> = vec![];

        let slack = SlackChannel::from_env();
        if slack.enabled() {
            info!("Slack notifications enabled");
            channels.push(Arc::new(slack));
        }

        if channels.is_empty() {
            debug!("No notification channels configured");
        }

        Self {
            channels,
            disabled: false,
        }
    }

    /// Create a notifier with specific channels.
    #[must_use]
    pub fn with_channels(channels: Vec<Arc<dyn NotifyChannel>>) -> Self {
        Self {
            channels,
            disabled: false,
        }
    }

    /// Create a disabled notifier (for testing or when notifications are off).
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            channels: vec![],
            disabled: true,
        }
    }

    /// Check if any notification channels are enabled.
    #[must_use]
    pub fn has_channels(&self) -> bool {
        !self.disabled && !self.channels.is_empty()
    }

    /// Send a notification to all enabled channels and wait for delivery.
    ///
    /// Errors are logged per channel and returned alongside the channel name
    /// so callers can decide whether a delivery failure matters.
    pub async fn notify_and_wait(
        &self,
        event: NotifyEvent,
    ) -> Vec<(String, Result<(), ChannelError>)> {
        if self.disabled || self.channels.is_empty() {
            debug!("No channels configured, skipping event");
            return vec![];
        }

        let mut results = vec![];

        for channel in &self.channels {
            let channel_name = channel.name().to_string();

            if !channel.enabled() {
                debug!(channel = %channel_name, "Channel disabled, skipping");
                continue;
            }

            let result = channel.send(&event).await;
            if let Err(e) = &result {
                warn!(channel = %channel_name, error = %e, "Failed to send notification");
            }
            results.push((channel_name, result));
        }

        results
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_notifier() {
        let notifier = Notifier::disabled();
        assert!(!notifier.has_channels());
    }

    #[tokio::test]
    async fn test_disabled_notifier_sends_nothing() {
        let notifier = Notifier::disabled();
        let results = notifier
            .notify_and_wait(NotifyEvent::RunFailure {
                tool: "t".to_string(),
                error: "e".to_string(),
                timestamp: chrono::Utc::now(),
            })
            .await;
        assert!(results.is_empty());
    }
}
