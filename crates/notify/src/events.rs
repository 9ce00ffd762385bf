//! Notification event types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity levels for notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational - normal operations
    Info,
    /// Warning - something needs attention
    Warning,
    /// Critical - immediate action required
    Critical,
}

impl Severity {
    /// Get the attachment color for this severity.
    #[must_use]
    pub const fn color(&self) -> &'static str {
        match self {
            Self::Info => "#3498db",     // Blue
            Self::Warning => "#f39c12",  // Orange
            Self::Critical => "#e74c3c", // Red
        }
    }

    /// Get display name for this severity.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Critical => "Critical",
        }
    }
}

/// Events that can trigger notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotifyEvent {
    /// A tool run completed and has a summary to report.
    RunReport {
        /// Name of the tool reporting.
        tool: String,
        /// Pre-formatted summary text.
        message: String,
        /// Report severity.
        severity: Severity,
        #[serde(default = "Utc::now")]
        timestamp: DateTime<Utc>,
    },

    /// A tool run aborted with an unhandled failure.
    RunFailure {
        /// Name of the tool reporting.
        tool: String,
        /// Error description.
        error: String,
        #[serde(default = "Utc::now")]
        timestamp: DateTime<Utc>,
    },
}

impl NotifyEvent {
    /// Get a short title for this event.
    #[must_use]
    pub fn title(&self) -> String {
        match self {
            Self::RunReport { tool, .. } => format!("Run report: {tool}"),
            Self::RunFailure { tool, .. } => format!("Run failed: {tool}"),
        }
    }

    /// Get the severity of this event.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::RunReport { severity, .. } => *severity,
            Self::RunFailure { .. } => Severity::Critical,
        }
    }

    /// Get the timestamp of this event.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::RunReport { timestamp, .. } | Self::RunFailure { timestamp, .. } => *timestamp,
        }
    }

    /// Get the body text of this event.
    #[must_use]
    pub fn body(&self) -> &str {
        match self {
            Self::RunReport { message, .. } => message,
            Self::RunFailure { error, .. } => error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_titles() {
        let event = NotifyEvent::RunReport {
            tool: "error-resetter".to_string(),
            message: "Performed reset of nodes".to_string(),
            severity: Severity::Info,
            timestamp: Utc::now(),
        };
        assert_eq!(event.title(), "Run report: error-resetter");
        assert_eq!(event.severity(), Severity::Info);

        let event = NotifyEvent::RunFailure {
            tool: "error-resetter".to_string(),
            error: "API error: 500".to_string(),
            timestamp: Utc::now(),
        };
        assert_eq!(event.title(), "Run failed: error-resetter");
        assert_eq!(event.severity(), Severity::Critical);
    }
}
