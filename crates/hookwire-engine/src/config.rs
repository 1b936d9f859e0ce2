//! Dispatch configuration.

use serde::{Deserialize, Serialize};

#[cfg(feature = "config")]
use clap::Args;

/// Scope-level dispatch settings, passed explicitly to each dispatch call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct DispatchConfig {
    /// Master switch. When off, dispatch is a no-op.
    #[serde(default = "default_enabled")]
    #[cfg_attr(feature = "config", arg(long = "dispatch-enabled", env = "HOOKWIRE_ENABLED", default_value_t = true))]
    pub enabled: bool,

    /// Whether delivery failures raise an alert notification.
    #[serde(default)]
    #[cfg_attr(feature = "config", arg(long = "alert-enabled", env = "HOOKWIRE_ALERT_ENABLED", default_value_t = false))]
    pub alert_enabled: bool,

    /// Alert recipients.
    #[serde(default)]
    #[cfg_attr(feature = "config", arg(long = "alert-recipient", env = "HOOKWIRE_ALERT_RECIPIENTS", value_delimiter = ','))]
    pub recipients: Vec<String>,

    /// Notification template identifier used for alerts.
    #[serde(default)]
    #[cfg_attr(feature = "config", arg(long = "alert-template", env = "HOOKWIRE_ALERT_TEMPLATE"))]
    pub email_template: Option<String>,

    /// Store id assumed for items that carry none.
    #[serde(default = "default_store_id")]
    #[cfg_attr(feature = "config", arg(long = "default-store-id", env = "HOOKWIRE_DEFAULT_STORE_ID", default_value = "1"))]
    pub default_store_id: String,
}

fn default_enabled() -> bool {
    true
}

fn default_store_id() -> String {
    "1".to_string()
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            alert_enabled: false,
            recipients: Vec::new(),
            email_template: None,
            default_store_id: default_store_id(),
        }
    }
}

impl DispatchConfig {
    /// Enables failure alerting to the given recipients.
    #[must_use]
    pub fn with_alerts<I, S>(mut self, recipients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alert_enabled = true;
        self.recipients = recipients.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the notification template used for alerts.
    #[must_use]
    pub fn with_email_template(mut self, template: impl Into<String>) -> Self {
        self.email_template = Some(template.into());
        self
    }

    /// Sets the store id assumed for items without one.
    #[must_use]
    pub fn with_default_store_id(mut self, store_id: impl Into<String>) -> Self {
        self.default_store_id = store_id.into();
        self
    }

    /// Disables dispatch entirely.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DispatchConfig::default();
        assert!(config.enabled);
        assert!(!config.alert_enabled);
        assert!(config.recipients.is_empty());
        assert_eq!(config.default_store_id, "1");
    }

    #[test]
    fn test_deserialization_applies_defaults() {
        let config: DispatchConfig = serde_json::from_str("{}").unwrap();
        assert!(config.enabled);
        assert_eq!(config.default_store_id, "1");

        let config: DispatchConfig =
            serde_json::from_str(r#"{"enabled":false,"default_store_id":"7"}"#).unwrap();
        assert!(!config.enabled);
        assert_eq!(config.default_store_id, "7");
    }

    #[test]
    fn test_builders() {
        let config = DispatchConfig::default()
            .with_alerts(["ops@example.com"])
            .with_email_template("hook_failure")
            .with_default_store_id("3");

        assert!(config.alert_enabled);
        assert_eq!(config.recipients, ["ops@example.com"]);
        assert_eq!(config.email_template.as_deref(), Some("hook_failure"));
        assert_eq!(config.default_store_id, "3");
    }
}
