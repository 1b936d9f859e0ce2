//! Hook configuration entities.
//!
//! A [`Hook`] is an operator-configured rule mapping an event type and store
//! scope to an outbound HTTP call definition. Hooks are persisted outside the
//! engine and are read-only here.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use uuid::Uuid;

use hookwire_core::{Error, Result};

/// Reserved store-scope marker matching every store.
pub const ALL_STORES: &str = "0";

/// The event family a hook subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HookType {
    /// Order placed / order status changed.
    Order,
    /// Invoice created.
    Invoice,
    /// Shipment dispatched.
    Shipment,
    /// Cart (quote) updated.
    Quote,
    /// Customer action taken.
    Customer,
}

/// Authentication scheme for the outbound request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AuthScheme {
    /// No `Authorization` header is emitted.
    #[default]
    None,
    /// HTTP Basic authentication.
    Basic,
    /// HTTP Digest authentication with statically configured challenge
    /// parameters (see [`DigestParams`]).
    Digest,
}

/// Statically configured Digest challenge parameters.
///
/// These are operator-configured values, not values obtained from a live
/// server challenge; the nonce in particular is not server-issued per
/// request. Preserved as configured data for endpoints that accept it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestParams {
    /// Protection realm.
    pub realm: String,
    /// Server nonce.
    pub nonce: String,
    /// Digest algorithm label (emitted verbatim, MD5 is always used).
    pub algorithm: String,
    /// Quality of protection.
    pub qop: String,
    /// Nonce count, emitted unquoted.
    pub nonce_count: String,
    /// Client nonce.
    pub client_nonce: String,
    /// Opaque server value.
    pub opaque: String,
}

/// A single custom request header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookHeader {
    /// Header name.
    pub name: String,
    /// Header value.
    pub value: String,
}

impl HookHeader {
    /// Creates a new header pair.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Custom headers, either structured or as a JSON-encoded pair list.
///
/// Hook storage backends differ on whether headers arrive as structured rows
/// or as one JSON column; both shapes normalize to the same header lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderSpec {
    /// An ordered list of name/value pairs.
    Pairs(Vec<HookHeader>),
    /// A JSON-encoded equivalent of the pair list.
    Encoded(String),
}

impl Default for HeaderSpec {
    fn default() -> Self {
        Self::Pairs(Vec::new())
    }
}

impl HeaderSpec {
    /// Normalizes the headers into trimmed `"name: value"` lines.
    pub fn normalize(&self) -> Result<Vec<String>> {
        let pairs = match self {
            Self::Pairs(pairs) => pairs.clone(),
            Self::Encoded(raw) => serde_json::from_str::<Vec<HookHeader>>(raw).map_err(|e| {
                Error::serialization()
                    .with_message("invalid JSON-encoded header list")
                    .with_source(e)
            })?,
        };

        Ok(pairs
            .iter()
            .map(|h| format!("{}: {}", h.name.trim(), h.value.trim()))
            .collect())
    }
}

/// A configured webhook rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hook {
    /// Unique identifier.
    pub id: Uuid,
    /// Display name, used in history records and failure alerts.
    pub name: String,
    /// Event family this hook subscribes to.
    pub hook_type: HookType,
    /// Disabled hooks are never selected.
    pub enabled: bool,
    /// Store identifiers this hook applies to; [`ALL_STORES`] matches any.
    pub store_scope: Vec<String>,
    /// Ascending processing order (lower runs earlier). Tie order among
    /// equal priorities is not part of the contract.
    pub priority: i32,
    /// Template for the payload URL.
    pub payload_url: String,
    /// Template for the request body.
    pub body: String,
    /// HTTP verb; `GET` when unset or empty.
    #[serde(default)]
    pub method: Option<String>,
    /// Authentication scheme.
    #[serde(default)]
    pub auth: AuthScheme,
    /// Credential username, required when `auth` is not `None`.
    #[serde(default)]
    pub username: Option<String>,
    /// Credential password, required when `auth` is not `None`.
    #[serde(default)]
    pub password: Option<String>,
    /// Digest-only static challenge parameters.
    #[serde(default)]
    pub digest: Option<DigestParams>,
    /// Custom request headers.
    #[serde(default)]
    pub headers: HeaderSpec,
    /// Optional `Content-Type` for the request.
    #[serde(default)]
    pub content_type: Option<String>,
    /// Comma-separated order status codes; meaningful only for
    /// [`HookType::Order`] hooks.
    #[serde(default)]
    pub order_status_filter: Option<String>,
}

impl Hook {
    /// Creates an enabled hook with defaults: all stores, priority 0, GET,
    /// no authentication, empty body.
    pub fn new(name: impl Into<String>, hook_type: HookType, payload_url: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            hook_type,
            enabled: true,
            store_scope: vec![ALL_STORES.to_string()],
            priority: 0,
            payload_url: payload_url.into(),
            body: String::new(),
            method: None,
            auth: AuthScheme::None,
            username: None,
            password: None,
            digest: None,
            headers: HeaderSpec::default(),
            content_type: None,
            order_status_filter: None,
        }
    }

    /// Sets the processing priority.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Restricts the hook to the given store identifiers.
    #[must_use]
    pub fn with_store_scope<I, S>(mut self, stores: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.store_scope = stores.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the body template.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the HTTP verb.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Enables Basic authentication.
    #[must_use]
    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = AuthScheme::Basic;
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Enables Digest authentication with static challenge parameters.
    #[must_use]
    pub fn with_digest_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
        params: DigestParams,
    ) -> Self {
        self.auth = AuthScheme::Digest;
        self.username = Some(username.into());
        self.password = Some(password.into());
        self.digest = Some(params);
        self
    }

    /// Sets the custom request headers.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderSpec) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the request `Content-Type`.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Sets the order-status filter from a comma-separated code set.
    #[must_use]
    pub fn with_order_statuses(mut self, statuses: impl Into<String>) -> Self {
        self.order_status_filter = Some(statuses.into());
        self
    }

    /// Marks the hook as disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Returns the HTTP verb, defaulting to `GET` when unset or empty.
    pub fn effective_method(&self) -> &str {
        match self.method.as_deref() {
            Some(m) if !m.is_empty() => m,
            _ => "GET",
        }
    }

    /// Whether this hook applies to the given store.
    pub fn matches_store(&self, store_id: &str) -> bool {
        self.store_scope
            .iter()
            .any(|s| s == ALL_STORES || s == store_id)
    }

    /// Whether this hook applies to an order in the given status.
    ///
    /// Order hooks with no configured filter match no status; the filter is
    /// an exact string match against the comma-split code set, with no
    /// whitespace normalization.
    pub fn matches_order_status(&self, status: &str) -> bool {
        self.order_status_filter
            .as_deref()
            .map(|f| f.split(',').any(|s| s == status))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_method_defaults_to_get() {
        let hook = Hook::new("h", HookType::Order, "https://example.com");
        assert_eq!(hook.effective_method(), "GET");

        let hook = hook.with_method("");
        assert_eq!(hook.effective_method(), "GET");

        let hook = hook.with_method("POST");
        assert_eq!(hook.effective_method(), "POST");
    }

    #[test]
    fn test_matches_store() {
        let any = Hook::new("any", HookType::Order, "https://example.com");
        assert!(any.matches_store("5"));
        assert!(any.matches_store("7"));

        let scoped = any.clone().with_store_scope(["5"]);
        assert!(scoped.matches_store("5"));
        assert!(!scoped.matches_store("7"));
    }

    #[test]
    fn test_matches_order_status() {
        let hook = Hook::new("h", HookType::Order, "https://example.com")
            .with_order_statuses("processing,complete");

        assert!(hook.matches_order_status("processing"));
        assert!(hook.matches_order_status("complete"));
        assert!(!hook.matches_order_status("pending"));

        let unfiltered = Hook::new("h", HookType::Order, "https://example.com");
        assert!(!unfiltered.matches_order_status("processing"));
    }

    #[test]
    fn test_matches_order_status_is_exact() {
        // Tokens are compared verbatim; a padded entry only matches its
        // padded form.
        let hook = Hook::new("h", HookType::Order, "https://example.com")
            .with_order_statuses("processing, complete");

        assert!(hook.matches_order_status("processing"));
        assert!(!hook.matches_order_status("complete"));
        assert!(hook.matches_order_status(" complete"));
    }

    #[test]
    fn test_header_spec_normalize_pairs() {
        let spec = HeaderSpec::Pairs(vec![
            HookHeader::new(" X-Token ", " abc "),
            HookHeader::new("Accept", "application/json"),
        ]);

        let lines = spec.normalize().unwrap();
        assert_eq!(lines, vec!["X-Token: abc", "Accept: application/json"]);
    }

    #[test]
    fn test_header_spec_normalize_encoded() {
        let spec = HeaderSpec::Encoded(r#"[{"name":"X-Token","value":"abc"}]"#.to_string());
        assert_eq!(spec.normalize().unwrap(), vec!["X-Token: abc"]);

        let bad = HeaderSpec::Encoded("not json".to_string());
        assert!(bad.normalize().is_err());
    }
}
