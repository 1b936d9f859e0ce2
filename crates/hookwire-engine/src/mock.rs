//! In-memory collaborator implementations for tests and local development.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use hookwire_core::{Error, Result, ServiceHealth};

use crate::history::HistoryRecord;
use crate::hook::{Hook, HookType};
use crate::repository::{
    CustomerInfo, CustomerLookup, HistoryStore, HookRepository, Notifier, ProductInfo,
    ProductLookup,
};
use crate::transport::{HttpRequest, Transport};

/// Hook repository backed by a fixed in-memory list.
#[derive(Debug, Default)]
pub struct MemoryHookRepository {
    hooks: Vec<Hook>,
}

impl MemoryHookRepository {
    /// Creates a repository serving the given hooks.
    pub fn new(hooks: Vec<Hook>) -> Self {
        Self { hooks }
    }
}

#[async_trait]
impl HookRepository for MemoryHookRepository {
    async fn find_by_type(&self, hook_type: HookType) -> Result<Vec<Hook>> {
        Ok(self
            .hooks
            .iter()
            .filter(|hook| hook.hook_type == hook_type)
            .cloned()
            .collect())
    }
}

/// Hook repository whose reads always fail, for storage-error paths.
#[derive(Debug, Default)]
pub struct FailingHookRepository;

#[async_trait]
impl HookRepository for FailingHookRepository {
    async fn find_by_type(&self, _hook_type: HookType) -> Result<Vec<Hook>> {
        Err(Error::storage().with_message("hook storage unavailable"))
    }
}

/// History store collecting appended records in memory.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    records: Mutex<Vec<HistoryRecord>>,
    fail_appends: bool,
}

impl MemoryHistoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose appends always fail.
    pub fn failing() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail_appends: true,
        }
    }

    /// Snapshot of everything appended so far.
    pub fn records(&self) -> Vec<HistoryRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn append(&self, record: HistoryRecord) -> Result<()> {
        if self.fail_appends {
            return Err(Error::storage().with_message("history storage unavailable"));
        }
        self.records.lock().unwrap().push(record);
        Ok(())
    }
}

/// Product lookup backed by a map.
#[derive(Debug, Default)]
pub struct MapProductLookup {
    products: HashMap<String, ProductInfo>,
}

impl MapProductLookup {
    /// Creates a lookup serving the given products.
    pub fn new(products: HashMap<String, ProductInfo>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl ProductLookup for MapProductLookup {
    async fn find(&self, product_id: &str) -> Option<ProductInfo> {
        self.products.get(product_id).cloned()
    }
}

/// Customer lookup backed by a map.
#[derive(Debug, Default)]
pub struct MapCustomerLookup {
    customers: HashMap<String, CustomerInfo>,
}

impl MapCustomerLookup {
    /// Creates a lookup serving the given customers.
    pub fn new(customers: HashMap<String, CustomerInfo>) -> Self {
        Self { customers }
    }
}

#[async_trait]
impl CustomerLookup for MapCustomerLookup {
    async fn find(&self, customer_id: &str) -> Option<CustomerInfo> {
        self.customers.get(customer_id).cloned()
    }
}

/// One scripted transport reply.
#[derive(Debug, Clone)]
enum ScriptedReply {
    Raw(String),
    Error(String),
}

/// Transport replaying scripted raw responses and recording requests.
///
/// Replies are consumed in order; when the script runs out, the last reply
/// repeats.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<Vec<ScriptedReply>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    /// Creates a transport that always answers with the given status line.
    pub fn with_status(code: u16, reason: &str) -> Self {
        Self::default().then_status(code, reason)
    }

    /// Appends a raw response built from a status line and empty body.
    #[must_use]
    pub fn then_status(self, code: u16, reason: &str) -> Self {
        self.then_raw(format!("HTTP/1.1 {code} {reason}\r\n\r\n"))
    }

    /// Appends a verbatim raw response.
    #[must_use]
    pub fn then_raw(self, raw: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push(ScriptedReply::Raw(raw.into()));
        self
    }

    /// Appends a transport-level failure.
    #[must_use]
    pub fn then_error(self, message: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(ScriptedReply::Error(message.into()));
        self
    }

    /// Everything sent through this transport so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_reply(&self) -> ScriptedReply {
        let mut replies = self.replies.lock().unwrap();
        if replies.len() > 1 {
            replies.remove(0)
        } else {
            replies
                .first()
                .cloned()
                .unwrap_or_else(|| ScriptedReply::Error("no scripted reply".to_string()))
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &HttpRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        match self.next_reply() {
            ScriptedReply::Raw(raw) => Ok(raw),
            ScriptedReply::Error(message) => Err(Error::network_error().with_message(message)),
        }
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        Ok(ServiceHealth::healthy())
    }
}

/// One recorded alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedAlert {
    /// Recipients the alert was addressed to.
    pub recipients: Vec<String>,
    /// Alert message body.
    pub message: String,
    /// Notification template id.
    pub template_id: String,
    /// Store scope of the alert.
    pub store_id: String,
}

/// Notifier collecting alerts in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<RecordedAlert>>,
    fail_sends: bool,
}

impl RecordingNotifier {
    /// Creates a notifier that records every alert.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a notifier whose sends always fail.
    pub fn failing() -> Self {
        Self {
            alerts: Mutex::new(Vec::new()),
            fail_sends: true,
        }
    }

    /// Snapshot of every alert sent so far.
    pub fn alerts(&self) -> Vec<RecordedAlert> {
        self.alerts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn alert(
        &self,
        recipients: &[String],
        message: &str,
        template_id: &str,
        store_id: &str,
    ) -> Result<()> {
        if self.fail_sends {
            return Err(Error::notification().with_message("mail transport unavailable"));
        }
        self.alerts.lock().unwrap().push(RecordedAlert {
            recipients: recipients.to_vec(),
            message: message.to_string(),
            template_id: template_id.to_string(),
            store_id: store_id.to_string(),
        });
        Ok(())
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        Ok(ServiceHealth::healthy())
    }
}
