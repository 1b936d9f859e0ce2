//! Collaborator seams consumed by the dispatch engine.
//!
//! The engine owns no storage or mail transport; implementations of these
//! traits are supplied by the host application. In-memory implementations
//! for tests live in [`crate::mock`].

use std::sync::Arc;

use async_trait::async_trait;

use hookwire_core::{Result, ServiceHealth};

use crate::history::HistoryRecord;
use crate::hook::{Hook, HookType};

/// Read access to the persisted hook configuration.
#[async_trait]
pub trait HookRepository: Send + Sync {
    /// Returns all hooks of the given event family, ordered ascending by
    /// priority. Store scope and order-status refinement happen engine-side.
    ///
    /// A storage error here is fatal to the whole dispatch call.
    async fn find_by_type(&self, hook_type: HookType) -> Result<Vec<Hook>>;
}

#[async_trait]
impl<T: HookRepository + ?Sized> HookRepository for Arc<T> {
    async fn find_by_type(&self, hook_type: HookType) -> Result<Vec<Hook>> {
        self.as_ref().find_by_type(hook_type).await
    }
}

/// Append-only store for hook invocation history.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Appends one finished record. Records are never updated.
    async fn append(&self, record: HistoryRecord) -> Result<()>;
}

#[async_trait]
impl<T: HistoryStore + ?Sized> HistoryStore for Arc<T> {
    async fn append(&self, record: HistoryRecord) -> Result<()> {
        self.as_ref().append(record).await
    }
}

/// Product fields resolvable by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductInfo {
    /// Public product page URL.
    pub url: Option<String>,
    /// Product image URL.
    pub image_url: Option<String>,
}

/// By-id product lookup. Absence is a normal outcome, not an error.
#[async_trait]
pub trait ProductLookup: Send + Sync {
    /// Fetches product fields, `None` when the product is unknown or the
    /// backend cannot answer.
    async fn find(&self, product_id: &str) -> Option<ProductInfo>;
}

/// Customer fields resolvable by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerInfo {
    /// Tax/VAT identification number.
    pub taxvat: Option<String>,
    /// Cellphone custom attribute.
    pub cellphone: Option<String>,
}

/// By-id customer lookup. Absence is a normal outcome, not an error.
#[async_trait]
pub trait CustomerLookup: Send + Sync {
    /// Fetches customer fields, `None` when the customer is unknown or the
    /// backend cannot answer.
    async fn find(&self, customer_id: &str) -> Option<CustomerInfo>;
}

/// Failure-alert mail transport.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends a failure alert to the configured recipients.
    async fn alert(
        &self,
        recipients: &[String],
        message: &str,
        template_id: &str,
        store_id: &str,
    ) -> Result<()>;

    /// Performs a health check on the mail transport.
    async fn health_check(&self) -> Result<ServiceHealth>;
}

#[async_trait]
impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    async fn alert(
        &self,
        recipients: &[String],
        message: &str,
        template_id: &str,
        store_id: &str,
    ) -> Result<()> {
        self.as_ref()
            .alert(recipients, message, template_id, store_id)
            .await
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        self.as_ref().health_check().await
    }
}
