//! Dispatch orchestration.
//!
//! One dispatch call covers one domain event: load the hook family, select
//! matching hooks, enrich the item once, then invoke each selected hook in
//! priority order. A failing hook never prevents later hooks from firing,
//! and every invocation attempt leaves exactly one history record.

use std::sync::Arc;

use hookwire_core::Result;

use crate::TRACING_TARGET;
use crate::auth::build_auth_header;
use crate::config::DispatchConfig;
use crate::enrich::{Enricher, EventContext};
use crate::history::HistoryRecord;
use crate::hook::{Hook, HookType};
use crate::item::EventItem;
use crate::repository::{HistoryStore, HookRepository, Notifier};
use crate::selector;
use crate::template::TemplateRenderer;
use crate::transport::TransportService;

/// Orchestrates hook delivery for domain events.
#[derive(Clone)]
pub struct DispatchEngine {
    hooks: Arc<dyn HookRepository>,
    history: Arc<dyn HistoryStore>,
    transport: TransportService,
    notifier: Arc<dyn Notifier>,
    enricher: Enricher,
    renderer: Arc<TemplateRenderer>,
}

impl std::fmt::Debug for DispatchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchEngine").finish_non_exhaustive()
    }
}

impl DispatchEngine {
    /// Creates an engine over the given collaborators.
    pub fn new(
        hooks: impl HookRepository + 'static,
        history: impl HistoryStore + 'static,
        transport: TransportService,
        notifier: impl Notifier + 'static,
        enricher: Enricher,
        renderer: TemplateRenderer,
    ) -> Self {
        Self {
            hooks: Arc::new(hooks),
            history: Arc::new(history),
            transport,
            notifier: Arc::new(notifier),
            enricher,
            renderer: Arc::new(renderer),
        }
    }

    /// Dispatches one event to its matching hooks.
    ///
    /// Hooks are filtered by enabled flag, store scope, and order status,
    /// then invoked in ascending priority order. Only a hook-storage read
    /// failure escapes as an error; everything downstream of selection is
    /// absorbed per hook.
    pub async fn dispatch(&self, item: &EventItem, config: &DispatchConfig) -> Result<()> {
        if !config.enabled {
            tracing::debug!(target: TRACING_TARGET, "dispatch disabled, skipping event");
            return Ok(());
        }

        let hook_type = item.hook_type();
        let candidates = self.hooks.find_by_type(hook_type).await?;
        let store_id = item.store_id().unwrap_or(&config.default_store_id).to_string();
        let selected = selector::select(candidates, item, &store_id);

        self.run(selected, item, &store_id, config).await;
        Ok(())
    }

    /// Dispatches one event to every enabled hook of a family.
    ///
    /// No store-scope or order-status filtering applies; only disabled
    /// hooks are skipped.
    pub async fn broadcast(
        &self,
        item: &EventItem,
        hook_type: HookType,
        config: &DispatchConfig,
    ) -> Result<()> {
        if !config.enabled {
            tracing::debug!(target: TRACING_TARGET, "dispatch disabled, skipping broadcast");
            return Ok(());
        }

        let candidates = self.hooks.find_by_type(hook_type).await?;
        let store_id = item.store_id().unwrap_or(&config.default_store_id).to_string();
        let selected = selector::select_broadcast(candidates);

        self.run(selected, item, &store_id, config).await;
        Ok(())
    }

    async fn run(&self, hooks: Vec<Hook>, item: &EventItem, store_id: &str, config: &DispatchConfig) {
        if hooks.is_empty() {
            tracing::debug!(
                target: TRACING_TARGET,
                hook_type = %item.hook_type(),
                store_id,
                "no hooks selected for event",
            );
            return;
        }

        tracing::info!(
            target: TRACING_TARGET,
            hook_type = %item.hook_type(),
            store_id,
            hooks = hooks.len(),
            "dispatching event",
        );

        let context = self.enricher.enrich(item).await;
        for hook in &hooks {
            self.invoke(hook, &context, store_id, config).await;
        }
    }

    /// Invokes one hook and records the attempt. Never errors.
    async fn invoke(
        &self,
        hook: &Hook,
        context: &EventContext,
        store_id: &str,
        config: &DispatchConfig,
    ) {
        let url = self.renderer.render_or_empty(&hook.payload_url, context);
        let body = self.renderer.render_or_empty(&hook.body, context);
        let record = HistoryRecord::snapshot(hook, &url, &body);

        let method = hook.effective_method();
        let auth_header = build_auth_header(
            hook.auth,
            &url,
            method,
            hook.username.as_deref().unwrap_or(""),
            hook.password.as_deref().unwrap_or(""),
            hook.digest.as_ref(),
        );

        let outcome = self
            .transport
            .send(
                &hook.headers,
                auth_header.as_deref(),
                hook.content_type.as_deref(),
                &url,
                &body,
                method,
            )
            .await;

        if !outcome.success {
            tracing::warn!(
                target: TRACING_TARGET,
                hook = %hook.name,
                url,
                message = outcome.message.as_deref().unwrap_or_default(),
                "hook delivery failed",
            );
            if config.alert_enabled {
                self.alert(hook, &outcome.message, store_id, config).await;
            }
        }

        let record = record.complete(&outcome);
        if let Err(error) = self.history.append(record).await {
            tracing::error!(
                target: TRACING_TARGET,
                hook = %hook.name,
                %error,
                "failed to append history record",
            );
        }
    }

    /// Sends a failure alert. Notifier errors are logged and swallowed.
    async fn alert(
        &self,
        hook: &Hook,
        failure: &Option<String>,
        store_id: &str,
        config: &DispatchConfig,
    ) {
        let message = alert_message(&hook.name, failure.as_deref());
        let template_id = config.email_template.as_deref().unwrap_or_default();

        if let Err(error) = self
            .notifier
            .alert(&config.recipients, &message, template_id, store_id)
            .await
        {
            tracing::warn!(
                target: TRACING_TARGET,
                hook = %hook.name,
                %error,
                "failed to send failure alert",
            );
        }
    }
}

fn alert_message(hook_name: &str, failure: Option<&str>) -> String {
    match failure {
        Some(detail) if !detail.is_empty() => format!("Hook {hook_name} failed: {detail}"),
        _ => format!("Hook {hook_name} failed"),
    }
}
