//! Immutable audit records for hook invocation attempts.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, IntoStaticStr};
use uuid::Uuid;

use crate::hook::{Hook, HookType};
use crate::transport::DispatchOutcome;

/// Terminal status of one hook invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(AsRefStr, Display, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HistoryStatus {
    /// The endpoint answered with a 2xx status.
    Success,
    /// Delivery failed at any stage.
    Error,
}

/// Audit entry for one hook invocation attempt.
///
/// The hook fields are denormalized at invocation time so the record stays
/// accurate if the hook is edited later. A record is constructed, filled,
/// and persisted exactly once per hook per event; it is never mutated after
/// the append.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Unique identifier for this record.
    pub id: Uuid,
    /// Identifier of the invoked hook at invocation time.
    pub hook_id: Uuid,
    /// Hook name at invocation time.
    pub hook_name: String,
    /// Hook store scope at invocation time.
    pub store_scope: Vec<String>,
    /// Hook event family.
    pub hook_type: HookType,
    /// Hook priority at invocation time.
    pub priority: i32,
    /// The rendered URL actually sent.
    pub payload_url: String,
    /// The rendered body actually sent.
    pub body: String,
    /// Complete raw HTTP response text; empty on pre-send failure.
    pub response: String,
    /// Terminal status of the attempt.
    pub status: HistoryStatus,
    /// Failure reason, present only when `status` is [`HistoryStatus::Error`].
    pub message: Option<String>,
    /// When the attempt was recorded.
    pub created_at: Timestamp,
}

impl HistoryRecord {
    /// Snapshots a hook's current fields together with the rendered strings.
    ///
    /// The record starts in the error state with an empty response; callers
    /// finish it with [`HistoryRecord::complete`].
    pub fn snapshot(hook: &Hook, payload_url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            hook_id: hook.id,
            hook_name: hook.name.clone(),
            store_scope: hook.store_scope.clone(),
            hook_type: hook.hook_type,
            priority: hook.priority,
            payload_url: payload_url.into(),
            body: body.into(),
            response: String::new(),
            status: HistoryStatus::Error,
            message: None,
            created_at: Timestamp::now(),
        }
    }

    /// Fills the record from a dispatch outcome.
    #[must_use]
    pub fn complete(mut self, outcome: &DispatchOutcome) -> Self {
        self.response = outcome.response.clone();
        if outcome.success {
            self.status = HistoryStatus::Success;
            self.message = None;
        } else {
            self.status = HistoryStatus::Error;
            self.message = outcome.message.clone();
        }
        self
    }

    /// Whether the attempt succeeded.
    pub fn is_success(&self) -> bool {
        self.status == HistoryStatus::Success
    }
}
