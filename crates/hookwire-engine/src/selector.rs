//! Hook selection.
//!
//! Pure filtering and ordering over a set of candidate hooks. The candidates
//! are already narrowed by family when loaded from the repository; selection
//! applies the enabled flag, store scope, and order-status filters, then
//! orders by ascending priority with a stable sort so equal priorities keep
//! repository order.

use crate::hook::Hook;
use crate::item::EventItem;

/// Filters and orders candidate hooks for one item.
///
/// `store_id` is the item's store falling back to the configured default.
pub fn select(mut hooks: Vec<Hook>, item: &EventItem, store_id: &str) -> Vec<Hook> {
    hooks.retain(|hook| matches(hook, item, store_id));
    hooks.sort_by_key(|hook| hook.priority);
    hooks
}

/// Filters and orders hooks for broadcast dispatch.
///
/// Every enabled hook of the family fires regardless of the item's store or
/// order status; only the enabled flag applies.
pub fn select_broadcast(mut hooks: Vec<Hook>) -> Vec<Hook> {
    hooks.retain(|hook| hook.enabled);
    hooks.sort_by_key(|hook| hook.priority);
    hooks
}

fn matches(hook: &Hook, item: &EventItem, store_id: &str) -> bool {
    hook.enabled && hook.matches_store(store_id) && matches_status(hook, item)
}

fn matches_status(hook: &Hook, item: &EventItem) -> bool {
    match item.order_status() {
        Some(status) => hook.matches_order_status(status),
        // Non-order items carry no status and are never status-filtered.
        None => true,
    }
}
