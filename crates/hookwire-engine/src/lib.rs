#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod auth;
mod config;
mod cron;
mod dispatch;
mod enrich;
mod history;
mod hook;
mod item;
mod selector;

pub mod mock;
pub mod repository;
pub mod template;
pub mod transport;

pub use auth::build_auth_header;
pub use config::DispatchConfig;
pub use cron::{Schedule, cron_expr};
pub use dispatch::DispatchEngine;
pub use enrich::{Enricher, EventContext};
pub use history::{HistoryRecord, HistoryStatus};
pub use hook::{ALL_STORES, AuthScheme, DigestParams, HeaderSpec, Hook, HookHeader, HookType};
pub use hookwire_core::{Error, ErrorKind, Result, ServiceHealth, ServiceStatus};
pub use item::{Address, Customer, EventItem, Invoice, LineItem, Order, Quote, Shipment};
pub use template::{FilterSet, TemplateRenderer};
pub use transport::{DispatchOutcome, Transport, TransportService};

/// Tracing target for dispatch operations.
pub const TRACING_TARGET: &str = "hookwire_engine::dispatch";
