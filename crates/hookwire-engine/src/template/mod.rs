//! Template rendering for hook URLs and bodies.
//!
//! Hooks carry two operator-configured templates (payload URL and body) in a
//! logic-less syntax with conditionals, loops, and variable interpolation.
//! The enriched event context is exposed under the `item` root:
//!
//! ```text
//! https://api.example.com/orders/{{item.increment_id}}
//! {"total": "{{item.order_total_formatted}}", "status": "{{item.status}}"}
//! ```
//!
//! Templates are operator-configured data, not trusted code; no host call
//! is reachable from a template beyond the registered filter set.

mod filters;

use handlebars::Handlebars;

use hookwire_core::{Error, Result};

use crate::enrich::EventContext;

pub use filters::FilterSet;

/// Tracing target for template operations.
pub const TRACING_TARGET: &str = "hookwire_engine::template";

/// Renders hook templates against an enriched event context.
pub struct TemplateRenderer {
    registry: Handlebars<'static>,
}

impl std::fmt::Debug for TemplateRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRenderer").finish_non_exhaustive()
    }
}

impl TemplateRenderer {
    /// Creates a renderer with the given filter set registered.
    pub fn new(filters: FilterSet) -> Self {
        let mut registry = Handlebars::new();
        // Missing fields render as empty rather than failing the template;
        // enrichment fields are optional by design.
        registry.set_strict_mode(false);
        filters.register(&mut registry);

        Self { registry }
    }

    /// Renders one template against the context.
    ///
    /// The URL and the body of a hook are two independent calls producing
    /// two independent strings.
    pub fn render(&self, template: &str, context: &EventContext) -> Result<String> {
        let data = serde_json::json!({ "item": context });
        self.registry.render_template(template, &data).map_err(|e| {
            Error::template()
                .with_message(e.to_string())
                .with_source(e)
        })
    }

    /// Renders one template, degrading a parse or evaluation error to an
    /// empty string.
    ///
    /// A broken template must not abort the dispatch loop; the error is
    /// logged and the empty string flows downstream.
    pub fn render_or_empty(&self, template: &str, context: &EventContext) -> String {
        match self.render(template, context) {
            Ok(rendered) => rendered,
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    %error,
                    "Template render failed, using empty string"
                );
                String::new()
            }
        }
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new(FilterSet::default())
    }
}
