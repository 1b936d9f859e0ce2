//! Named filter helpers available to hook templates.

use handlebars::{Handlebars, HelperDef, handlebars_helper};

handlebars_helper!(upcase: |s: String| s.to_uppercase());
handlebars_helper!(downcase: |s: String| s.to_lowercase());
handlebars_helper!(capitalize: |s: String| {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
});
handlebars_helper!(strip: |s: String| s.trim().to_string());
handlebars_helper!(truncate: |s: String, n: usize| s.chars().take(n).collect::<String>());
handlebars_helper!(money: |v: f64| format!("{v:.2}"));

/// A registered set of named filter functions supplied to the renderer.
///
/// The default set covers the common string and number filters template
/// authors expect; callers extend it with [`FilterSet::with_helper`].
pub struct FilterSet {
    helpers: Vec<(String, Box<dyn HelperDef + Send + Sync>)>,
}

impl std::fmt::Debug for FilterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterSet")
            .field("names", &self.names())
            .finish()
    }
}

impl FilterSet {
    /// Creates an empty filter set.
    pub fn empty() -> Self {
        Self {
            helpers: Vec::new(),
        }
    }

    /// Adds a named filter helper.
    #[must_use]
    pub fn with_helper(
        mut self,
        name: impl Into<String>,
        helper: Box<dyn HelperDef + Send + Sync>,
    ) -> Self {
        self.helpers.push((name.into(), helper));
        self
    }

    /// The registered filter names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.helpers.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Registers every filter on the given registry.
    pub(crate) fn register(self, registry: &mut Handlebars<'static>) {
        for (name, helper) in self.helpers {
            registry.register_helper(&name, helper);
        }
    }
}

impl Default for FilterSet {
    fn default() -> Self {
        Self::empty()
            .with_helper("upcase", Box::new(upcase))
            .with_helper("downcase", Box::new(downcase))
            .with_helper("capitalize", Box::new(capitalize))
            .with_helper("strip", Box::new(strip))
            .with_helper("truncate", Box::new(truncate))
            .with_helper("money", Box::new(money))
    }
}
