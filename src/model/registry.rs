//! Model registry seam.
//!
//! The data layer owns model metadata; the pipeline consumes it through
//! [`ModelRegistry`]. [`InMemoryModelRegistry`] is a complete implementation
//! for hosts that assemble their model set programmatically, and for tests.

use std::collections::HashMap;
use std::sync::Arc;

use super::Model;

/// Read access to the registered models and the locale set.
pub trait ModelRegistry: Send + Sync {
    /// All registered models, in registration order
    fn models(&self) -> Vec<Arc<Model>>;

    /// Look up a model by name
    fn model(&self, name: &str) -> Option<Arc<Model>>;

    /// All known locales
    fn locales(&self) -> Vec<String>;

    /// The default locale, used for non-localized models
    fn default_locale(&self) -> String;
}

/// Registry backed by an in-process model set.
pub struct InMemoryModelRegistry {
    ordered: Vec<Arc<Model>>,
    by_name: HashMap<String, Arc<Model>>,
    locales: Vec<String>,
    default_locale: String,
}

impl InMemoryModelRegistry {
    /// Create a registry with a single known locale
    #[must_use]
    pub fn new(default_locale: impl Into<String>) -> Self {
        let default_locale = default_locale.into();
        Self {
            ordered: Vec::new(),
            by_name: HashMap::new(),
            locales: vec![default_locale.clone()],
            default_locale,
        }
    }

    /// Replace the known locale set
    #[must_use]
    pub fn with_locales(mut self, locales: Vec<String>) -> Self {
        self.locales = locales;
        self
    }

    /// Register a model. A model with the same name is replaced.
    pub fn register(&mut self, model: Model) {
        let model = Arc::new(model);
        let name = model.name().to_string();

        if let Some(existing) = self
            .ordered
            .iter_mut()
            .find(|m| m.name() == model.name())
        {
            *existing = Arc::clone(&model);
        } else {
            self.ordered.push(Arc::clone(&model));
        }
        self.by_name.insert(name, model);
    }
}

impl ModelRegistry for InMemoryModelRegistry {
    fn models(&self) -> Vec<Arc<Model>> {
        self.ordered.clone()
    }

    fn model(&self, name: &str) -> Option<Arc<Model>> {
        self.by_name.get(name).cloned()
    }

    fn locales(&self) -> Vec<String> {
        self.locales.clone()
    }

    fn default_locale(&self) -> String {
        self.default_locale.clone()
    }
}
