//! Process-wide appearance styles

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::sync::Arc;

/// Key under which the checkout appearance style is registered
pub const APPEARANCE_KEY: &str = "AdyenAppearance";

static REGISTRY: OnceCell<Arc<StyleRegistry>> = OnceCell::new();

/// Registry of opaque style objects shared by every bridge in the process
///
/// The host registers its appearance once at startup; each `open` looks it
/// up and merges it into the component configuration.
#[derive(Default)]
pub struct StyleRegistry {
    styles: DashMap<String, Value>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry
    pub fn global() -> Arc<StyleRegistry> {
        REGISTRY.get_or_init(|| Arc::new(Self::new())).clone()
    }

    /// Register a style, returning the one it replaced
    pub fn register(&self, key: impl Into<String>, style: Value) -> Option<Value> {
        let key = key.into();
        tracing::debug!(key = %key, "registering style");
        self.styles.insert(key, style)
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.styles.get(key).map(|entry| entry.value().clone())
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.styles.remove(key).map(|(_, style)| style)
    }

    pub fn set_appearance(&self, style: Value) -> Option<Value> {
        self.register(APPEARANCE_KEY, style)
    }

    /// Appearance style applied to every component, if registered
    pub fn appearance(&self) -> Option<Value> {
        self.get(APPEARANCE_KEY)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn clear(&self) {
        self.styles.clear();
    }
}
