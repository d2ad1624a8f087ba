use shared_types::{AmountRange, FilterTree};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Filter state of one list view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSlot {
    pub tree: FilterTree,
    /// Amount bounds in base currency, published by the last build
    pub base_range: Option<AmountRange>,
}

/// Current filters of every list view, keyed by scope (`saving-wallet`,
/// `transactions`, ...). Unknown scopes read as an empty filter.
pub struct FilterStore {
    slots: Arc<RwLock<HashMap<String, FilterSlot>>>,
}

impl FilterStore {
    pub fn new() -> Self {
        Self {
            slots: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn get(&self, scope: &str) -> FilterSlot {
        let slots = self.slots.read().await;
        slots.get(scope).cloned().unwrap_or_default()
    }

    /// Stores a freshly built tree with its base-currency range
    pub async fn publish(&self, scope: &str, tree: FilterTree, base_range: AmountRange) {
        let mut slots = self.slots.write().await;
        slots.insert(
            scope.to_string(),
            FilterSlot {
                tree,
                base_range: Some(base_range),
            },
        );
    }

    /// Stores an externally authored tree; its base range is unknown
    pub async fn replace_tree(&self, scope: &str, tree: FilterTree) {
        let mut slots = self.slots.write().await;
        slots.insert(
            scope.to_string(),
            FilterSlot {
                tree,
                base_range: None,
            },
        );
    }

    /// Applies `edit` to the scope's tree under the write lock, so two
    /// concurrent edits both land.
    pub async fn update_tree<F>(&self, scope: &str, edit: F) -> FilterSlot
    where
        F: FnOnce(&FilterTree) -> FilterTree,
    {
        let mut slots = self.slots.write().await;
        let slot = slots.entry(scope.to_string()).or_default();
        slot.tree = edit(&slot.tree);
        slot.clone()
    }

    pub async fn reset(&self, scope: &str) {
        let mut slots = self.slots.write().await;
        slots.remove(scope);
    }
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new()
    }
}
