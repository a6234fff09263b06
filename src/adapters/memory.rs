use crate::domain::model::{Context, ContextType};
use crate::domain::ports::{ContextDirectory, ContextStore};
use crate::utils::error::StoreError;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Keeps contexts in memory. Useful for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryContextStore {
    contexts: Mutex<BTreeMap<String, Context>>,
}

impl MemoryContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contexts(contexts: impl IntoIterator<Item = Context>) -> Self {
        let contexts = contexts
            .into_iter()
            .map(|c| (c.name.clone(), c))
            .collect();
        Self {
            contexts: Mutex::new(contexts),
        }
    }

    pub fn get(&self, name: &str) -> Option<Context> {
        self.lock().ok()?.get(name).cloned()
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, Context>>, StoreError> {
        self.contexts.lock().map_err(|_| StoreError::Unavailable {
            message: "context map lock poisoned".to_string(),
        })
    }
}

impl ContextStore for MemoryContextStore {
    fn load(&self, name: &str) -> Result<Context, StoreError> {
        self.lock()?
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                name: name.to_string(),
            })
    }

    fn save(&self, context: &Context) -> Result<(), StoreError> {
        self.lock()?
            .insert(context.name.clone(), context.clone());
        Ok(())
    }
}

impl ContextDirectory for MemoryContextStore {
    fn contexts_of_type(&self, context_type: ContextType) -> Result<Vec<Context>, StoreError> {
        Ok(self
            .lock()?
            .values()
            .filter(|c| c.context_type == context_type)
            .cloned()
            .collect())
    }
}
