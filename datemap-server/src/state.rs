use std::sync::{Arc, Mutex, MutexGuard};

use datemap_core::{Backend, Datemap, EventStore, FuzzyMatcher};

pub type SharedStore = EventStore<Box<dyn Backend + Send>>;

/// Shared application state. Every request goes through the one store.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<SharedStore>>,
    matcher: FuzzyMatcher,
}

impl AppState {
    pub fn open(datemap: &Datemap) -> Self {
        let backend: Box<dyn Backend + Send> = Box::new(datemap.backend());
        let store = EventStore::load_with(backend, datemap.store_options());
        AppState::new(store, datemap.matcher())
    }

    pub fn new(store: SharedStore, matcher: FuzzyMatcher) -> Self {
        AppState {
            store: Arc::new(Mutex::new(store)),
            matcher,
        }
    }

    /// Lock the store, recovering from a poisoned lock.
    pub fn store(&self) -> MutexGuard<'_, SharedStore> {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn matcher(&self) -> &FuzzyMatcher {
        &self.matcher
    }
}

#[cfg(test)]
pub fn test_state() -> AppState {
    use datemap_core::MemoryBackend;

    let backend: Box<dyn Backend + Send> = Box::new(MemoryBackend::new());
    AppState::new(EventStore::load(backend), FuzzyMatcher::default())
}
