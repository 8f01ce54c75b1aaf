use crate::generator::TextGenerator;
use crate::store::PracticeStore;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<TextGenerator>,
    store: Arc<Mutex<PracticeStore>>,
    /// Sessions and common errors returned by the history endpoint
    pub history_limit: usize,
}

impl AppState {
    pub fn new(generator: TextGenerator, store: PracticeStore, history_limit: usize) -> Self {
        Self {
            generator: Arc::new(generator),
            store: Arc::new(Mutex::new(store)),
            history_limit,
        }
    }

    /// Never hold the guard across an `.await`
    pub fn store(&self) -> MutexGuard<'_, PracticeStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
