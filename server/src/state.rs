//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::simulate::{Delays, RandomSource, ThreadRandom};
use crate::store::ItemStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ItemStore>,
    pub random: Arc<dyn RandomSource>,
    pub delays: Delays,
}

impl AppState {
    /// Seeded store, thread-local randomness, the given delays.
    pub fn new(delays: Delays) -> Self {
        Self::with_parts(Arc::new(ItemStore::seeded()), Arc::new(ThreadRandom), delays)
    }

    pub fn with_parts(
        store: Arc<ItemStore>,
        random: Arc<dyn RandomSource>,
        delays: Delays,
    ) -> Self {
        Self {
            store,
            random,
            delays,
        }
    }
}
