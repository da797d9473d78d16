//! HTTP surface for problembot

mod handlers;
pub mod types;

pub use handlers::create_router;

use crate::runtime::ProductionDispatcher;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<ProductionDispatcher>,
}

impl AppState {
    pub fn new(dispatcher: ProductionDispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }
}
