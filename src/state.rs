use crate::storage::MoodStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MoodStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn MoodStore>) -> Self {
        Self { store }
    }
}
