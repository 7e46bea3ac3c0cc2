pub mod app;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod window;

pub use app::router;
pub use config::AppConfig;
pub use state::AppState;
pub use storage::{JsonFileStore, MoodStore, StorageError};
