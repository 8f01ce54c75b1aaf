// Library surface shared by the binary and the integration tests.
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod generator;
pub mod history;
pub mod http;
pub mod models;
pub mod store;

pub use config::{Config, ConfigStore, FileConfigStore};
pub use error::{EngineError, GenerationError};
pub use generator::{CompletionProvider, TextGenerator};
pub use http::{create_router, AppState};
pub use store::PracticeStore;
