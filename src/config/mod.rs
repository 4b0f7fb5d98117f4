//! Persisted settings: default view state, backend choice, rendering options

mod loader;
mod schema;

pub use loader::ConfigLoader;
pub use schema::{BrowserConfig, Config, UiConfig, ViewConfig};
