pub mod component;
pub mod error;
pub mod loader;

/// Re-export key types
pub use component::ConfigComponent;
pub use error::ConfigError;
pub use loader::{load_config, parse_config, ConfigFormat};

// Test module declaration
#[cfg(test)]
mod tests;
