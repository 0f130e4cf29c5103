//! Configuration loaded from `.tinypass.toml`.

pub mod settings;

pub use settings::Settings;
