//! Configuration management for design-props
//!
//! Editor settings (log level, theme, storage location, export indent) are kept
//! in a JSON file under the platform config dir.

pub mod settings;

pub use settings::Settings;
