//! Bridge configuration
//!
//! - `BridgeConfig`: the effective settings, with built-in defaults
//! - `ConfigFile`: a partial layer as stored on disk
//! - `FileConfigProvider`: a YAML layer at user or workspace level
//!
//! Layers are merged by `crate::resolver::ConfigResolver`.

mod traits;
mod settings;
mod file;

pub use traits::{ConfigProvider, ConfigError, ConfigResult};
pub use settings::{
    BridgeConfig, ConfigFile, validate_output_limit,
    DEFAULT_PROGRAM, QUIET_FLAG, DEFAULT_MAX_OUTPUT_BYTES, DEFAULT_PROJECT_DOC,
    DEFAULT_API_KEY_VAR, DEFAULT_HOME_FALLBACK,
};
pub use file::{FileConfigProvider, ConfigLevel};
