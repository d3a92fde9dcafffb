//! Public API for configuration

pub use crate::config::error::{ConfigError, ConfigResult};
pub use crate::config::loading::{discover, load_from_file, DEFAULT_CONFIG_FILE};
pub use crate::config::types::{Config, EnricherConfig, PipelineSection, ScannerConfig};
