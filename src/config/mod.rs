#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::launcher::FailurePolicy;
use crate::core::loader::{DEMO_ARGUMENT, MODULE_RESOURCE};
use crate::core::ResourceLocation;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extensions, validate_module_base, validate_path, Validate,
};
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
pub use cli::{CliConfig, LogFormat};
pub use toml_config::TomlConfig;

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
    pub module_base: String,
    pub module_path: String,
    pub argument: i32,
    pub require_wasm_mime: bool,
    pub failure_policy: FailurePolicy,
    pub acknowledge: bool,
    pub monitor: bool,
    pub disable_engine: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            module_base: ".".to_string(),
            module_path: MODULE_RESOURCE.to_string(),
            argument: DEMO_ARGUMENT,
            require_wasm_mime: true,
            failure_policy: FailurePolicy::Notify,
            acknowledge: false,
            monitor: false,
            disable_engine: false,
        }
    }
}

impl LoaderConfig {
    pub fn location(&self) -> Result<ResourceLocation> {
        ResourceLocation::resolve(&self.module_base, &self.module_path)
    }
}

impl Validate for LoaderConfig {
    fn validate(&self) -> Result<()> {
        validate_module_base("module_base", &self.module_base)?;
        validate_path("module_path", &self.module_path)?;
        validate_file_extensions("module_path", std::slice::from_ref(&self.module_path), &["wasm"])?;
        self.location().map(|_| ())
    }
}
