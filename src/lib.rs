pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{ConsoleNotifier, DefaultFetcher, WasmtimeCapability};
pub use config::{LoaderConfig, TomlConfig};
pub use crate::core::{
    launcher::{FailurePolicy, Launcher, UNSUPPORTED_MESSAGE},
    loader::ModuleLoader,
    probe::CapabilityProbe,
    ExportedFunctionResult, ResourceLocation, RunOutcome,
};
pub use utils::error::{LoaderError, Result};
