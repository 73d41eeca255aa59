use crate::config::{LoaderConfig, TomlConfig};
use crate::core::launcher::FailurePolicy;
use crate::utils::error::Result;
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "ot-wasm-load")]
#[command(about = "Check for WebAssembly support, load ot.wasm and call add_one(2)")]
pub struct CliConfig {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory or http(s) URL the module path is resolved against
    #[arg(long)]
    pub module_base: Option<String>,

    /// Module resource, relative to the base
    #[arg(long)]
    pub module_path: Option<String>,

    /// Value passed to the exported function
    #[arg(long, allow_hyphen_values = true)]
    pub argument: Option<i32>,

    /// Accept modules served with any Content-Type
    #[arg(long)]
    pub allow_any_content_type: bool,

    /// What to do when loading fails: notify or silent
    #[arg(long)]
    pub on_load_failure: Option<FailurePolicy>,

    /// Wait for Enter after each notification
    #[arg(long)]
    pub acknowledge: bool,

    /// Log CPU and memory usage per phase
    #[arg(long)]
    pub monitor: bool,

    /// Behave like a host without a WebAssembly engine
    #[arg(long)]
    pub disable_engine: bool,

    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 設定檔為底，命令列參數覆蓋
    pub fn resolve(&self) -> Result<LoaderConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                TomlConfig::from_file(path)?.to_loader_config()?
            }
            None => LoaderConfig::default(),
        };

        if let Some(base) = &self.module_base {
            config.module_base = base.clone();
        }
        if let Some(path) = &self.module_path {
            config.module_path = path.clone();
        }
        if let Some(argument) = self.argument {
            config.argument = argument;
        }
        if let Some(policy) = self.on_load_failure {
            config.failure_policy = policy;
        }
        if self.allow_any_content_type {
            config.require_wasm_mime = false;
        }
        config.acknowledge |= self.acknowledge;
        config.monitor |= self.monitor;
        config.disable_engine |= self.disable_engine;

        Ok(config)
    }
}
