use crate::config::LoaderConfig;
use crate::utils::error::{LoaderError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub resource: ResourceConfig,
    pub invocation: Option<InvocationConfig>,
    pub engine: Option<EngineConfig>,
    pub error_handling: Option<ErrorHandlingConfig>,
    pub notification: Option<NotificationConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceConfig {
    pub base: Option<String>,
    pub path: Option<String>,
    pub require_wasm_mime: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationConfig {
    pub argument: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorHandlingConfig {
    pub on_load_failure: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub acknowledge: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LoaderError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LoaderError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MODULE_BASE})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LoaderError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 套用到預設值上，產生完整的執行設定
    pub fn to_loader_config(&self) -> Result<LoaderConfig> {
        let mut config = LoaderConfig::default();

        if let Some(base) = &self.resource.base {
            config.module_base = base.clone();
        }
        if let Some(path) = &self.resource.path {
            config.module_path = path.clone();
        }
        if let Some(require) = self.resource.require_wasm_mime {
            config.require_wasm_mime = require;
        }
        if let Some(argument) = self.invocation.as_ref().and_then(|i| i.argument) {
            config.argument = argument;
        }
        if let Some(enabled) = self.engine.as_ref().and_then(|e| e.enabled) {
            config.disable_engine = !enabled;
        }
        if let Some(policy) = self
            .error_handling
            .as_ref()
            .and_then(|e| e.on_load_failure.as_deref())
        {
            config.failure_policy = policy.parse()?;
        }
        if let Some(acknowledge) = self.notification.as_ref().and_then(|n| n.acknowledge) {
            config.acknowledge = acknowledge;
        }
        config.monitor = self.monitoring_enabled();

        Ok(config)
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}
