use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("WebAssembly capability is not available on this host")]
    CapabilityAbsent,

    #[error("Failed to fetch {resource}: {reason}")]
    ResourceFetchFailure { resource: String, reason: String },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Module load failed: {message}")]
    ModuleLoadFailure { message: String },

    #[error("Export `{export}` mismatch: {reason}")]
    ExportMismatch { export: String, reason: String },

    #[error("Export `{export}` trapped: {message}")]
    ExecutionTrap { export: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for `{field}`: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value `{value}` for `{field}`: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Capability,
    Network,
    Module,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LoaderError {
    pub fn module_load(message: impl Into<String>) -> Self {
        LoaderError::ModuleLoadFailure {
            message: message.into(),
        }
    }

    pub fn fetch_failure(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        LoaderError::ResourceFetchFailure {
            resource: resource.into(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            LoaderError::CapabilityAbsent => ErrorCategory::Capability,
            LoaderError::ResourceFetchFailure { .. } | LoaderError::HttpError(_) => {
                ErrorCategory::Network
            }
            LoaderError::ModuleLoadFailure { .. }
            | LoaderError::ExportMismatch { .. }
            | LoaderError::ExecutionTrap { .. } => ErrorCategory::Module,
            LoaderError::ConfigError { .. }
            | LoaderError::ConfigValidationError { .. }
            | LoaderError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            LoaderError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Capability => ErrorSeverity::Low,
            // 網路錯誤通常重試即可
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Module | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            LoaderError::CapabilityAbsent => {
                "Run on a host with a WebAssembly engine (drop --disable-engine)"
            }
            LoaderError::ResourceFetchFailure { .. } | LoaderError::HttpError(_) => {
                "Check that the module base points at a reachable location containing the module"
            }
            LoaderError::ModuleLoadFailure { .. } => {
                "Make sure the resource is a valid WebAssembly binary served as application/wasm"
            }
            LoaderError::ExportMismatch { .. } => {
                "Rebuild the module so it exports `add_one: (i32) -> i32`"
            }
            LoaderError::ExecutionTrap { .. } => "Inspect the module; the exported call aborted",
            LoaderError::ConfigError { .. }
            | LoaderError::ConfigValidationError { .. }
            | LoaderError::InvalidConfigValueError { .. } => {
                "Review the command line flags and the configuration file"
            }
            LoaderError::IoError(_) => "Check file permissions and available disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            LoaderError::CapabilityAbsent => "This host cannot run WebAssembly".to_string(),
            LoaderError::ResourceFetchFailure { resource, .. } => {
                format!("Could not download {}", resource)
            }
            LoaderError::HttpError(e) => format!("Network problem: {}", e),
            LoaderError::ModuleLoadFailure { .. } => {
                "The downloaded file is not a usable WebAssembly module".to_string()
            }
            LoaderError::ExportMismatch { export, .. } => {
                format!("The module does not provide a usable `{}` function", export)
            }
            LoaderError::ExecutionTrap { export, .. } => {
                format!("The module crashed while running `{}`", export)
            }
            LoaderError::ConfigError { .. }
            | LoaderError::ConfigValidationError { .. }
            | LoaderError::InvalidConfigValueError { .. } => {
                format!("Invalid configuration: {}", self)
            }
            LoaderError::IoError(e) => format!("System error: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, LoaderError>;
