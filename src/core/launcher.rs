use crate::core::loader::ModuleLoader;
use crate::core::probe::CapabilityProbe;
use crate::core::{Branch, ModuleCapability, Notifier, ResourceFetcher, ResourceLocation, RunOutcome};
use crate::utils::error::LoaderError;
use crate::utils::monitor::SystemMonitor;
use serde::{Deserialize, Serialize};

pub const UNSUPPORTED_MESSAGE: &str =
    "This demo needs WebAssembly. Use a host with a WebAssembly engine!";

/// What happens when fetching, instantiating or calling the module fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Tell the user through the notifier.
    #[default]
    Notify,
    /// Only log it; nothing reaches the user.
    Silent,
}

impl std::str::FromStr for FailurePolicy {
    type Err = LoaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "notify" => Ok(FailurePolicy::Notify),
            "silent" => Ok(FailurePolicy::Silent),
            other => Err(LoaderError::InvalidConfigValueError {
                field: "on_load_failure".to_string(),
                value: other.to_string(),
                reason: "Expected `notify` or `silent`".to_string(),
            }),
        }
    }
}

/// Runs the probe, then either the loader or the unsupported notice.
pub struct Launcher<C: ModuleCapability, F: ResourceFetcher, N: Notifier> {
    capability: Option<C>,
    fetcher: F,
    notifier: N,
    location: ResourceLocation,
    argument: i32,
    failure_policy: FailurePolicy,
    monitor: SystemMonitor,
}

impl<C: ModuleCapability, F: ResourceFetcher, N: Notifier> Launcher<C, F, N> {
    pub fn new(capability: Option<C>, fetcher: F, notifier: N, location: ResourceLocation) -> Self {
        Self {
            capability,
            fetcher,
            notifier,
            location,
            argument: crate::core::loader::DEMO_ARGUMENT,
            failure_policy: FailurePolicy::default(),
            monitor: SystemMonitor::new(false),
        }
    }

    pub fn with_argument(mut self, argument: i32) -> Self {
        self.argument = argument;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_monitoring(mut self, enabled: bool) -> Self {
        self.monitor = SystemMonitor::new(enabled);
        self
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub async fn run(&self) -> RunOutcome {
        if self.monitor.is_enabled() {
            tracing::info!("🔍 System monitoring enabled");
        }

        // Probing
        let branch = Branch::from(CapabilityProbe::probe(self.capability.as_ref()));
        self.monitor.log_stats("probe");

        let outcome = match (branch, self.capability.as_ref()) {
            (Branch::Supported, Some(capability)) => self.load(capability).await,
            _ => {
                tracing::info!("WebAssembly is not supported on this host");
                self.notifier.notify(UNSUPPORTED_MESSAGE);
                RunOutcome::Unsupported
            }
        };

        self.monitor.log_final_stats();
        outcome
    }

    async fn load(&self, capability: &C) -> RunOutcome {
        tracing::info!("Loading {}", self.location);
        let loader = ModuleLoader::new(capability, &self.fetcher, self.location.clone())
            .with_argument(self.argument);

        let result = loader.load_and_run().await;
        self.monitor.log_stats("load");

        match result {
            Ok(result) => {
                tracing::info!("✅ Module call succeeded");
                self.notifier.notify(&result.message());
                RunOutcome::Succeeded(result)
            }
            Err(e) => {
                tracing::error!(
                    "❌ Loading {} failed: {} (Category: {:?}, Severity: {:?})",
                    self.location,
                    e,
                    e.category(),
                    e.severity()
                );
                if self.failure_policy == FailurePolicy::Notify {
                    self.notifier.notify(&format!(
                        "Failed to run {}: {}",
                        self.location,
                        e.user_friendly_message()
                    ));
                }
                RunOutcome::Failed(e)
            }
        }
    }
}
