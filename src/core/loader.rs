use crate::core::{ExportedFunctionResult, ModuleCapability, ResourceFetcher, ResourceLocation};
use crate::utils::error::Result;

pub const MODULE_RESOURCE: &str = "ot.wasm";
pub const ADD_ONE_EXPORT: &str = "add_one";
pub const DEMO_ARGUMENT: i32 = 2;

/// Fetches a module, instantiates it while it streams in, and calls one export.
pub struct ModuleLoader<'a, C: ModuleCapability, F: ResourceFetcher> {
    capability: &'a C,
    fetcher: &'a F,
    location: ResourceLocation,
    export: String,
    argument: i32,
}

impl<'a, C: ModuleCapability, F: ResourceFetcher> ModuleLoader<'a, C, F> {
    pub fn new(capability: &'a C, fetcher: &'a F, location: ResourceLocation) -> Self {
        Self {
            capability,
            fetcher,
            location,
            export: ADD_ONE_EXPORT.to_string(),
            argument: DEMO_ARGUMENT,
        }
    }

    pub fn with_argument(mut self, argument: i32) -> Self {
        self.argument = argument;
        self
    }

    pub fn with_export(mut self, export: impl Into<String>) -> Self {
        self.export = export.into();
        self
    }

    pub async fn load_and_run(&self) -> Result<ExportedFunctionResult> {
        tracing::debug!("Fetching module from {}", self.location);
        let response = self.fetcher.fetch(&self.location).await?;
        tracing::debug!(
            "Module response ready (content type: {:?})",
            response.content_type
        );

        // body 直接交給引擎，不先整包讀完
        let loaded = self.capability.instantiate_streaming(response).await?;
        let mut instance = loaded.instance;
        tracing::debug!("Module instantiated, calling `{}`", self.export);

        let value = self
            .capability
            .call_i32(&mut instance, &self.export, self.argument)?;
        tracing::debug!("`{}({})` returned {}", self.export, self.argument, value);

        Ok(ExportedFunctionResult {
            export: self.export.clone(),
            argument: self.argument,
            value,
        })
    }
}
