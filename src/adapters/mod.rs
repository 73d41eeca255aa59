// Adapters layer: concrete implementations for the engine, fetchers and the console.

pub mod http;
pub mod notify;
pub mod storage;
pub mod wasmtime_host;

use crate::core::{ModuleResponse, ResourceFetcher, ResourceLocation};
use crate::utils::error::Result;

pub use http::HttpFetcher;
pub use notify::ConsoleNotifier;
pub use storage::FileFetcher;
pub use wasmtime_host::{WasmInstance, WasmtimeCapability};

/// Picks the HTTP or file fetcher based on where the resource lives.
#[derive(Debug, Clone, Default)]
pub struct DefaultFetcher {
    http: HttpFetcher,
    file: FileFetcher,
}

impl DefaultFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResourceFetcher for DefaultFetcher {
    async fn fetch(&self, location: &ResourceLocation) -> Result<ModuleResponse> {
        match location {
            ResourceLocation::File(_) => self.file.fetch(location).await,
            ResourceLocation::Url(_) => self.http.fetch(location).await,
        }
    }
}
