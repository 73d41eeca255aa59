use crate::domain::model::{Instantiated, ModuleResponse, ResourceLocation};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Host facility that compiles and instantiates WebAssembly modules.
///
/// `is_module` / `is_instance` answer whether a value really came out of
/// this host, so a probe can tell a working engine from a look-alike.
#[async_trait]
pub trait ModuleCapability: Send + Sync {
    type Module: Send;
    type Instance: Send;

    fn compile(&self, bytes: &[u8]) -> Result<Self::Module>;
    fn instantiate(&self, module: &Self::Module) -> Result<Self::Instance>;
    fn is_module(&self, module: &Self::Module) -> bool;
    fn is_instance(&self, instance: &Self::Instance) -> bool;

    /// Compile and instantiate straight from a response body.
    async fn instantiate_streaming(
        &self,
        response: ModuleResponse,
    ) -> Result<Instantiated<Self::Module, Self::Instance>>;

    fn call_i32(&self, instance: &mut Self::Instance, export: &str, argument: i32) -> Result<i32>;
}

pub trait ResourceFetcher: Send + Sync {
    fn fetch(
        &self,
        location: &ResourceLocation,
    ) -> impl std::future::Future<Output = Result<ModuleResponse>> + Send;
}

/// Blocking, user-facing message display.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}
