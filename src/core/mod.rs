pub mod launcher;
pub mod loader;
pub mod probe;

pub use crate::domain::model::{
    Branch, ByteStream, ExportedFunctionResult, Instantiated, ModuleResponse, ResourceLocation,
    RunOutcome,
};
pub use crate::domain::ports::{ModuleCapability, Notifier, ResourceFetcher};
pub use crate::utils::error::Result;
