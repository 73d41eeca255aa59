//! WebAssembly capability backed by wasmtime.
//!
//! Every instance gets its own `Store`, so nothing is shared between runs
//! except the engine and its compilation settings.

use crate::core::{Instantiated, ModuleCapability, ModuleResponse};
use crate::utils::error::{LoaderError, Result};
use async_trait::async_trait;
use futures::StreamExt;
use wasmtime::{Config, Engine, Instance, Module, Store};

pub const WASM_CONTENT_TYPE: &str = "application/wasm";

const WASM_MAGIC: [u8; 4] = [0x00, 0x61, 0x73, 0x6d];
const WASM_VERSION: [u8; 4] = [0x01, 0x00, 0x00, 0x00];
const HEADER_LEN: usize = 8;

/// An instantiated module together with the store that owns it.
pub struct WasmInstance {
    store: Store<()>,
    instance: Instance,
}

#[derive(Clone)]
pub struct WasmtimeCapability {
    engine: Engine,
    require_wasm_mime: bool,
}

impl WasmtimeCapability {
    /// Builds an engine with the default settings.
    ///
    /// Hosts where wasmtime cannot set up an engine get `CapabilityAbsent`.
    pub fn try_new() -> Result<Self> {
        Self::try_with_config(&Config::new())
    }

    pub fn try_with_config(config: &Config) -> Result<Self> {
        let engine = Engine::new(config).map_err(|e| {
            tracing::warn!("Cannot create a WebAssembly engine: {:#}", e);
            LoaderError::CapabilityAbsent
        })?;

        Ok(Self {
            engine,
            require_wasm_mime: true,
        })
    }

    /// Reject responses that declare a content type other than `application/wasm`.
    pub fn require_wasm_mime(mut self, required: bool) -> Self {
        self.require_wasm_mime = required;
        self
    }

    fn check_content_type(&self, response: &ModuleResponse) -> Result<()> {
        if !self.require_wasm_mime {
            return Ok(());
        }

        match response.content_type.as_deref() {
            // 本機檔案沒有 content type
            None => Ok(()),
            Some(content_type) => {
                let essence = content_type.split(';').next().unwrap_or_default().trim();
                if essence.eq_ignore_ascii_case(WASM_CONTENT_TYPE) {
                    Ok(())
                } else {
                    Err(LoaderError::module_load(format!(
                        "{} was served as `{}`, expected `{}`",
                        response.location, content_type, WASM_CONTENT_TYPE
                    )))
                }
            }
        }
    }

    fn check_header(header: &[u8]) -> Result<()> {
        if header.len() < HEADER_LEN {
            return Err(LoaderError::module_load(format!(
                "module is {} bytes, shorter than the {}-byte header",
                header.len(),
                HEADER_LEN
            )));
        }
        if header[..4] != WASM_MAGIC {
            return Err(LoaderError::module_load("missing `\\0asm` magic number"));
        }
        if header[4..HEADER_LEN] != WASM_VERSION {
            return Err(LoaderError::module_load(format!(
                "unsupported binary version {:02x?}",
                &header[4..HEADER_LEN]
            )));
        }
        Ok(())
    }

    fn compile_with(engine: &Engine, bytes: &[u8]) -> Result<Module> {
        Module::from_binary(engine, bytes).map_err(|e| LoaderError::module_load(format!("{:#}", e)))
    }

    fn instantiate_with(engine: &Engine, module: &Module) -> Result<WasmInstance> {
        let mut store = Store::new(engine, ());
        let instance = Instance::new(&mut store, module, &[])
            .map_err(|e| LoaderError::module_load(format!("instantiation failed: {:#}", e)))?;
        Ok(WasmInstance { store, instance })
    }
}

#[async_trait]
impl ModuleCapability for WasmtimeCapability {
    type Module = Module;
    type Instance = WasmInstance;

    fn compile(&self, bytes: &[u8]) -> Result<Module> {
        Self::compile_with(&self.engine, bytes)
    }

    fn instantiate(&self, module: &Module) -> Result<WasmInstance> {
        Self::instantiate_with(&self.engine, module)
    }

    fn is_module(&self, module: &Module) -> bool {
        Engine::same(module.engine(), &self.engine)
    }

    fn is_instance(&self, instance: &WasmInstance) -> bool {
        Engine::same(instance.store.engine(), &self.engine)
    }

    async fn instantiate_streaming(
        &self,
        response: ModuleResponse,
    ) -> Result<Instantiated<Module, WasmInstance>> {
        self.check_content_type(&response)?;

        let ModuleResponse {
            location, mut body, ..
        } = response;
        let mut bytes = Vec::new();
        let mut header_checked = false;

        // header 一到就驗證，壞掉的檔案不必等整個 body 下載完
        while let Some(chunk) = body.next().await {
            bytes.extend_from_slice(&chunk?);
            if !header_checked && bytes.len() >= HEADER_LEN {
                Self::check_header(&bytes[..HEADER_LEN])?;
                header_checked = true;
            }
        }
        if !header_checked {
            Self::check_header(&bytes)?;
        }
        tracing::debug!("Received {} bytes from {}", bytes.len(), location);

        let engine = self.engine.clone();
        let (module, instance) = tokio::task::spawn_blocking(move || {
            let module = Self::compile_with(&engine, &bytes)?;
            let instance = Self::instantiate_with(&engine, &module)?;
            Ok::<_, LoaderError>((module, instance))
        })
        .await
        .map_err(|e| LoaderError::module_load(format!("compilation task failed: {}", e)))??;

        Ok(Instantiated { module, instance })
    }

    fn call_i32(&self, instance: &mut WasmInstance, export: &str, argument: i32) -> Result<i32> {
        let func = instance
            .instance
            .get_func(&mut instance.store, export)
            .ok_or_else(|| LoaderError::ExportMismatch {
                export: export.to_string(),
                reason: "no function with this name is exported".to_string(),
            })?;

        let typed = func
            .typed::<i32, i32>(&instance.store)
            .map_err(|e| LoaderError::ExportMismatch {
                export: export.to_string(),
                reason: format!("{:#}", e),
            })?;

        typed
            .call(&mut instance.store, argument)
            .map_err(|e| LoaderError::ExecutionTrap {
                export: export.to_string(),
                message: format!("{:#}", e),
            })
    }
}
