use crate::core::ModuleCapability;
use crate::utils::error::{LoaderError, Result};
use std::panic::{self, AssertUnwindSafe};

/// `\0asm` magic followed by binary format version 1: the smallest valid module.
pub const EMPTY_MODULE: [u8; 8] = [0x00, 0x61, 0x73, 0x6d, 0x01, 0x00, 0x00, 0x00];

pub struct CapabilityProbe;

impl CapabilityProbe {
    /// Returns whether the host can compile and instantiate WebAssembly.
    ///
    /// Never fails: a missing capability, an error from the engine, a value
    /// that is not genuinely the engine's, or a panic inside the engine all
    /// produce `false`.
    pub fn probe<C: ModuleCapability>(capability: Option<&C>) -> bool {
        let Some(capability) = capability else {
            tracing::debug!("{}", LoaderError::CapabilityAbsent);
            return false;
        };

        let result = panic::catch_unwind(AssertUnwindSafe(|| Self::exercise(capability)));
        match result {
            Ok(Ok(verdict)) => {
                tracing::debug!("WebAssembly probe verdict: {}", verdict);
                verdict
            }
            Ok(Err(e)) => {
                tracing::debug!("WebAssembly probe failed: {}", e);
                false
            }
            Err(payload) => {
                let msg = if let Some(s) = payload.downcast_ref::<&str>() {
                    (*s).to_string()
                } else if let Some(s) = payload.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "unknown panic payload".to_string()
                };
                tracing::warn!("WebAssembly probe panicked: {}", msg);
                false
            }
        }
    }

    fn exercise<C: ModuleCapability>(capability: &C) -> Result<bool> {
        let module = capability.compile(&EMPTY_MODULE)?;
        if !capability.is_module(&module) {
            return Ok(false);
        }

        let instance = capability.instantiate(&module)?;
        Ok(capability.is_instance(&instance))
    }
}
