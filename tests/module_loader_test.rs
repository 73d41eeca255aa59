mod common;

use anyhow::Result;
use common::{fixture_dir, CountingFetcher};
use ot_wasm_load::adapters::FileFetcher;
use ot_wasm_load::core::loader::{ADD_ONE_EXPORT, DEMO_ARGUMENT, MODULE_RESOURCE};
use ot_wasm_load::{CapabilityProbe, LoaderError, ModuleLoader, ResourceLocation, WasmtimeCapability};
use tempfile::TempDir;

fn fixture_location() -> ResourceLocation {
    ResourceLocation::resolve(fixture_dir().to_str().unwrap(), MODULE_RESOURCE).unwrap()
}

#[test]
fn test_probe_is_stable_for_real_engine() {
    let capability = WasmtimeCapability::try_new().unwrap();
    assert!(CapabilityProbe::probe(Some(&capability)));
    assert!(CapabilityProbe::probe(Some(&capability)));
    assert!(!CapabilityProbe::probe::<WasmtimeCapability>(None));
}

#[tokio::test]
async fn test_reference_module_adds_one() -> Result<()> {
    let capability = WasmtimeCapability::try_new().unwrap();
    let fetcher = CountingFetcher::default();
    let loader = ModuleLoader::new(&capability, &fetcher, fixture_location());

    let result = loader.load_and_run().await?;

    assert_eq!(result.export, ADD_ONE_EXPORT);
    assert_eq!(result.argument, DEMO_ARGUMENT);
    assert_eq!(result.value, 3);
    assert_eq!(result.message(), "2 + 1 = 3");
    assert_eq!(fetcher.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn test_small_chunks_still_instantiate() -> Result<()> {
    let capability = WasmtimeCapability::try_new().unwrap();
    let fetcher = FileFetcher::with_chunk_size(5);
    let loader = ModuleLoader::new(&capability, &fetcher, fixture_location()).with_argument(-3);

    let result = loader.load_and_run().await?;
    assert_eq!(result.value, -2);
    Ok(())
}

#[tokio::test]
async fn test_unknown_export_is_mismatch() {
    let capability = WasmtimeCapability::try_new().unwrap();
    let fetcher = FileFetcher::new();
    let loader =
        ModuleLoader::new(&capability, &fetcher, fixture_location()).with_export("add_two");

    let result = loader.load_and_run().await;
    assert!(matches!(result, Err(LoaderError::ExportMismatch { .. })));
}

#[tokio::test]
async fn test_add_one_wraps_on_overflow() -> Result<()> {
    let capability = WasmtimeCapability::try_new().unwrap();
    let fetcher = FileFetcher::new();
    let loader =
        ModuleLoader::new(&capability, &fetcher, fixture_location()).with_argument(i32::MAX);

    // i32.add 在溢位時環繞，不會 trap
    let result = loader.load_and_run().await?;
    assert_eq!(result.value, i32::MIN);
    Ok(())
}

#[tokio::test]
async fn test_text_file_is_not_a_module() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("ot.wasm"), "(module)")?;

    let capability = WasmtimeCapability::try_new().unwrap();
    let fetcher = FileFetcher::new();
    let location = ResourceLocation::resolve(temp_dir.path().to_str().unwrap(), "ot.wasm")?;
    let loader = ModuleLoader::new(&capability, &fetcher, location);

    let result = loader.load_and_run().await;
    assert!(matches!(result, Err(LoaderError::ModuleLoadFailure { .. })));
    Ok(())
}

#[tokio::test]
async fn test_module_with_imports_fails_to_instantiate() -> Result<()> {
    // (module (import "env" "f" (func)))
    let module: &[u8] = &[
        0x00, 0x61, 0x73, 0x6d, 0x01, 0x00, 0x00, 0x00, // header
        0x01, 0x04, 0x01, 0x60, 0x00, 0x00, // type: () -> ()
        0x02, 0x09, 0x01, 0x03, 0x65, 0x6e, 0x76, 0x01, 0x66, 0x00, 0x00, // import env.f
    ];
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("ot.wasm"), module)?;

    let capability = WasmtimeCapability::try_new().unwrap();
    let fetcher = FileFetcher::new();
    let location = ResourceLocation::resolve(temp_dir.path().to_str().unwrap(), "ot.wasm")?;
    let loader = ModuleLoader::new(&capability, &fetcher, location);

    match loader.load_and_run().await {
        Err(LoaderError::ModuleLoadFailure { message }) => {
            assert!(message.contains("instantiation"))
        }
        other => panic!("expected ModuleLoadFailure, got {:?}", other),
    }
    Ok(())
}
