#![allow(dead_code)]

use ot_wasm_load::core::{ModuleResponse, Notifier, ResourceFetcher, ResourceLocation};
use ot_wasm_load::{DefaultFetcher, LoaderError, Result};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

pub fn add_one_module() -> Vec<u8> {
    std::fs::read(fixture_dir().join("ot.wasm")).unwrap()
}

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Counts fetches and forwards them to the real fetchers.
#[derive(Default)]
pub struct CountingFetcher {
    inner: DefaultFetcher,
    calls: AtomicUsize,
}

impl CountingFetcher {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ResourceFetcher for CountingFetcher {
    async fn fetch(&self, location: &ResourceLocation) -> Result<ModuleResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch(location).await
    }
}

/// Simulates a network that is down.
#[derive(Default)]
pub struct UnreachableFetcher;

impl ResourceFetcher for UnreachableFetcher {
    async fn fetch(&self, location: &ResourceLocation) -> Result<ModuleResponse> {
        Err(LoaderError::fetch_failure(
            location.to_string(),
            "connection refused",
        ))
    }
}
