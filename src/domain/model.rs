use crate::utils::error::{LoaderError, Result};
use futures::stream::BoxStream;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Chunks of a module body as they arrive from the fetcher.
pub type ByteStream = BoxStream<'static, Result<Vec<u8>>>;

/// Where the module bytes live, relative to the hosting location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceLocation {
    File(PathBuf),
    Url(Url),
}

impl ResourceLocation {
    /// 以 base 解析相對路徑：http(s) 用 URL join，其餘視為本機目錄
    pub fn resolve(base: &str, path: &str) -> Result<Self> {
        match Self::url_base(base) {
            Some(base_url) if matches!(base_url.scheme(), "http" | "https") => {
                Self::resolve_url(base_url, path)
            }
            _ => Ok(ResourceLocation::File(Path::new(base).join(path))),
        }
    }

    /// Parses `base` as an absolute URL, or `None` when it reads as a filesystem path.
    pub fn url_base(base: &str) -> Option<Url> {
        // 單一字母的 scheme 是 Windows 磁碟代號 (C:\dist)
        Url::parse(base).ok().filter(|url| url.scheme().len() > 1)
    }

    fn resolve_url(mut base_url: Url, path: &str) -> Result<Self> {
        // "https://host/app" 與 "https://host/app/" 都視為目錄
        if !base_url.path().ends_with('/') {
            let dir = format!("{}/", base_url.path());
            base_url.set_path(&dir);
        }

        base_url
            .join(path)
            .map(ResourceLocation::Url)
            .map_err(|e| LoaderError::InvalidConfigValueError {
                field: "module_path".to_string(),
                value: path.to_string(),
                reason: format!("Cannot resolve against {}: {}", base_url, e),
            })
    }
}

impl fmt::Display for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceLocation::File(path) => write!(f, "{}", path.display()),
            ResourceLocation::Url(url) => write!(f, "{}", url),
        }
    }
}

/// A fetched but not yet consumed module resource.
pub struct ModuleResponse {
    pub location: String,
    pub content_type: Option<String>,
    pub body: ByteStream,
}

impl ModuleResponse {
    pub fn new(location: impl Into<String>, content_type: Option<String>, body: ByteStream) -> Self {
        Self {
            location: location.into(),
            content_type,
            body,
        }
    }
}

impl fmt::Debug for ModuleResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleResponse")
            .field("location", &self.location)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// The `{module, instance}` pair produced by streaming instantiation.
#[derive(Debug)]
pub struct Instantiated<M, I> {
    pub module: M,
    pub instance: I,
}

/// Which way the run goes, decided once from the probe verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Supported,
    Unsupported,
}

impl From<bool> for Branch {
    fn from(verdict: bool) -> Self {
        if verdict {
            Branch::Supported
        } else {
            Branch::Unsupported
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFunctionResult {
    pub export: String,
    pub argument: i32,
    pub value: i32,
}

impl ExportedFunctionResult {
    pub fn message(&self) -> String {
        format!("{} + 1 = {}", self.argument, self.value)
    }
}

/// Terminal state of one run.
#[derive(Debug)]
pub enum RunOutcome {
    Succeeded(ExportedFunctionResult),
    Failed(LoaderError),
    Unsupported,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Succeeded(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_to_directory() {
        let location = ResourceLocation::resolve("./dist", "ot.wasm").unwrap();
        assert_eq!(location, ResourceLocation::File(PathBuf::from("./dist/ot.wasm")));
    }

    #[test]
    fn test_resolve_relative_to_url() {
        let location = ResourceLocation::resolve("https://example.com/demo/", "ot.wasm").unwrap();
        assert_eq!(location.to_string(), "https://example.com/demo/ot.wasm");
    }

    #[test]
    fn test_resolve_url_without_trailing_slash() {
        let location = ResourceLocation::resolve("http://localhost:8080/demo", "ot.wasm").unwrap();
        assert_eq!(location.to_string(), "http://localhost:8080/demo/ot.wasm");

        let root = ResourceLocation::resolve("http://localhost:8080", "ot.wasm").unwrap();
        assert_eq!(root.to_string(), "http://localhost:8080/ot.wasm");
    }

    #[test]
    fn test_url_base_detection() {
        assert!(ResourceLocation::url_base("https://example.com/demo/").is_some());
        assert!(ResourceLocation::url_base("ftp://example.com").is_some());
        assert!(ResourceLocation::url_base("./dist").is_none());
        assert!(ResourceLocation::url_base("dist").is_none());
        assert!(ResourceLocation::url_base("C:\\dist").is_none());
    }

    #[test]
    fn test_single_slash_http_base_is_still_a_url() {
        let location = ResourceLocation::resolve("http:/localhost/demo", "ot.wasm").unwrap();
        assert_eq!(location.to_string(), "http://localhost/demo/ot.wasm");
    }

    #[test]
    fn test_branch_from_verdict() {
        assert_eq!(Branch::from(true), Branch::Supported);
        assert_eq!(Branch::from(false), Branch::Unsupported);
    }

    #[test]
    fn test_result_message() {
        let result = ExportedFunctionResult {
            export: "add_one".to_string(),
            argument: 2,
            value: 3,
        };
        assert_eq!(result.message(), "2 + 1 = 3");
    }
}
