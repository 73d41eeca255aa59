use crate::core::{ModuleResponse, ResourceFetcher, ResourceLocation};
use crate::utils::error::{LoaderError, Result};
use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl ResourceFetcher for HttpFetcher {
    async fn fetch(&self, location: &ResourceLocation) -> Result<ModuleResponse> {
        let ResourceLocation::Url(url) = location else {
            return Err(LoaderError::ConfigError {
                message: format!("HTTP fetcher cannot load local path {}", location),
            });
        };

        tracing::debug!("Making HTTP request to: {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| LoaderError::fetch_failure(url.as_str(), e.to_string()))?;

        tracing::debug!("HTTP response status: {}", response.status());
        if !response.status().is_success() {
            return Err(LoaderError::fetch_failure(
                url.as_str(),
                format!("HTTP status {}", response.status()),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        // 交出串流，讓引擎邊收邊處理
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(LoaderError::from))
            .boxed();

        Ok(ModuleResponse::new(url.as_str(), content_type, body))
    }
}
