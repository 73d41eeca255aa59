use crate::core::{ModuleResponse, ResourceFetcher, ResourceLocation};
use crate::utils::error::{LoaderError, Result};
use futures::{stream, StreamExt};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

const DEFAULT_CHUNK_SIZE: usize = 16 * 1024;

/// Streams a module from the local filesystem.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    chunk_size: usize,
}

impl FileFetcher {
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }
}

impl Default for FileFetcher {
    fn default() -> Self {
        Self::new()
    }
}

async fn read_chunk(
    mut file: File,
    chunk_size: usize,
    resource: String,
) -> Result<Option<(Vec<u8>, File)>> {
    let mut buf = vec![0u8; chunk_size];
    let n = file
        .read(&mut buf)
        .await
        .map_err(|e| LoaderError::fetch_failure(resource, e.to_string()))?;
    if n == 0 {
        return Ok(None);
    }
    buf.truncate(n);
    Ok(Some((buf, file)))
}

impl ResourceFetcher for FileFetcher {
    async fn fetch(&self, location: &ResourceLocation) -> Result<ModuleResponse> {
        let ResourceLocation::File(path) = location else {
            return Err(LoaderError::ConfigError {
                message: format!("File fetcher cannot load remote resource {}", location),
            });
        };
        let resource = path.display().to_string();

        tracing::debug!("Opening module file: {}", resource);
        let file = File::open(path)
            .await
            .map_err(|e| LoaderError::fetch_failure(resource.clone(), e.to_string()))?;

        // 目錄在 Linux 上 open 得起來，要到 read 才會失敗
        let metadata = file
            .metadata()
            .await
            .map_err(|e| LoaderError::fetch_failure(resource.clone(), e.to_string()))?;
        if !metadata.is_file() {
            return Err(LoaderError::fetch_failure(resource, "not a regular file"));
        }

        let chunk_size = self.chunk_size;
        let body_resource = resource.clone();
        let body = stream::try_unfold(file, move |file| {
            read_chunk(file, chunk_size, body_resource.clone())
        })
        .boxed();

        Ok(ModuleResponse::new(resource, None, body))
    }
}
