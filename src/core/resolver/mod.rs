// ─── Dependency Resolver ───
// Downloads platform-neutral and platform-specific artifacts into the lib
// directory cache, returning the ordered file locations for the loader.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::core::error::{BootError, BootResult};
use crate::core::http::build_http_client;
use crate::core::maven::DependencySpec;

/// Outcome of fetching one URL.
#[derive(Debug)]
pub enum FetchOutcome {
    Payload(Vec<u8>),
    NotFound,
}

/// Network seam. The production implementation wraps `reqwest`; tests
/// substitute a stub.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> BootResult<FetchOutcome>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> BootResult<Self> {
        Ok(Self {
            client: build_http_client()?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> BootResult<FetchOutcome> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(FetchOutcome::NotFound);
        }
        if !status.is_success() {
            return Err(BootError::FetchFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(FetchOutcome::Payload(response.bytes().await?.to_vec()))
    }
}

/// Map the running host to its classifier token.
///
/// Hard-coded binary choice: Windows-family hosts get `win`, everything else
/// falls back to `linux`.
pub fn platform_classifier() -> &'static str {
    if cfg!(target_os = "windows") {
        "win"
    } else {
        "linux"
    }
}

/// Resolves dependency descriptors to local file locations, downloading
/// whatever the cache does not already hold.
pub struct NativeResolver {
    repo_base: String,
    group: String,
}

impl NativeResolver {
    pub fn new(repo_base: &str, group: &str) -> Self {
        Self {
            repo_base: repo_base.to_string(),
            group: group.to_string(),
        }
    }

    /// Resolve every descriptor in order, downloading cache misses.
    ///
    /// For each dependency the neutral artifact's location always precedes
    /// its platform variant. A missing neutral artifact is fatal; a 404 on
    /// the platform variant means the dependency ships no native code for
    /// this host and the variant is skipped. No retries anywhere: the first
    /// failed fetch aborts the whole resolution.
    pub async fn resolve_all(
        &self,
        dependencies: &[DependencySpec],
        lib_dir: &Path,
        fetcher: &dyn Fetcher,
    ) -> BootResult<Vec<PathBuf>> {
        tokio::fs::create_dir_all(lib_dir)
            .await
            .map_err(|e| BootError::Io {
                path: lib_dir.to_path_buf(),
                source: e,
            })?;

        let classifier = platform_classifier();
        let mut locations = Vec::new();

        for dependency in dependencies {
            info!("Resolving {}", dependency);

            // Neutral artifact: always part of the result, fatal if
            // unavailable.
            let neutral = dependency.neutral_artifact();
            let dest = lib_dir.join(neutral.cache_file_name());
            locations.push(dest.clone());
            if !dest.exists() {
                let url = neutral.url(&self.repo_base, &self.group);
                match fetcher.fetch(&url).await? {
                    FetchOutcome::Payload(bytes) => {
                        persist(&dest, &bytes).await?;
                        debug!("Downloaded {} -> {:?}", url, dest);
                    }
                    FetchOutcome::NotFound => {
                        return Err(BootError::FetchFailed { url, status: 404 });
                    }
                }
            }

            // Platform variant: optional, cached file wins outright.
            let native = dependency.native_artifact(classifier);
            let dest = lib_dir.join(native.cache_file_name());
            if dest.exists() {
                locations.push(dest);
                continue;
            }
            let url = native.url(&self.repo_base, &self.group);
            match fetcher.fetch(&url).await? {
                FetchOutcome::Payload(bytes) => {
                    persist(&dest, &bytes).await?;
                    debug!("Downloaded {} -> {:?}", url, dest);
                    locations.push(dest);
                }
                FetchOutcome::NotFound => {
                    debug!(
                        "{} ships no platform-specific code for '{}'",
                        dependency, classifier
                    );
                }
            }
        }

        Ok(locations)
    }
}

/// Write bytes under a `.part` name, then rename over the final path, so a
/// partial file is never visible under the cache name.
async fn persist(dest: &Path, bytes: &[u8]) -> BootResult<()> {
    let mut part_name = OsString::from(dest.as_os_str());
    part_name.push(".part");
    let part = PathBuf::from(part_name);

    tokio::fs::write(&part, bytes)
        .await
        .map_err(|e| BootError::Io {
            path: part.clone(),
            source: e,
        })?;
    tokio::fs::rename(&part, dest)
        .await
        .map_err(|e| BootError::Io {
            path: dest.to_path_buf(),
            source: e,
        })?;
    Ok(())
}
