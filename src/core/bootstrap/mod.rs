// ─── Bootstrap Entry Point ───
// What the patched archive's entry-point designator now names. Reads the
// recorded metadata, resolves native dependencies, builds the delegating
// loader, and hands control to the original application entry point.

mod invoke;
mod meta;

pub use invoke::{get_classpath_separator, EntryInvoker, ProcessInvoker};
pub use meta::{PatchMeta, META_PATH};

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::core::archive;
use crate::core::error::{BootError, BootResult};
use crate::core::loader::{DelegatingLoader, SystemLoader};
use crate::core::resolver::{Fetcher, NativeResolver};

#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// The running patched archive.
    pub archive: PathBuf,
    /// Repository base the native artifacts are fetched from.
    pub repo_base: String,
    /// Group path segment of the download URL template.
    pub group: String,
    /// Original process arguments, passed to the application unmodified.
    pub args: Vec<String>,
}

/// Run the bootstrap against the patched archive.
///
/// Returns the application's own exit status once control has been handed
/// off; everything before that point fails fast with a distinguishing error.
pub async fn run(
    config: &BootstrapConfig,
    fetcher: &dyn Fetcher,
    invoker: &dyn EntryInvoker,
) -> BootResult<i32> {
    let meta = read_meta(&config.archive)?;

    info!("Entry point: {}", meta.entry_point);
    info!(
        "Required dependencies: {}",
        meta.dependencies
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    info!("Lib directory: {}", meta.lib_directory);

    info!("Downloading dependencies...");
    let resolver = NativeResolver::new(&config.repo_base, &config.group);
    let resolved = resolver
        .resolve_all(&meta.dependencies, Path::new(&meta.lib_directory), fetcher)
        .await?;

    // The running archive itself heads the local tier so application classes
    // inside it resolve without delegation.
    let mut locations = vec![config.archive.clone()];
    locations.extend(resolved);

    let parent = SystemLoader::new(vec![config.archive.clone()]);
    let loader = DelegatingLoader::new(locations, parent);

    let entry = loader.load(&meta.entry_point)?;

    // From here on, failures belong to the application, not the bootstrap.
    let status = invoker.invoke(&loader, &entry, &config.args).await?;
    if status != 0 {
        warn!("Application exited with status {}", status);
    }
    Ok(status)
}

/// Read and parse the fixed-path metadata record. Every failure mode
/// (unreadable archive, absent record, malformed content) is fatal:
/// without the record neither the entry point nor the dependency set is
/// known.
fn read_meta(archive_path: &Path) -> BootResult<PatchMeta> {
    let bytes = archive::read_entry(archive_path, META_PATH)
        .map_err(|e| BootError::MetadataMissing(e.to_string()))?
        .ok_or_else(|| {
            BootError::MetadataMissing(format!("{} not found in {:?}", META_PATH, archive_path))
        })?;
    let text = String::from_utf8(bytes)
        .map_err(|e| BootError::MetadataMissing(format!("record is not UTF-8: {}", e)))?;
    PatchMeta::parse(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::archive::{ArchiveContents, MANIFEST_PATH};
    use crate::core::loader::LoadedClass;
    use crate::core::patcher::{patch, PatchConfig, ProjectDependency, ProjectManifest};
    use crate::core::resolver::{platform_classifier, FetchOutcome};
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("bootstrap-test-{}-{}", tag, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Succeeds for neutral artifacts, reports not-found for platform
    /// variants, and records every URL it was asked for.
    struct NeutralOnlyFetcher {
        classifier: &'static str,
        calls: Mutex<Vec<String>>,
    }

    impl NeutralOnlyFetcher {
        fn new() -> Self {
            Self {
                classifier: platform_classifier(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Fetcher for NeutralOnlyFetcher {
        async fn fetch(&self, url: &str) -> BootResult<FetchOutcome> {
            self.calls.lock().unwrap().push(url.to_string());
            if url.ends_with(&format!("-{}.jar", self.classifier)) {
                Ok(FetchOutcome::NotFound)
            } else {
                Ok(FetchOutcome::Payload(b"neutral-bytes".to_vec()))
            }
        }
    }

    /// Records the invocation instead of spawning anything.
    #[derive(Default)]
    struct RecordingInvoker {
        invocations: Mutex<Vec<(String, Vec<PathBuf>, Vec<String>)>>,
    }

    #[async_trait]
    impl EntryInvoker for RecordingInvoker {
        async fn invoke(
            &self,
            loader: &DelegatingLoader,
            entry: &LoadedClass,
            args: &[String],
        ) -> BootResult<i32> {
            self.invocations.lock().unwrap().push((
                entry.name.clone(),
                loader.locations().to_vec(),
                args.to_vec(),
            ));
            Ok(0)
        }
    }

    /// Build an application jar, patch it, and return the patched path.
    fn patched_archive(dir: &Path, lib_dir: &Path) -> PathBuf {
        let build_file = dir.join("app.jar");
        let mut contents = ArchiveContents::default();
        contents.put(
            MANIFEST_PATH,
            b"Manifest-Version: 1.0\r\nMain-Class: App.Main\r\n\r\n".to_vec(),
        );
        contents.put("App/Main.class", b"\xca\xfe\xba\xbe".to_vec());
        contents.write_to(&build_file).unwrap();

        let payload_archive = dir.join("payload.jar");
        let mut payload = ArchiveContents::default();
        payload.put(
            "io/jarstrap/launcher/BootstrapLauncher.class",
            b"launcher-bytes".to_vec(),
        );
        payload.write_to(&payload_archive).unwrap();

        let config = PatchConfig {
            build_file: build_file.clone(),
            temp_file: dir.join("app-patched.jar"),
            payload_archive,
            lib_directory: lib_dir.to_string_lossy().to_string(),
            group: "org.openjfx".to_string(),
        };
        let project = ProjectManifest {
            dependencies: vec![ProjectDependency {
                group: "org.openjfx".to_string(),
                name: "controls".to_string(),
                version: "17.0.1".to_string(),
                scope: "provided".to_string(),
                classifier: None,
            }],
        };
        patch(&config, &project).unwrap();
        build_file
    }

    #[tokio::test]
    async fn bootstraps_a_patched_archive_end_to_end() {
        let dir = scratch_dir("end-to-end");
        let lib_dir = dir.join("lib");
        let archive = patched_archive(&dir, &lib_dir);

        let fetcher = NeutralOnlyFetcher::new();
        let invoker = RecordingInvoker::default();
        let config = BootstrapConfig {
            archive: archive.clone(),
            repo_base: "https://repo.invalid/maven2".to_string(),
            group: "org.openjfx".to_string(),
            args: vec!["--flag".to_string(), "value".to_string()],
        };

        let status = run(&config, &fetcher, &invoker).await.unwrap();
        assert_eq!(status, 0);

        // Exactly one cache file: the neutral artifact; the 404'd platform
        // variant left nothing behind.
        let cached: Vec<_> = std::fs::read_dir(&lib_dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(cached, vec!["controls.jar".to_string()]);

        // One fetch per artifact variant: neutral, then the 404'd native.
        assert_eq!(fetcher.calls.lock().unwrap().len(), 2);

        let invocations = invoker.invocations.lock().unwrap();
        assert_eq!(invocations.len(), 1);
        let (entry, locations, args) = &invocations[0];
        assert_eq!(entry, "App.Main");
        assert_eq!(args, &vec!["--flag".to_string(), "value".to_string()]);
        // Running archive first, then the resolved dependency.
        assert_eq!(
            locations,
            &vec![archive.clone(), lib_dir.join("controls.jar")]
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn unpatched_archive_fails_with_metadata_missing() {
        let dir = scratch_dir("no-meta");
        let archive = dir.join("plain.jar");
        let mut contents = ArchiveContents::default();
        contents.put(
            MANIFEST_PATH,
            b"Manifest-Version: 1.0\r\nMain-Class: App.Main\r\n\r\n".to_vec(),
        );
        contents.write_to(&archive).unwrap();

        let config = BootstrapConfig {
            archive,
            repo_base: "https://repo.invalid/maven2".to_string(),
            group: "org.openjfx".to_string(),
            args: vec![],
        };

        let err = run(&config, &NeutralOnlyFetcher::new(), &RecordingInvoker::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BootError::MetadataMissing(_)));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn malformed_metadata_fails_with_metadata_missing() {
        let dir = scratch_dir("bad-meta");
        let archive = dir.join("bad.jar");
        let mut contents = ArchiveContents::default();
        contents.put(META_PATH, b"App.Main\ncontrols:17.0.1".to_vec());
        contents.write_to(&archive).unwrap();

        let config = BootstrapConfig {
            archive,
            repo_base: "https://repo.invalid/maven2".to_string(),
            group: "org.openjfx".to_string(),
            args: vec![],
        };

        let err = run(&config, &NeutralOnlyFetcher::new(), &RecordingInvoker::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BootError::MetadataMissing(_)));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn entry_point_absent_from_both_tiers_is_a_resolution_failure() {
        let dir = scratch_dir("no-entry");
        let lib_dir = dir.join("lib");
        let archive = dir.join("app.jar");

        // Patched-looking archive whose recorded entry point has no class
        // file anywhere.
        let mut contents = ArchiveContents::default();
        contents.put(
            META_PATH,
            PatchMeta {
                entry_point: "App.Main".to_string(),
                dependencies: vec![crate::core::maven::DependencySpec::new(
                    "controls", "17.0.1",
                )],
                lib_directory: lib_dir.to_string_lossy().to_string(),
            }
            .render()
            .into_bytes(),
        );
        contents.write_to(&archive).unwrap();

        let config = BootstrapConfig {
            archive,
            repo_base: "https://repo.invalid/maven2".to_string(),
            group: "org.openjfx".to_string(),
            args: vec![],
        };

        let err = run(&config, &NeutralOnlyFetcher::new(), &RecordingInvoker::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BootError::TypeResolutionFailed(_)));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
