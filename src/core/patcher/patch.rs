// ─── Archive Patcher ───
// Build-time surgery: rewrite the manifest entry point, record patch
// metadata, and inject the bootstrap payload. All work happens on a scratch
// copy that replaces the original only once every step has succeeded.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::core::archive::{ArchiveContents, JarManifest, MAIN_CLASS_ATTR, MANIFEST_PATH};
use crate::core::bootstrap::{PatchMeta, META_PATH};
use crate::core::error::{BootError, BootResult};
use crate::core::patcher::project::{filter_dependencies, ProjectManifest};

/// Entry-point designator written into every patched archive.
pub const LAUNCHER_MAIN_CLASS: &str = "io.jarstrap.launcher.BootstrapLauncher";

/// Namespace of the bootstrap payload inside the tool's own archive.
pub const PAYLOAD_PREFIX: &str = "io/jarstrap/";

#[derive(Debug, Clone)]
pub struct PatchConfig {
    /// The built archive to patch in place.
    pub build_file: PathBuf,
    /// Scratch copy the surgery happens on.
    pub temp_file: PathBuf,
    /// The running tool's own archive, source of the bootstrap payload.
    pub payload_archive: PathBuf,
    /// Relative directory name the bootstrap downloads into.
    pub lib_directory: String,
    /// Dependency group whose declarations are bootstrapped.
    pub group: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// No qualifying dependencies; the archive was left untouched.
    Skipped,
    /// Manifest rewritten, metadata recorded, payload injected.
    Patched,
    /// Metadata already present from an earlier run; manifest rewritten,
    /// payload injection skipped.
    Repatched,
}

/// Patch the archive at `config.build_file`.
///
/// All-or-nothing from the caller's perspective: any failure leaves the
/// original archive unpatched, with the scratch file kept for inspection.
pub fn patch(config: &PatchConfig, project: &ProjectManifest) -> BootResult<PatchOutcome> {
    info!("Patching archive: {:?}", config.build_file);
    info!("Scratch file: {:?}", config.temp_file);

    if !config.build_file.exists() {
        return Err(BootError::MissingArtifact(config.build_file.clone()));
    }

    std::fs::copy(&config.build_file, &config.temp_file).map_err(|e| BootError::CopyFailed {
        path: config.temp_file.clone(),
        source: e,
    })?;

    let mut contents = ArchiveContents::read_from(&config.temp_file)
        .map_err(|e| BootError::PatchFailed(format!("cannot read scratch archive: {}", e)))?;
    let mut payload = PayloadSource::open(&config.payload_archive)?;

    let manifest_bytes = contents.get(MANIFEST_PATH).ok_or_else(|| {
        BootError::PatchFailed(format!("archive has no {} entry", MANIFEST_PATH))
    })?;
    let manifest_text = String::from_utf8(manifest_bytes.to_vec())
        .map_err(|e| BootError::PatchFailed(format!("manifest is not UTF-8: {}", e)))?;
    let mut manifest = JarManifest::parse(&manifest_text);

    let original_entry_point = manifest
        .get(MAIN_CLASS_ATTR)
        .ok_or_else(|| {
            BootError::PatchFailed(format!("manifest has no {} attribute", MAIN_CLASS_ATTR))
        })?
        .to_string();
    info!("Original entry point: {}", original_entry_point);

    let dependencies = filter_dependencies(&project.dependencies, &config.group);
    if dependencies.is_empty() {
        warn!(
            "No '{}' dependencies with scope 'provided' found. Not doing anything",
            config.group
        );
        return Ok(PatchOutcome::Skipped);
    }
    info!(
        "Bootstrap dependencies: {}",
        dependencies
            .iter()
            .map(|d| d.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    info!("Lib directory: {}", config.lib_directory);

    // The entry-point rewrite runs on every patch, even when the payload
    // injection below is skipped for idempotency.
    manifest.set(MAIN_CLASS_ATTR, LAUNCHER_MAIN_CLASS);
    contents.put(MANIFEST_PATH, manifest.render().into_bytes());

    let outcome = if contents.contains(META_PATH) {
        info!("Archive appears to be patched already, not writing meta file");
        PatchOutcome::Repatched
    } else {
        let meta = PatchMeta {
            entry_point: original_entry_point,
            dependencies,
            lib_directory: config.lib_directory.clone(),
        };
        contents.put(META_PATH, meta.render().into_bytes());

        let copied = payload.copy_into(&mut contents)?;
        info!("Injected {} bootstrap payload files", copied);
        PatchOutcome::Patched
    };

    contents
        .write_to(&config.temp_file)
        .map_err(|e| BootError::PatchFailed(format!("cannot write scratch archive: {}", e)))?;

    std::fs::rename(&config.temp_file, &config.build_file).map_err(|e| BootError::MoveFailed {
        from: config.temp_file.clone(),
        to: config.build_file.clone(),
        source: e,
    })?;

    info!("Patched archive written to {:?}", config.build_file);
    Ok(outcome)
}

/// The tool's own archive, opened once and drained during payload injection.
struct PayloadSource {
    path: PathBuf,
    archive: ZipArchive<File>,
}

impl PayloadSource {
    fn open(path: &std::path::Path) -> BootResult<Self> {
        let file = File::open(path)
            .map_err(|e| BootError::PatchFailed(format!("cannot open payload archive {:?}: {}", path, e)))?;
        let archive = ZipArchive::new(file)
            .map_err(|e| BootError::PatchFailed(format!("cannot read payload archive {:?}: {}", path, e)))?;
        Ok(Self {
            path: path.to_path_buf(),
            archive,
        })
    }

    /// Copy every payload-namespace file into the target image, preserving
    /// relative paths and overwriting existing entries.
    fn copy_into(&mut self, contents: &mut ArchiveContents) -> BootResult<usize> {
        let names: Vec<String> = self
            .archive
            .file_names()
            .filter(|name| name.starts_with(PAYLOAD_PREFIX))
            .map(str::to_string)
            .collect();

        let mut copied = 0;
        for name in names {
            let mut entry =
                self.archive
                    .by_name(&name)
                    .map_err(|e| BootError::PayloadCopyFailed {
                        entry: name.clone(),
                        reason: e.to_string(),
                    })?;
            if entry.is_dir() {
                continue;
            }

            let mut bytes = Vec::with_capacity(entry.size() as usize);
            entry
                .read_to_end(&mut bytes)
                .map_err(|e| BootError::PayloadCopyFailed {
                    entry: name.clone(),
                    reason: e.to_string(),
                })?;

            debug!("Copying {} from {:?}", name, self.path);
            contents.put(&name, bytes);
            copied += 1;
        }

        Ok(copied)
    }
}
