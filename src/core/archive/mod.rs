// ─── Archive Access ───
// Treats a JAR as an addressable container of byte blobs plus the
// distinguished manifest record. Editing is decompress-edit-recompress.

mod manifest;

pub use manifest::{JarManifest, MAIN_CLASS_ATTR, MANIFEST_PATH};

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::core::error::{BootError, BootResult};

/// In-memory image of a zip container, preserving entry order.
#[derive(Debug, Default)]
pub struct ArchiveContents {
    entries: Vec<(String, Vec<u8>)>,
}

impl ArchiveContents {
    /// Read every file entry of the archive at `path` into memory.
    /// Directory entries are dropped; they are implicit in a zip.
    pub fn read_from(path: &Path) -> BootResult<Self> {
        let file = File::open(path).map_err(|e| BootError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut archive = ZipArchive::new(file)?;

        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            let mut bytes = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut bytes).map_err(|e| BootError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
            entries.push((name, bytes));
        }

        Ok(Self { entries })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, bytes)| bytes.as_slice())
    }

    /// Insert or replace an entry, keeping the original position on replace.
    pub fn put(&mut self, name: &str, bytes: Vec<u8>) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = bytes,
            None => self.entries.push((name.to_string(), bytes)),
        }
    }

    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the image back out as a zip, overwriting `path`.
    pub fn write_to(&self, path: &Path) -> BootResult<()> {
        let file = File::create(path).map_err(|e| BootError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut writer = ZipWriter::new(file);
        let options = SimpleFileOptions::default();

        for (name, bytes) in &self.entries {
            writer.start_file(name.as_str(), options)?;
            writer.write_all(bytes).map_err(|e| BootError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
        writer.finish()?;
        Ok(())
    }
}

/// Read a single named entry from the archive at `path`.
///
/// Returns `Ok(None)` when the entry does not exist; any other failure is an
/// error.
pub fn read_entry(path: &Path, name: &str) -> BootResult<Option<Vec<u8>>> {
    let file = File::open(path).map_err(|e| BootError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut archive = ZipArchive::new(file)?;

    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut bytes = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut bytes).map_err(|e| BootError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(Some(bytes))
}
