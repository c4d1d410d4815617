// ─── Delegating Class Resolution ───
// Two-tier lookup: a leaf node over the bootstrap-assembled locations with a
// parent over the ambient path. Reserved bootstrap namespaces always resolve
// via the parent so the machinery's own types are never shadowed or
// duplicated inside the application's graph.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::core::error::{BootError, BootResult};

/// Name prefixes owned by the bootstrap machinery itself.
pub const RESERVED_PREFIXES: [&str; 2] = ["io.jarstrap.loader", "io.jarstrap.launcher"];

/// Environment variable enabling per-resolution tracing.
pub const DEBUG_ENV_VAR: &str = "JARSTRAP_DEBUG_LOADER";

/// Which tier a name must be resolved by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Local,
    Parent,
}

/// A type resolved to its defining bytes and the location that supplied them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedClass {
    pub name: String,
    pub bytes: Vec<u8>,
    pub origin: PathBuf,
}

/// The ambient parent tier: a plain location-set lookup with no delegation.
#[derive(Debug)]
pub struct SystemLoader {
    locations: Vec<PathBuf>,
}

impl SystemLoader {
    pub fn new(locations: Vec<PathBuf>) -> Self {
        Self { locations }
    }

    pub fn find(&self, name: &str) -> Option<LoadedClass> {
        find_in_locations(&self.locations, name)
    }
}

/// The leaf tier. Sees only the locations supplied at construction; anything
/// it cannot find falls back to the parent, except reserved names which skip
/// the local set entirely.
pub struct DelegatingLoader {
    locations: Vec<PathBuf>,
    parent: SystemLoader,
    debug: bool,
}

impl DelegatingLoader {
    /// The debug flag is read from the environment exactly once, here.
    pub fn new(locations: Vec<PathBuf>, parent: SystemLoader) -> Self {
        Self {
            locations,
            parent,
            debug: std::env::var_os(DEBUG_ENV_VAR).is_some(),
        }
    }

    /// The ordered local location set, archive first.
    pub fn locations(&self) -> &[PathBuf] {
        &self.locations
    }

    /// Routing decision for one name, driven by the static prefix table.
    pub fn route(name: &str) -> Route {
        if RESERVED_PREFIXES
            .iter()
            .any(|prefix| name.starts_with(prefix))
        {
            Route::Parent
        } else {
            Route::Local
        }
    }

    /// Resolve a fully-qualified type name.
    ///
    /// Reserved names go straight to the parent. Everything else tries the
    /// local set first and falls back to the parent on a miss, so application
    /// types can shadow ambient ones while bootstrap types never can.
    pub fn load(&self, name: &str) -> BootResult<LoadedClass> {
        if Self::route(name) == Route::Parent {
            if self.debug {
                debug!("{} -> reserved, delegating to parent", name);
            }
            return self
                .parent
                .find(name)
                .ok_or_else(|| BootError::TypeResolutionFailed(name.to_string()));
        }

        if let Some(loaded) = find_in_locations(&self.locations, name) {
            if self.debug {
                debug!("{} -> found locally in {:?}", name, loaded.origin);
            }
            return Ok(loaded);
        }

        match self.parent.find(name) {
            Some(loaded) => {
                if self.debug {
                    debug!("{} -> delegated to parent, {:?}", name, loaded.origin);
                }
                Ok(loaded)
            }
            None => {
                if self.debug {
                    debug!("{} -> not found in either tier", name);
                }
                Err(BootError::TypeResolutionFailed(name.to_string()))
            }
        }
    }
}

/// `a.b.C` maps to the archive entry `a/b/C.class`.
fn class_entry_path(name: &str) -> String {
    format!("{}.class", name.replace('.', "/"))
}

fn find_in_locations(locations: &[PathBuf], name: &str) -> Option<LoadedClass> {
    let entry = class_entry_path(name);
    locations.iter().find_map(|location| {
        find_in_location(location, &entry).map(|bytes| LoadedClass {
            name: name.to_string(),
            bytes,
            origin: location.clone(),
        })
    })
}

/// Look one location up. An unreadable location counts as a miss so a single
/// stale path cannot take down the whole lookup chain.
fn find_in_location(location: &Path, entry: &str) -> Option<Vec<u8>> {
    if location.is_dir() {
        return std::fs::read(location.join(entry)).ok();
    }

    let file = File::open(location).ok()?;
    let mut archive = match ZipArchive::new(file) {
        Ok(archive) => archive,
        Err(e) => {
            debug!("Cannot open location {:?}: {}", location, e);
            return None;
        }
    };

    let mut zip_entry = match archive.by_name(entry) {
        Ok(zip_entry) => zip_entry,
        Err(ZipError::FileNotFound) => return None,
        Err(e) => {
            debug!("Cannot read {:?} from {:?}: {}", entry, location, e);
            return None;
        }
    };

    let mut bytes = Vec::with_capacity(zip_entry.size() as usize);
    zip_entry.read_to_end(&mut bytes).ok()?;
    Some(bytes)
}
