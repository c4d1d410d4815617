use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::error::{BootError, BootResult};
use crate::core::maven::DependencySpec;

/// Dependency declarations handed over by the invoking build pipeline,
/// persisted as JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectManifest {
    #[serde(default)]
    pub dependencies: Vec<ProjectDependency>,
}

impl ProjectManifest {
    pub fn load(path: &Path) -> BootResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| BootError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// One declared dependency as the build pipeline sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDependency {
    pub group: String,
    pub name: String,
    pub version: String,
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(default)]
    pub classifier: Option<String>,
}

fn default_scope() -> String {
    "compile".to_string()
}

/// Keep the declarations the bootstrap must fetch at runtime: the expected
/// group, scoped `provided`, no classifier of their own, and a concrete
/// version. Violations are skipped with a warning, never a hard error.
pub fn filter_dependencies(
    dependencies: &[ProjectDependency],
    group: &str,
) -> Vec<DependencySpec> {
    dependencies
        .iter()
        .filter(|d| d.group.eq_ignore_ascii_case(group))
        .filter(|d| {
            if !d.scope.eq_ignore_ascii_case("provided") {
                warn!(
                    "Every '{}' dependency's scope should be set to 'provided'. Ignoring artifact '{}'",
                    group, d.name
                );
                return false;
            }

            if let Some(classifier) = d.classifier.as_deref() {
                if !classifier.is_empty() {
                    warn!(
                        "Ignoring artifact '{}' with non-empty classifier '{}'",
                        d.name, classifier
                    );
                    return false;
                }
            }

            if d.version.eq_ignore_ascii_case("latest") {
                warn!(
                    "Ignoring artifact '{}'. Version 'latest' is not supported",
                    d.name
                );
                return false;
            }

            true
        })
        .map(|d| DependencySpec::new(&d.name, &d.version))
        .collect()
}
