use crate::core::error::{BootError, BootResult};
use crate::core::maven::DependencySpec;

/// Fixed path of the patch metadata record inside a patched archive.
pub const META_PATH: &str = "META-INF/jarstrap/meta.txt";

/// The persisted patch record: three fields in fixed order, newline
/// separated. No versioning field; format changes are breaking.
///
/// ```text
/// App.Main
/// controls:17.0.1;graphics:17.0.1
/// lib
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchMeta {
    pub entry_point: String,
    pub dependencies: Vec<DependencySpec>,
    pub lib_directory: String,
}

impl PatchMeta {
    pub fn render(&self) -> String {
        format!(
            "{}\n{}\n{}",
            self.entry_point,
            self.dependencies
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(";"),
            self.lib_directory
        )
    }

    pub fn parse(text: &str) -> BootResult<Self> {
        let lines: Vec<&str> = text.split('\n').collect();
        if lines.len() < 3 {
            return Err(BootError::MetadataMissing(format!(
                "expected 3 lines, got {}",
                lines.len()
            )));
        }

        let entry_point = lines[0].trim();
        if entry_point.is_empty() {
            return Err(BootError::MetadataMissing(
                "empty entry-point designator".to_string(),
            ));
        }

        let mut dependencies = Vec::new();
        for pair in lines[1].split(';') {
            let (name, version) = pair.split_once(':').ok_or_else(|| {
                BootError::MetadataMissing(format!("malformed dependency pair '{}'", pair))
            })?;
            dependencies.push(DependencySpec::new(name, version));
        }

        Ok(Self {
            entry_point: entry_point.to_string(),
            dependencies,
            lib_directory: lines[2].trim().to_string(),
        })
    }
}
