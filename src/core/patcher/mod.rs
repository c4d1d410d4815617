mod patch;
mod project;

pub use patch::{patch, PatchConfig, PatchOutcome, LAUNCHER_MAIN_CLASS, PAYLOAD_PREFIX};
pub use project::{filter_dependencies, ProjectDependency, ProjectManifest};
