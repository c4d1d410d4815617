mod artifact;

pub use artifact::{Artifact, DependencySpec};

/// Default repository the bootstrap downloads native artifacts from.
pub const MAVEN_CENTRAL: &str = "https://repo1.maven.org/maven2";

/// Default dependency group the patcher filters for.
pub const DEFAULT_GROUP: &str = "org.openjfx";
