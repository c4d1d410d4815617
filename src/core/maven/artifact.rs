use std::fmt;

/// A fetchable artifact variant: name, version, and an optional platform
/// classifier.
///
/// A missing classifier denotes the platform-neutral artifact; the
/// platform-specific companion shares name and version and adds the
/// classifier token to the filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Artifact {
    pub name: String,
    pub version: String,
    pub classifier: Option<String>,
}

impl Artifact {
    pub fn new(name: &str, version: &str, classifier: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            classifier: classifier.map(str::to_string),
        }
    }

    /// Repository filename: `name-version[-classifier].jar`.
    pub fn file_name(&self) -> String {
        match &self.classifier {
            Some(c) => format!("{}-{}-{}.jar", self.name, self.version, c),
            None => format!("{}-{}.jar", self.name, self.version),
        }
    }

    /// Local cache filename: `name[-classifier].jar`.
    ///
    /// The cache layout is flat and versionless; file presence is the sole
    /// cache-hit signal.
    pub fn cache_file_name(&self) -> String {
        match &self.classifier {
            Some(c) => format!("{}-{}.jar", self.name, c),
            None => format!("{}.jar", self.name),
        }
    }

    /// Full download URL under the given repository base and group:
    /// `<repo>/<group_path>/<name>/<version>/<file_name>`.
    pub fn url(&self, repo_base: &str, group: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            repo_base.trim_end_matches('/'),
            group.replace('.', "/"),
            self.name,
            self.version,
            self.file_name()
        )
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.classifier {
            Some(c) => write!(f, "{}:{}:{}", self.name, self.version, c),
            None => write!(f, "{}:{}", self.name, self.version),
        }
    }
}

/// One `name:version` entry of the recorded dependency list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySpec {
    pub name: String,
    pub version: String,
}

impl DependencySpec {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
        }
    }

    /// The platform-neutral artifact for this dependency.
    pub fn neutral_artifact(&self) -> Artifact {
        Artifact::new(&self.name, &self.version, None)
    }

    /// The platform-specific companion artifact.
    pub fn native_artifact(&self, classifier: &str) -> Artifact {
        Artifact::new(&self.name, &self.version, Some(classifier))
    }
}

impl fmt::Display for DependencySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.version)
    }
}
