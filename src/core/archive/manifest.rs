use std::fmt::Write as _;

/// Fixed path of the metadata record inside a JAR.
pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// The attribute naming which type's entry method starts the program.
pub const MAIN_CLASS_ATTR: &str = "Main-Class";

/// The main-attributes section of a JAR manifest, as an ordered list of
/// key-value pairs.
///
/// Only the surface the patcher needs: parse, look up / overwrite one
/// attribute, render back. Unknown attributes pass through untouched and keep
/// their position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JarManifest {
    attributes: Vec<(String, String)>,
}

impl JarManifest {
    /// Parse manifest text. Continuation lines (leading space) are folded
    /// into the preceding attribute value per the JAR spec.
    pub fn parse(text: &str) -> Self {
        let mut attributes: Vec<(String, String)> = Vec::new();

        for line in text.lines() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                continue;
            }

            if let Some(continuation) = line.strip_prefix(' ') {
                if let Some((_, value)) = attributes.last_mut() {
                    value.push_str(continuation);
                }
                continue;
            }

            if let Some((key, value)) = line.split_once(':') {
                attributes.push((key.trim().to_string(), value.trim().to_string()));
            }
        }

        Self { attributes }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Overwrite an attribute, or append it when absent.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.attributes.push((key.to_string(), value.to_string())),
        }
    }

    /// Render back to manifest text, CRLF line endings and a trailing blank
    /// line as `java.util.jar.Manifest` writes them.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.attributes {
            let _ = write!(out, "{}: {}\r\n", key, value);
        }
        out.push_str("\r\n");
        out
    }
}
