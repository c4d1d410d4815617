use async_trait::async_trait;
use tracing::{debug, info};

use crate::core::error::{BootError, BootResult};
use crate::core::loader::{DelegatingLoader, LoadedClass};

/// The single reflective seam: hands the resolved entry point the original
/// process arguments. Injected once at bootstrap; tests substitute a
/// recording stub.
#[async_trait]
pub trait EntryInvoker: Send + Sync {
    /// Returns the application's own exit status. An `Err` means the
    /// invocation itself could not be started, which is a bootstrap failure;
    /// a non-zero status is the application's concern, not the bootstrap's.
    async fn invoke(
        &self,
        loader: &DelegatingLoader,
        entry: &LoadedClass,
        args: &[String],
    ) -> BootResult<i32>;
}

/// Platform-specific classpath separator of the host runtime.
pub fn get_classpath_separator() -> &'static str {
    if cfg!(target_os = "windows") {
        ";"
    } else {
        ":"
    }
}

/// Production invoker: materializes the loader's location set as a host
/// `java` invocation and waits for it to finish.
pub struct ProcessInvoker {
    java_binary: std::path::PathBuf,
}

impl ProcessInvoker {
    pub fn new(java_binary: std::path::PathBuf) -> Self {
        Self { java_binary }
    }
}

impl Default for ProcessInvoker {
    fn default() -> Self {
        Self::new(std::path::PathBuf::from("java"))
    }
}

#[async_trait]
impl EntryInvoker for ProcessInvoker {
    async fn invoke(
        &self,
        loader: &DelegatingLoader,
        entry: &LoadedClass,
        args: &[String],
    ) -> BootResult<i32> {
        let classpath = loader
            .locations()
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect::<Vec<_>>()
            .join(get_classpath_separator());

        let mut cmd = tokio::process::Command::new(&self.java_binary);
        cmd.arg("-cp").arg(&classpath).arg(&entry.name).args(args);

        info!("Handing off to {}", entry.name);
        debug!("Classpath: {}", classpath);
        debug!("Command: {:?}", cmd);

        let status = cmd
            .status()
            .await
            .map_err(|e| BootError::Invocation(e.to_string()))?;

        Ok(status.code().unwrap_or(1))
    }
}

#[cfg(test)]
mod tests {
    use super::get_classpath_separator;

    #[test]
    fn separator_matches_host_convention() {
        if cfg!(target_os = "windows") {
            assert_eq!(get_classpath_separator(), ";");
        } else {
            assert_eq!(get_classpath_separator(), ":");
        }
    }
}
