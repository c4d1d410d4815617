use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jarstrap::core::bootstrap::{self, BootstrapConfig, ProcessInvoker};
use jarstrap::core::maven::{DEFAULT_GROUP, MAVEN_CENTRAL};
use jarstrap::core::patcher::{patch, PatchConfig, PatchOutcome, ProjectManifest};
use jarstrap::core::resolver::HttpFetcher;
use jarstrap::BootResult;

#[derive(Parser)]
#[command(name = "jarstrap", version, about = "Retrofit built JARs to bootstrap platform-native dependencies at first run")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Patch a built archive: rewrite its entry point and inject the
    /// bootstrap payload (build time, run once per artifact).
    Patch {
        /// The built archive to patch in place.
        #[arg(long)]
        build_file: PathBuf,
        /// Scratch file used while patching.
        #[arg(long)]
        temp_file: PathBuf,
        /// Archive containing the bootstrap payload files.
        #[arg(long)]
        payload: PathBuf,
        /// JSON file with the project's dependency declarations.
        #[arg(long)]
        project: PathBuf,
        /// Directory name the bootstrap downloads native artifacts into.
        #[arg(long, default_value = "lib")]
        lib_dir: String,
        /// Dependency group to bootstrap.
        #[arg(long, default_value = DEFAULT_GROUP)]
        group: String,
    },
    /// Bootstrap a patched archive: download its native dependencies and
    /// invoke the original entry point with the given arguments.
    Run {
        /// The patched archive to execute.
        #[arg(long)]
        archive: PathBuf,
        /// Repository base URL for native artifact downloads.
        #[arg(long, default_value = MAVEN_CENTRAL)]
        repo: String,
        /// Group path segment of the download URL.
        #[arg(long, default_value = DEFAULT_GROUP)]
        group: String,
        /// Arguments passed to the application unmodified.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,jarstrap=debug")),
        )
        .init();

    let cli = Cli::parse();
    match execute(cli.command).await {
        Ok(status) => ExitCode::from(status.clamp(0, 255) as u8),
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn execute(command: Command) -> BootResult<i32> {
    match command {
        Command::Patch {
            build_file,
            temp_file,
            payload,
            project,
            lib_dir,
            group,
        } => {
            let manifest = ProjectManifest::load(&project)?;
            let config = PatchConfig {
                build_file,
                temp_file,
                payload_archive: payload,
                lib_directory: lib_dir,
                group,
            };
            match patch(&config, &manifest)? {
                PatchOutcome::Skipped => tracing::info!("Nothing to patch"),
                PatchOutcome::Patched | PatchOutcome::Repatched => tracing::info!("Done!"),
            }
            Ok(0)
        }
        Command::Run {
            archive,
            repo,
            group,
            args,
        } => {
            let fetcher = HttpFetcher::new()?;
            let invoker = ProcessInvoker::default();
            let config = BootstrapConfig {
                archive,
                repo_base: repo,
                group,
                args,
            };
            bootstrap::run(&config, &fetcher, &invoker).await
        }
    }
}
