pub mod prompt;

use clap::Parser;
use colored::Colorize;
use std::env;
use std::path::PathBuf;
use std::process::exit;
use std::sync::Arc;
use tracing::Subscriber;
use tracing_subscriber::fmt::{format::FmtSpan, MakeWriter};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::application::use_cases::publish_release::{
    PipelineConfig, ReleasePipeline, DEFAULT_DIST_BRANCH, DEFAULT_DIST_URL, DEFAULT_DOWNLOAD_BASE_URL,
    DEFAULT_LAUNCHER_BRANCH, DEFAULT_LAUNCHER_URL, DEFAULT_PATCHES_DIR,
};
use crate::common::error::ReleaseError;
use crate::infrastructure::process::TtyProfile;
use crate::infrastructure::scm::GitScm;
use crate::infrastructure::toolchain::SkcraftToolchain;

/// Environment variable that turns on step tracing.
pub const TRACING_ENV: &str = "SKLA_TRACING";

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    " ",
    env!("BUILD_DATE"),
    " ",
    env!("BUILD_TARGET"),
    ")"
);

/// skla - build a modpack with the SKCraft launcher and publish it
#[derive(Parser, Debug)]
#[command(name = "skla")]
#[command(about = "Build a modpack with the SKCraft launcher and publish it to the download site")]
#[command(version = VERSION)]
pub struct Cli {
    /// Directory with modpack.json and version.txt (prompted for when omitted)
    #[arg(env = "SKLA_INPUT_DIR")]
    pub input_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Working directory (defaults to current directory)
    #[arg(short = 'C', long, env = "SKLA_DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Launcher source repository
    #[arg(long, env = "SKLA_LAUNCHER_URL", default_value = DEFAULT_LAUNCHER_URL)]
    pub launcher_url: String,

    #[arg(long, env = "SKLA_LAUNCHER_BRANCH", default_value = DEFAULT_LAUNCHER_BRANCH)]
    pub launcher_branch: String,

    /// Download site repository the release is pushed to
    #[arg(long, env = "SKLA_DIST_URL", default_value = DEFAULT_DIST_URL)]
    pub dist_url: String,

    #[arg(long, env = "SKLA_DIST_BRANCH", default_value = DEFAULT_DIST_BRANCH)]
    pub dist_branch: String,

    /// Launcher patches and their version.txt
    #[arg(long, env = "SKLA_PATCHES", default_value = DEFAULT_PATCHES_DIR)]
    pub patches: PathBuf,

    /// Public URL of the download site
    #[arg(long, env = "SKLA_DOWNLOAD_BASE_URL", default_value = DEFAULT_DOWNLOAD_BASE_URL)]
    pub download_base_url: String,
}

impl Cli {
    pub fn pipeline_config(&self, work_dir: PathBuf) -> PipelineConfig {
        let config = PipelineConfig::new(work_dir)
            .with_launcher(self.launcher_url.clone(), branch(&self.launcher_branch))
            .with_dist(self.dist_url.clone(), branch(&self.dist_branch))
            .with_patches_dir(self.patches.clone())
            .with_download_base_url(self.download_base_url.clone());
        match &self.input_dir {
            Some(dir) => config.with_input_dir(dir.clone()),
            None => config,
        }
    }
}

/// An empty branch means the remote's default branch.
fn branch(name: &str) -> Option<String> {
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
}

impl CliApp {
    pub fn new() -> Self {
        Self { cli: Cli::parse() }
    }

    pub fn from_cli(cli: Cli) -> Self {
        Self { cli }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        colored::control::set_override(!self.cli.no_color && atty::is(atty::Stream::Stdout));
        init_tracing(self.cli.verbose, self.cli.no_color);

        if let Some(ref dir) = self.cli.directory {
            env::set_current_dir(dir)?;
        }

        match self.release().await {
            Ok(()) => Ok(()),
            Err(e) => {
                report(&e);
                exit(1);
            }
        }
    }

    async fn release(&self) -> Result<(), ReleaseError> {
        let work_dir = env::current_dir()?;
        let config = self.cli.pipeline_config(work_dir.clone());

        let profile = TtyProfile::detect();
        let pipeline = ReleasePipeline::new(
            config,
            Arc::new(GitScm::new(profile.clone())),
            Arc::new(SkcraftToolchain::new(work_dir, profile)),
        )
        .with_input_provider(Arc::new(prompt::TerminalPrompt));
        pipeline.run().await?;
        Ok(())
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Print a failure the way an operator needs to see it.
fn report(error: &ReleaseError) {
    if error.is_no_changes() {
        eprintln!("{} {}", "::".yellow().bold(), error.to_string().yellow());
        return;
    }
    if let Some(code) = error.exit_code() {
        eprintln!("{} {}", "Error:".red().bold(), error);
        eprintln!("Error code {}", code);
        return;
    }

    eprintln!("{} {}", "Error:".red().bold(), error);
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("  {} {}", "caused by:".dimmed(), cause);
        source = cause.source();
    }
}

fn tracing_requested() -> bool {
    env::var(TRACING_ENV)
        .map(|value| !value.is_empty() && value != "0")
        .unwrap_or(false)
}

fn init_tracing(verbose: bool, no_color: bool) {
    let steps = verbose || tracing_requested();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if steps { "skla=debug" } else { "skla=warn" }));
    let ansi = !no_color && atty::is(atty::Stream::Stderr);

    let _ = build_subscriber(filter, steps, ansi, std::io::stderr).try_init();
}

/// Formatting subscriber over `writer`. With `steps` every instrumented step
/// logs a line when it begins and when it ends.
pub fn build_subscriber<W>(filter: EnvFilter, steps: bool, ansi: bool, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let span_events = if steps {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(ansi)
                .with_span_events(span_events)
                .with_writer(writer),
        )
        .with(filter)
}
