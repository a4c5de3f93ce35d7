use std::path::{Path, PathBuf};

use super::process_runner::{CommandArgs, CommandInvocation, ProcessOutput, ProcessRunner};
use super::scoped_directory::ScopedDirectory;
use super::tty::TtyProfile;
use crate::common::result::ReleaseResult;

/// Executable behind a [`CommandProxy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Executable {
    /// Tool looked up on the search path.
    OnPath(String),
    /// Script resolved relative to the proxy root, e.g. `gradlew`.
    Wrapper(PathBuf),
}

impl Executable {
    fn program(&self) -> String {
        match self {
            Executable::OnPath(name) => name.clone(),
            Executable::Wrapper(script) => Path::new(".").join(script).to_string_lossy().into_owned(),
        }
    }
}

/// Open-ended front for a command-line tool.
///
/// The tool's subcommands are not known up front: [`CommandProxy::verb`]
/// accepts any token and verbs chain freely. Every call runs with the working
/// directory set to the proxy root.
///
/// ```no_run
/// use skla::infrastructure::process::{CommandArgs, CommandProxy, TtyProfile};
///
/// # async fn example() -> skla::Result<()> {
/// let gradle = CommandProxy::gradle_wrapper("launcher", TtyProfile::detect());
/// gradle.verb("clean").verb("build").call(CommandArgs::new()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CommandProxy {
    runner: ProcessRunner,
    root: PathBuf,
}

impl CommandProxy {
    pub fn new(executable: Executable, root: impl Into<PathBuf>, profile: TtyProfile) -> Self {
        Self {
            runner: ProcessRunner::new(executable.program(), profile),
            root: root.into(),
        }
    }

    /// Gradle wrapper script in `root`. Its presence is only checked when
    /// the first call launches it.
    pub fn gradle_wrapper(root: impl Into<PathBuf>, profile: TtyProfile) -> Self {
        let script = if cfg!(windows) { "gradlew.bat" } else { "gradlew" };
        Self::new(Executable::Wrapper(PathBuf::from(script)), root, profile)
    }

    /// Same tool and root with extra leading arguments.
    pub fn with_base_args<I, S>(&self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            runner: self.runner.bake(args),
            root: self.root.clone(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.root
    }

    pub fn verb(&self, name: impl Into<String>) -> Verb<'_> {
        Verb {
            proxy: self,
            path: vec![name.into()],
        }
    }

    pub fn invocation(&self, call: CommandArgs) -> CommandInvocation {
        self.runner.invocation(call)
    }

    /// Run the tool once inside the proxy root.
    pub async fn call(&self, call: CommandArgs) -> ReleaseResult<ProcessOutput> {
        let invocation = self.invocation(call);
        let _scope = ScopedDirectory::enter(&self.root)?;
        self.runner.invoke(&invocation).await
    }
}

/// Chain of subcommand tokens on a [`CommandProxy`].
#[derive(Debug, Clone)]
pub struct Verb<'a> {
    proxy: &'a CommandProxy,
    path: Vec<String>,
}

impl<'a> Verb<'a> {
    pub fn verb(mut self, name: impl Into<String>) -> Self {
        self.path.push(name.into());
        self
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn invocation(&self, call: CommandArgs) -> CommandInvocation {
        self.proxy.invocation(call.prepend(self.path.iter().cloned()))
    }

    pub async fn call(self, call: CommandArgs) -> ReleaseResult<ProcessOutput> {
        self.proxy.call(call.prepend(self.path)).await
    }
}
