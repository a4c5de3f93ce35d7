use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::debug;

use super::tty::{PassThroughWriter, TtyProfile};
use crate::common::error::ReleaseError;
use crate::common::result::ReleaseResult;

const READ_CHUNK: usize = 8192;

/// Value of a keyword option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// Switch without a value; `false` omits it.
    Flag(bool),
    Value(String),
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Value(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Value(value)
    }
}

impl From<&Path> for OptionValue {
    fn from(value: &Path) -> Self {
        Self::Value(value.to_string_lossy().into_owned())
    }
}

/// Positional tokens and keyword options for one call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandArgs {
    positional: Vec<String>,
    options: Vec<(String, OptionValue)>,
    capture: bool,
}

impl CommandArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.positional.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.positional.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().into_owned())
    }

    pub fn option(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.options.push((name.into(), value.into()));
        self
    }

    /// Capture stdout instead of forwarding it.
    pub fn capture(mut self) -> Self {
        self.capture = true;
        self
    }

    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    pub fn options(&self) -> &[(String, OptionValue)] {
        &self.options
    }

    pub fn is_capture(&self) -> bool {
        self.capture
    }

    pub(crate) fn prepend<I>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut positional: Vec<String> = tokens.into_iter().collect();
        positional.append(&mut self.positional);
        self.positional = positional;
        self
    }
}

/// One fully resolved external process launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    program: String,
    args: Vec<String>,
    capture: bool,
}

impl CommandInvocation {
    /// Render `base_args`, the positional tokens, then the options.
    pub fn new(program: impl Into<String>, base_args: &[String], call: CommandArgs) -> Self {
        let mut args = base_args.to_vec();
        args.extend(call.positional);
        for (name, value) in &call.options {
            args.extend(render_option(name, value));
        }
        Self {
            program: program.into(),
            args,
            capture: call.capture,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn captures_output(&self) -> bool {
        self.capture
    }
}

impl fmt::Display for CommandInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// `-k value` for one-letter names, `--long-name=value` otherwise.
fn render_option(name: &str, value: &OptionValue) -> Vec<String> {
    let name = name.replace('_', "-");
    let short = name.chars().count() == 1;
    let switch = if short {
        format!("-{}", name)
    } else {
        format!("--{}", name)
    };

    match value {
        OptionValue::Flag(false) => Vec::new(),
        OptionValue::Flag(true) => vec![switch],
        OptionValue::Value(v) if short => vec![switch, v.clone()],
        OptionValue::Value(v) => vec![format!("{}={}", switch, v)],
    }
}

/// Outcome of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub exit_code: i32,
    /// Decoded stdout when capture was requested.
    pub stdout: Option<String>,
}

impl ProcessOutput {
    /// Captured stdout with surrounding whitespace removed.
    pub fn trimmed_stdout(&self) -> &str {
        self.stdout.as_deref().map(str::trim).unwrap_or("")
    }
}

/// Baked template for launching one executable with a fixed terminal profile.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: String,
    base_args: Vec<String>,
    profile: Arc<TtyProfile>,
}

impl ProcessRunner {
    pub fn new(program: impl Into<String>, profile: TtyProfile) -> Self {
        Self {
            program: program.into(),
            base_args: Vec::new(),
            profile: Arc::new(profile),
        }
    }

    /// New template with extra leading arguments.
    pub fn bake<I, S>(&self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut baked = self.clone();
        baked.base_args.extend(args.into_iter().map(Into::into));
        baked
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn profile(&self) -> &TtyProfile {
        &self.profile
    }

    pub fn invocation(&self, call: CommandArgs) -> CommandInvocation {
        CommandInvocation::new(self.program.clone(), &self.base_args, call)
    }

    /// Run `call` against this template.
    pub async fn call(&self, call: CommandArgs) -> ReleaseResult<ProcessOutput> {
        let invocation = self.invocation(call);
        self.invoke(&invocation).await
    }

    /// Launch the process and wait for it to exit.
    ///
    /// In terminal mode the child shares the parent's terminal; otherwise its
    /// output is piped and forwarded byte for byte. Captured stdout is decoded
    /// as UTF-8 with undecodable bytes dropped.
    pub async fn invoke(&self, invocation: &CommandInvocation) -> ReleaseResult<ProcessOutput> {
        let command_line = invocation.to_string();
        let tty = self.profile.is_tty();
        debug!(command = %command_line, tty, capture = invocation.capture, "Running external command");

        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .env_clear()
            .envs(self.profile.environment())
            .stdin(Stdio::inherit());

        if invocation.capture || !tty {
            command.stdout(Stdio::piped());
        } else {
            command.stdout(Stdio::inherit());
        }
        command.stderr(if tty { Stdio::inherit() } else { Stdio::piped() });

        let mut child = command
            .spawn()
            .map_err(|e| ReleaseError::command_failed_with_source(command_line.clone(), e))?;

        let child_stdout = child.stdout.take();
        let child_stderr = child.stderr.take();
        let capture = invocation.capture;

        let stdout_task = async move {
            match child_stdout {
                Some(out) if capture => {
                    let buf = pump(out, PassThroughWriter::text(Vec::new())).await?;
                    Ok::<_, io::Error>(Some(String::from_utf8_lossy(&buf).into_owned()))
                }
                Some(out) => {
                    pump(out, PassThroughWriter::bytes(io::stdout())).await?;
                    Ok(None)
                }
                None => Ok(None),
            }
        };
        let stderr_task = async move {
            if let Some(err) = child_stderr {
                pump(err, PassThroughWriter::bytes(io::stderr())).await?;
            }
            Ok::<_, io::Error>(())
        };

        let (stdout, ()) = tokio::try_join!(stdout_task, stderr_task)
            .map_err(|e| ReleaseError::command_failed_with_source(command_line.clone(), e))?;
        let status = child
            .wait()
            .await
            .map_err(|e| ReleaseError::command_failed_with_source(command_line.clone(), e))?;

        match status.code() {
            Some(0) => Ok(ProcessOutput { exit_code: 0, stdout }),
            code => {
                debug!(command = %command_line, ?code, "External command failed");
                Err(ReleaseError::command_failed(command_line, code))
            }
        }
    }
}

async fn pump<R, W>(mut reader: R, mut writer: PassThroughWriter<W>) -> io::Result<W>
where
    R: AsyncRead + Unpin,
    W: Write,
{
    let mut buf = vec![0u8; READ_CHUNK];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        writer.forward(&buf[..n])?;
    }
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn runner(program: &str) -> ProcessRunner {
        ProcessRunner::new(program, TtyProfile::detect().with_tty(false))
    }

    #[test]
    fn test_option_rendering() {
        let invocation = runner("git").invocation(
            CommandArgs::new()
                .arg("log")
                .arg("-1")
                .option("pretty", "%H")
                .option("m", "message")
                .option("single_branch", true)
                .option("quiet", false),
        );
        assert_eq!(
            invocation.args(),
            &["log", "-1", "--pretty=%H", "-m", "message", "--single-branch"]
        );
        assert_eq!(invocation.to_string(), "git log -1 --pretty=%H -m message --single-branch");
    }

    #[test]
    fn test_baked_arguments_come_first() {
        let java = runner("java").bake(["-jar", "builder.jar"]);
        let invocation = java.invocation(CommandArgs::new().args(["--version", "1.0"]));
        assert_eq!(invocation.program(), "java");
        assert_eq!(invocation.args(), &["-jar", "builder.jar", "--version", "1.0"]);
    }

    #[tokio::test]
    async fn test_capture_stdout() {
        let output = runner("sh")
            .call(CommandArgs::new().args(["-c", "printf 'hello\\n'"]).capture())
            .await
            .unwrap();
        assert_eq!(output.exit_code, 0);
        assert_eq!(output.trimmed_stdout(), "hello");
    }

    #[tokio::test]
    async fn test_child_sees_profile_environment() {
        let output = runner("sh")
            .call(CommandArgs::new().args(["-c", "printf '%s|%s' \"$PAGER\" \"$COLUMNS\""]).capture())
            .await
            .unwrap();
        assert_eq!(output.stdout.as_deref(), Some("|240"));
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_reported() {
        let result = runner("sh").call(CommandArgs::new().args(["-c", "exit 3"])).await;
        match result {
            Err(e @ ReleaseError::ExternalCommandFailed { .. }) => {
                assert_eq!(e.exit_code(), Some(3));
                assert!(e.to_string().contains("sh -c exit 3"), "{}", e);
            }
            other => panic!("Expected ExternalCommandFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_forwarded_stdout_keeps_raw_bytes() {
        let mut child = Command::new("sh")
            .args(["-c", "printf 'a\\377b'"])
            .stdout(Stdio::piped())
            .spawn()
            .unwrap();
        let stdout = child.stdout.take().unwrap();

        let forwarded = pump(stdout, PassThroughWriter::bytes(Vec::new())).await.unwrap();

        assert!(child.wait().await.unwrap().success());
        assert_eq!(forwarded, b"a\xffb".to_vec());
    }

    #[tokio::test]
    async fn test_captured_stdout_drops_undecodable_bytes() {
        let output = runner("sh")
            .call(CommandArgs::new().args(["-c", "printf 'a\\377b'"]).capture())
            .await
            .unwrap();
        assert_eq!(output.stdout.as_deref(), Some("ab"));
    }

    #[tokio::test]
    async fn test_missing_executable_is_command_failure() {
        let result = runner("skla-definitely-missing-tool").call(CommandArgs::new()).await;
        assert!(matches!(
            result,
            Err(ReleaseError::ExternalCommandFailed { exit_code: None, .. })
        ));
    }
}
