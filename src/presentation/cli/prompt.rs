use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::application::use_cases::InputDirProvider;
use crate::common::error::ReleaseError;
use crate::common::result::ReleaseResult;

pub const INPUT_PROMPT: &str = "Directory with files: ";

/// Asks on the terminal when the pipeline reaches its input step.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl InputDirProvider for TerminalPrompt {
    fn input_dir(&self) -> ReleaseResult<PathBuf> {
        prompt_input_dir()
    }
}

/// Ask on the terminal for the modpack input directory.
pub fn prompt_input_dir() -> ReleaseResult<PathBuf> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    read_input_dir(&mut stdin.lock(), &mut stdout.lock())
}

/// Prompt on `output` and read one answer from `input`.
pub fn read_input_dir<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> ReleaseResult<PathBuf> {
    write!(output, "{}", INPUT_PROMPT)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim();
    if answer.is_empty() {
        return Err(ReleaseError::invalid_argument("No input directory given", None));
    }
    Ok(PathBuf::from(answer))
}
