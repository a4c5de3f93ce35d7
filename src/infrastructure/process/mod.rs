pub mod command_proxy;
pub mod process_runner;
pub mod scoped_directory;
pub mod tty;

pub use command_proxy::{CommandProxy, Executable, Verb};
pub use process_runner::{CommandArgs, CommandInvocation, OptionValue, ProcessOutput, ProcessRunner};
pub use scoped_directory::ScopedDirectory;
pub use tty::{PassThroughWriter, StreamEncoding, TtyProfile};
