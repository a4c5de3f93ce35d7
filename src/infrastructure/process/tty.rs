//! Terminal profile and stream forwarding for spawned processes.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::io::{self, Write};

/// Rows of the emulated terminal.
pub const TERMINAL_ROWS: u16 = 80;
/// Columns of the emulated terminal.
pub const TERMINAL_COLUMNS: u16 = 240;

const DEFAULT_TERM: &str = "xterm";

/// Immutable description of the terminal every child process sees.
///
/// Built once from the ambient environment and handed to each invocation, so
/// no process-level state is mutated to configure children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtyProfile {
    environment: BTreeMap<OsString, OsString>,
    tty_out: bool,
    rows: u16,
    columns: u16,
}

impl TtyProfile {
    /// Profile for the current process: ambient environment, terminal mode
    /// when stdout is attached to a terminal.
    pub fn detect() -> Self {
        Self::from_environment(std::env::vars_os(), atty::is(atty::Stream::Stdout))
    }

    /// Build a profile from an explicit environment.
    ///
    /// `PAGER` is cleared, `TERM` falls back to `xterm`, and the fixed
    /// terminal size is exported as `LINES`/`COLUMNS`.
    pub fn from_environment<I, K, V>(vars: I, tty_out: bool) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        let mut environment: BTreeMap<OsString, OsString> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        environment
            .entry(OsString::from("TERM"))
            .or_insert_with(|| OsString::from(DEFAULT_TERM));
        environment.insert(OsString::from("PAGER"), OsString::new());
        environment.insert(OsString::from("LINES"), TERMINAL_ROWS.to_string().into());
        environment.insert(OsString::from("COLUMNS"), TERMINAL_COLUMNS.to_string().into());

        Self {
            environment,
            tty_out,
            rows: TERMINAL_ROWS,
            columns: TERMINAL_COLUMNS,
        }
    }

    /// Force terminal mode on or off.
    pub fn with_tty(mut self, tty_out: bool) -> Self {
        self.tty_out = tty_out;
        self
    }

    pub fn environment(&self) -> &BTreeMap<OsString, OsString> {
        &self.environment
    }

    pub fn var(&self, key: &str) -> Option<&OsStr> {
        self.environment.get(OsStr::new(key)).map(OsString::as_os_str)
    }

    pub fn is_tty(&self) -> bool {
        self.tty_out
    }

    /// `(rows, columns)`
    pub fn size(&self) -> (u16, u16) {
        (self.rows, self.columns)
    }
}

/// How a [`PassThroughWriter`] hands data to its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEncoding {
    /// Destination accepts arbitrary bytes.
    Bytes,
    /// Destination accepts UTF-8 text only; undecodable bytes are dropped.
    Text,
}

/// Unbuffered forwarder from a child stream to a destination writer.
pub struct PassThroughWriter<W: Write> {
    inner: W,
    encoding: StreamEncoding,
    pending: Vec<u8>,
}

impl<W: Write> PassThroughWriter<W> {
    pub fn bytes(inner: W) -> Self {
        Self::new(inner, StreamEncoding::Bytes)
    }

    pub fn text(inner: W) -> Self {
        Self::new(inner, StreamEncoding::Text)
    }

    pub fn new(inner: W, encoding: StreamEncoding) -> Self {
        Self {
            inner,
            encoding,
            pending: Vec::new(),
        }
    }

    pub fn encoding(&self) -> StreamEncoding {
        self.encoding
    }

    /// Forward one chunk and flush.
    pub fn forward(&mut self, chunk: &[u8]) -> io::Result<()> {
        match self.encoding {
            StreamEncoding::Bytes => self.inner.write_all(chunk)?,
            StreamEncoding::Text => {
                self.pending.extend_from_slice(chunk);
                let (text, consumed) = decode_utf8_dropping_invalid(&self.pending);
                self.pending.drain(..consumed);
                self.inner.write_all(text.as_bytes())?;
            }
        }
        self.inner.flush()
    }

    /// Flush and return the destination. An incomplete trailing sequence
    /// can no longer be decoded and is discarded.
    pub fn finish(mut self) -> io::Result<W> {
        self.pending.clear();
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Decode as much of `buf` as possible, skipping invalid sequences.
///
/// Returns the text and the number of bytes consumed. An incomplete sequence
/// at the end of `buf` is left unconsumed so the next chunk can complete it.
fn decode_utf8_dropping_invalid(buf: &[u8]) -> (String, usize) {
    let mut text = String::with_capacity(buf.len());
    let mut offset = 0;

    while offset < buf.len() {
        let rest = &buf[offset..];
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                text.push_str(valid);
                offset = buf.len();
            }
            Err(e) => {
                let valid_len = e.valid_up_to();
                if let Ok(valid) = std::str::from_utf8(&rest[..valid_len]) {
                    text.push_str(valid);
                }
                match e.error_len() {
                    Some(invalid_len) => offset += valid_len + invalid_len,
                    None => {
                        offset += valid_len;
                        break;
                    }
                }
            }
        }
    }

    (text, offset)
}
