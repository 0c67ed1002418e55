use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::process::Stdio;

/// Where per-test progress and assembler output go.
pub enum LogSink {
    /// The real standard output, in verbose mode.
    Stdout,

    /// A log file. Writes are unbuffered so they stay ordered with the
    /// output of child processes sharing the file.
    File(File),
}

impl LogSink {
    pub fn new(verbose: bool, log_path: &Path) -> io::Result<Self> {
        if verbose {
            Ok(Self::Stdout)
        } else {
            File::create(log_path).map(Self::File)
        }
    }

    /// A handle for a child process to write its output to.
    /// Call once per stream; both streams of a child share the sink.
    pub fn stdio(&mut self) -> io::Result<Stdio> {
        self.flush()?;
        match self {
            Self::Stdout => Ok(io::stdout().into()),
            Self::File(file) => Ok(file.try_clone()?.into()),
        }
    }

    /// Write a `=` ruled banner around `title`.
    pub fn banner(&mut self, title: &str) -> io::Result<()> {
        let rule = "=".repeat(70);
        writeln!(self, "{rule}")?;
        writeln!(self, "{title}")?;
        writeln!(self, "{rule}")
    }
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout => io::stdout().write(buf),
            Self::File(file) => file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout => io::stdout().flush(),
            Self::File(file) => file.flush(),
        }
    }
}
