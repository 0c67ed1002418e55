mod case;
mod compare;
mod directive;
mod discover;
mod exec;
mod report;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use regex::Regex;

use discover::discover;
use report::LogSink;

/// The name of the assembler under test, without the platform's executable suffix.
pub const ASSEMBLER: &str = "beebasm";

/// The default log file name, inside the test root.
pub const LOG_FILE: &str = "testlog.txt";

/// The assembler under test, expected in directory `dir`.
pub fn default_assembler(dir: &Path) -> PathBuf {
    dir.join(format!("{ASSEMBLER}{}", std::env::consts::EXE_SUFFIX))
}

/// Everything a test run needs to know.
#[derive(Debug)]
pub struct Config {
    /// The assembler binary.
    pub assembler: PathBuf,

    /// The root of the test tree.
    pub root: PathBuf,

    /// Log to the real standard output instead of `log_path`.
    pub verbose: bool,

    /// Log file used when not verbose.
    pub log_path: PathBuf,

    /// Only run tests whose path relative to `root` matches.
    pub filter: Option<Regex>,
}

impl Config {
    pub fn new(assembler: PathBuf, root: PathBuf) -> Self {
        let log_path = root.join(LOG_FILE);
        Self {
            assembler,
            root,
            verbose: false,
            log_path,
            filter: None,
        }
    }
}

/// The first check that failed in a test run.
#[derive(Debug)]
pub enum TestFailure {
    /// A test expected to assemble did not.
    SuccessTestFailed(PathBuf),

    /// A test expected to fail assembly assembled.
    FailureTestSucceeded(PathBuf),

    /// The assembler output lacks the text of this gold transcript.
    TranscriptMismatch(PathBuf),

    /// The disc image differs from this gold image.
    ImageMismatch { gold: PathBuf, offset: usize },

    Io { path: PathBuf, source: io::Error },

    Log(io::Error),

    Walk(walkdir::Error),
}

impl TestFailure {
    pub(crate) fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl std::fmt::Display for TestFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SuccessTestFailed(p) => write!(f, "Success test failed: {}", p.display()),
            Self::FailureTestSucceeded(p) => write!(f, "Failure test succeeded: {}", p.display()),
            Self::TranscriptMismatch(p) => {
                write!(f, "Test output does not include gold text: {}", p.display())
            }
            Self::ImageMismatch { gold, .. } => {
                write!(f, "ssd does not match gold ssd: {}", gold.display())
            }
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Log(e) => write!(f, "Cannot write test log: {e}"),
            Self::Walk(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for TestFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Log(e) => Some(e),
            Self::Walk(e) => Some(e),
            _ => None,
        }
    }
}

/// Run every test under the configured root, stopping at the first failure.
/// Returns the number of tests run.
pub fn run(config: &Config) -> Result<usize, TestFailure> {
    let mut log =
        LogSink::new(config.verbose, &config.log_path).map_err(TestFailure::io(&config.log_path))?;

    let mut count = 0;
    for case in discover(&config.root, config.filter.as_ref()) {
        exec::run_test(&config.assembler, &case?, &mut log)?;
        count += 1;
    }

    writeln!(log, "{count} tests passed").map_err(TestFailure::Log)?;

    Ok(count)
}
