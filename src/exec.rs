use std::fmt;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::warn;

use crate::case::TestCase;
use crate::compare::{contains_gold, excerpt, first_difference};
use crate::directive::read_switches;
use crate::report::LogSink;
use crate::TestFailure;

/// Disc image the assembler writes when a gold image is to be compared.
pub const OUTPUT_SSD: &str = "test.ssd";

/// Transcript of the assembler output when a gold transcript is to be compared.
pub const CAPTURE_TXT: &str = "testgold.txt";

/// A command line for the assembler under test.
#[derive(Debug, PartialEq, Eq)]
pub struct Invocation {
    pub assembler: PathBuf,
    pub args: Vec<String>,
}

impl Invocation {
    /// `<assembler> -v <switches> [-do <ssd>] -i <input>`
    pub fn new(assembler: &Path, switches: Vec<String>, ssd: Option<&str>, input: &str) -> Self {
        let mut args = vec!["-v".to_string()];
        args.extend(switches);
        if let Some(ssd) = ssd {
            args.extend(["-do".to_string(), ssd.to_string()]);
        }
        args.extend(["-i".to_string(), input.to_string()]);

        Self {
            assembler: assembler.to_path_buf(),
            args,
        }
    }

    /// Run the assembler in `dir` to completion, returning whether it succeeded.
    /// Failing to start the assembler counts as an unsuccessful run.
    fn execute(
        &self,
        dir: &Path,
        stdout: Stdio,
        stderr: Stdio,
        log: &mut LogSink,
    ) -> Result<bool, TestFailure> {
        let status = Command::new(&self.assembler)
            .args(&self.args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .status();

        match status {
            Ok(status) => Ok(status.success()),
            Err(e) => {
                warn!("could not run {}: {e}", self.assembler.display());
                writeln!(log, "Could not run {}: {e}", self.assembler.display())
                    .map_err(TestFailure::Log)?;
                Ok(false)
            }
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let assembler = self.assembler.to_string_lossy();
        let args: Vec<&str> = std::iter::once(&*assembler)
            .chain(self.args.iter().map(String::as_str))
            .collect();
        write!(f, "{args:?}")
    }
}

/// Remove `path` if it exists.
fn remove_stale(path: &Path) -> Result<(), TestFailure> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(TestFailure::io(path)(e)),
        _ => Ok(()),
    }
}

fn read_text(path: &Path) -> Result<String, TestFailure> {
    let bytes = fs::read(path).map_err(TestFailure::io(path))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Run the assembler on a single test case and check the results.
pub fn run_test(assembler: &Path, case: &TestCase, log: &mut LogSink) -> Result<(), TestFailure> {
    let path = case.path();
    log.banner(&format!("TEST: {}", path.display()))
        .map_err(TestFailure::Log)?;

    let switches = read_switches(&path).map_err(TestFailure::io(&path))?;
    let output_ssd = case.dir.join(OUTPUT_SSD);
    let ssd = case.gold_ssd.as_ref().map(|_| OUTPUT_SSD);
    if ssd.is_some() {
        remove_stale(&output_ssd)?;
    }

    let invocation = Invocation::new(assembler, switches, ssd, &case.file_name);
    writeln!(log, "{invocation}").map_err(TestFailure::Log)?;

    let capture_path = case.dir.join(CAPTURE_TXT);
    let succeeded = if case.gold_txt.is_some() {
        let capture = File::create(&capture_path).map_err(TestFailure::io(&capture_path))?;
        let stderr = capture
            .try_clone()
            .map_err(TestFailure::io(&capture_path))?;
        invocation.execute(&case.dir, capture.into(), stderr.into(), log)?
    } else {
        let stdout = log.stdio().map_err(TestFailure::Log)?;
        let stderr = log.stdio().map_err(TestFailure::Log)?;
        invocation.execute(&case.dir, stdout, stderr, log)?
    };

    if let Some(gold_txt) = &case.gold_txt {
        let capture = read_text(&capture_path)?;
        log.write_all(capture.as_bytes()).map_err(TestFailure::Log)?;

        let gold_path = case.dir.join(gold_txt);
        let gold = read_text(&gold_path)?;

        write!(log, "Comparing beebasm output to {gold_txt}").map_err(TestFailure::Log)?;
        if contains_gold(&capture, &gold) {
            writeln!(log, " succeeded").map_err(TestFailure::Log)?;
        } else {
            writeln!(log, " failed").map_err(TestFailure::Log)?;
            return Err(TestFailure::TranscriptMismatch(gold_path));
        }
    }

    if case.failure && succeeded {
        return Err(TestFailure::FailureTestSucceeded(path));
    }
    if !case.failure && !succeeded {
        return Err(TestFailure::SuccessTestFailed(path));
    }

    if let (false, Some(gold_ssd)) = (case.failure, &case.gold_ssd) {
        let gold_path = case.dir.join(gold_ssd);

        write!(log, "Comparing output ssd to {gold_ssd}").map_err(TestFailure::Log)?;
        let gold = fs::read(&gold_path).map_err(TestFailure::io(&gold_path))?;
        let output = fs::read(&output_ssd).map_err(TestFailure::io(&output_ssd))?;

        match first_difference(&gold, &output) {
            None => writeln!(log, " succeeded").map_err(TestFailure::Log)?,
            Some(offset) => {
                writeln!(log, " failed").map_err(TestFailure::Log)?;
                writeln!(
                    log,
                    "First difference at offset {offset:#x}: gold {} output {}",
                    excerpt(&gold, offset),
                    excerpt(&output, offset)
                )
                .map_err(TestFailure::Log)?;
                return Err(TestFailure::ImageMismatch {
                    gold: gold_path,
                    offset,
                });
            }
        }
    }

    Ok(())
}
