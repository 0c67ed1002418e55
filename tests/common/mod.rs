#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use beebasm_testrunner::{run, Config, TestFailure};
use tempfile::TempDir;

/// A stand-in for beebasm.
/// It echoes its arguments, records the source it was given in `calls.log`,
/// fails on sources containing `BROKEN` and otherwise copies the source to the
/// `-do` disc image, unless the source contains `NOIMAGE`.
const STAND_IN: &str = r#"#!/bin/sh
echo "stand-in assembler $*"
out=""
src=""
while [ $# -gt 0 ]; do
    case "$1" in
        -do) out="$2"; shift ;;
        -i) src="$2"; shift ;;
    esac
    shift
done
echo "$src" >> calls.log
if grep -q BROKEN "$src"; then
    echo "error: BROKEN source $src" >&2
    exit 1
fi
if [ -n "$out" ] && ! grep -q NOIMAGE "$src"; then
    cp "$src" "$out"
fi
exit 0
"#;

/// The stand-in is written once, before any test spawns it.
pub fn stand_in() -> &'static Path {
    static STAND_IN_DIR: OnceLock<(TempDir, PathBuf)> = OnceLock::new();

    &STAND_IN_DIR
        .get_or_init(|| {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("beebasm");
            fs::write(&path, STAND_IN).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            (dir, path)
        })
        .1
}

/// A test tree under `<tempdir>/test`.
pub struct Fixture {
    pub dir: TempDir,
    pub root: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("test");
        fs::create_dir(&root).unwrap();
        Self { dir, root }
    }

    pub fn add(&self, name: &str, contents: &str) -> &Self {
        let path = self.root.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
        self
    }

    pub fn config(&self) -> Config {
        Config::new(stand_in().to_path_buf(), self.root.clone())
    }

    pub fn run(&self) -> Result<usize, TestFailure> {
        run(&self.config())
    }

    pub fn log(&self) -> String {
        fs::read_to_string(self.root.join("testlog.txt")).unwrap()
    }

    /// The sources the assembler was run on in directory `dir` below the root.
    pub fn calls(&self, dir: &str) -> Vec<String> {
        match fs::read_to_string(self.root.join(dir).join("calls.log")) {
            Ok(calls) => calls.lines().map(str::to_string).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// The tests in the order the log reports them, relative to the root.
    pub fn tests_run(&self) -> Vec<String> {
        self.log()
            .lines()
            .filter_map(|line| line.strip_prefix("TEST: "))
            .map(|path| {
                Path::new(path)
                    .strip_prefix(&self.root)
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect()
    }
}
