use std::path::{Path, PathBuf};

/// Extension of assembler test sources.
pub const SOURCE_EXT: &str = "6502";

/// Suffix of sources which are included by other tests.
pub const INCLUDE_SUFFIX: &str = ".inc.6502";

/// Suffix of sources which are expected to fail assembly.
pub const FAIL_SUFFIX: &str = ".fail.6502";

/// Extension replacing [`SOURCE_EXT`] for the gold disc image.
pub const GOLD_SSD_EXT: &str = "gold.ssd";

/// Extension replacing [`SOURCE_EXT`] for the gold transcript.
pub const GOLD_TXT_EXT: &str = "gold.txt";

/// A single source file to run the assembler on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// The directory holding the source, where the assembler is run.
    pub dir: PathBuf,

    /// The file name of the source.
    pub file_name: String,

    /// Whether assembly is expected to fail.
    pub failure: bool,

    /// The file name of the gold disc image, if there is one.
    pub gold_ssd: Option<String>,

    /// The file name of the gold transcript, if there is one.
    pub gold_txt: Option<String>,
}

/// The kind of a directory entry, judged by its file name.
#[derive(Debug, PartialEq, Eq)]
pub enum Kind {
    /// Not an assembler source.
    Other,
    /// A fragment included by other sources.
    Include,
    /// A runnable test.
    Test,
}

pub fn kind(file_name: &str) -> Kind {
    if Path::new(file_name).extension().and_then(|e| e.to_str()) != Some(SOURCE_EXT) {
        Kind::Other
    } else if file_name.ends_with(INCLUDE_SUFFIX) {
        Kind::Include
    } else {
        Kind::Test
    }
}

/// Replace the last extension of `file_name`, e.g. `a.fail.6502` -> `a.fail.gold.ssd`.
fn replace_extension(file_name: &str, ext: &str) -> String {
    Path::new(file_name)
        .with_extension(ext)
        .to_string_lossy()
        .into_owned()
}

impl TestCase {
    /// Build the test case for `file_name` in `dir`, looking for gold files beside it.
    pub fn new(dir: &Path, file_name: &str) -> Self {
        let sibling = |ext: &str| {
            let name = replace_extension(file_name, ext);
            dir.join(&name).is_file().then_some(name)
        };

        Self {
            dir: dir.to_path_buf(),
            file_name: file_name.to_string(),
            failure: file_name.ends_with(FAIL_SUFFIX),
            gold_ssd: sibling(GOLD_SSD_EXT),
            gold_txt: sibling(GOLD_TXT_EXT),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}
