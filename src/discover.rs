use std::ffi::OsStr;
use std::path::Path;

use log::{debug, warn};
use regex::Regex;
use walkdir::WalkDir;

use crate::case::{kind, Kind, TestCase, SOURCE_EXT};
use crate::TestFailure;

/// Walk `root` for test cases.
///
/// Within a directory, files come before subdirectories and both are in name
/// order, so simple tests near the root run (and fail) before deeper ones.
/// Include fragments are never returned. With a `filter`, only tests whose
/// path relative to `root` matches are returned.
pub fn discover<'a>(
    root: &Path,
    filter: Option<&'a Regex>,
) -> impl Iterator<Item = Result<TestCase, TestFailure>> + 'a {
    let root = root.to_path_buf();

    WalkDir::new(&root)
        .sort_by(|a, b| {
            a.file_type()
                .is_dir()
                .cmp(&b.file_type().is_dir())
                .then_with(|| a.file_name().cmp(b.file_name()))
        })
        .into_iter()
        .filter_map(move |entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => return Some(Err(TestFailure::Walk(e))),
            };
            if entry.file_type().is_dir() {
                return None;
            }

            let path = entry.path();
            let Some(file_name) = entry.file_name().to_str() else {
                if path.extension() == Some(OsStr::new(SOURCE_EXT)) {
                    warn!("skipping {}: file name is not valid UTF-8", path.display());
                }
                return None;
            };
            match kind(file_name) {
                Kind::Other => None,
                Kind::Include => {
                    debug!("skipping include file {}", path.display());
                    None
                }
                Kind::Test => {
                    if let Some(filter) = filter {
                        let relative = path.strip_prefix(&root).unwrap_or(path);
                        if !filter.is_match(&relative.to_string_lossy()) {
                            debug!("filtered out {}", path.display());
                            return None;
                        }
                    }
                    let dir = path.parent().unwrap_or(&root);
                    Some(Ok(TestCase::new(dir, file_name)))
                }
            }
        })
}
