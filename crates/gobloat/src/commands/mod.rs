//! CLI command implementations

pub mod check;
pub mod rewrite;

use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collect the Go files named by the inputs. A file argument is taken as
/// is; a directory is walked recursively, skipping `vendor` and
/// `testdata` trees. Test files are skipped unless asked for.
pub fn collect_go_files(inputs: &[PathBuf], include_tests: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
            continue;
        }

        for entry in WalkDir::new(input)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if path
                .components()
                .any(|c| c.as_os_str() == "vendor" || c.as_os_str() == "testdata")
            {
                continue;
            }

            if path.is_file() && is_go_source(path, include_tests) {
                files.push(path.to_path_buf());
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn is_go_source(path: &Path, include_tests: bool) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if !name.ends_with(".go") {
        return false;
    }
    include_tests || !name.ends_with("_test.go")
}
