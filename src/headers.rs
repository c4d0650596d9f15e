//! Discovery of extra headers that generated files include after `vulkan/vulkan.h`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// List every regular file under `dir`, relative to `dir`.
///
/// The walk is depth-first and follows directory-listing order at each level.
/// Directories are descended but never returned. Symlinks are followed; a
/// dangling link is listed like a file. Symlink cycles are not guarded against.
///
/// # Errors
///
/// Returns the underlying I/O error when `dir` (or anything below it) cannot
/// be read, including when `dir` does not exist.
pub fn list_extra_headers(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut headers = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).follow_links(true) {
        let path = match entry {
            Ok(entry) if entry.file_type().is_dir() => continue,
            Ok(entry) => entry.into_path(),
            Err(err) => {
                let dangling = err.path().filter(|p| is_dangling_link(p)).map(Path::to_path_buf);
                match dangling {
                    Some(link) => link,
                    None => return Err(err.into()),
                }
            }
        };
        let relative = path
            .strip_prefix(dir)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        headers.push(relative.to_path_buf());
    }
    Ok(headers)
}

fn is_dangling_link(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink())
        && fs::metadata(path).is_err()
}

/// Render a header path for an `#include` line, always with `/` separators.
#[must_use]
pub fn include_path(header: &Path) -> String {
    header
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
