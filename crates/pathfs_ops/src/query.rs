/* 📖 # Why are the queries free functions over a PalHandle?

A path is a plain value and knows nothing about the filesystem. Anything that asks the host a
question goes through the PAL, so the same query can run against the real filesystem or an
in-memory mock. Each function is a single stateless call that adds error context naming the
path; nothing is cached between calls.
*/

use tracing::{debug, instrument, warn};

use pathfs_base::{FsPath, PalHandle, PathfsResult, ResultExt, SpaceInfo};

/// Whether anything exists at `path`. A missing path is `Ok(false)`.
#[instrument(skip(pal), fields(path = %path))]
pub fn exists(pal: &PalHandle, path: &FsPath) -> PathfsResult<bool> {
    pal.exists(path)
        .with_context(|| format!("Failed to check whether '{}' exists", path))
}

/// Whether `path` is a directory. Reads metadata on every call.
#[instrument(skip(pal), fields(path = %path))]
pub fn is_directory(pal: &PalHandle, path: &FsPath) -> PathfsResult<bool> {
    pal.is_directory(path)
        .with_context(|| format!("Failed to check whether '{}' is a directory", path))
}

/// Whether `path` itself is a symbolic link. The link is not followed.
#[instrument(skip(pal), fields(path = %path))]
pub fn is_symlink(pal: &PalHandle, path: &FsPath) -> PathfsResult<bool> {
    pal.is_symlink(path)
        .with_context(|| format!("Failed to check whether '{}' is a symbolic link", path))
}

/// Size of the file at `path` in bytes.
#[instrument(skip(pal), fields(path = %path))]
pub fn file_size(pal: &PalHandle, path: &FsPath) -> PathfsResult<u64> {
    pal.file_size(path)
        .with_context(|| format!("Failed to get size of '{}'", path))
}

/// Size of the file at `path`, or 0 if it cannot be determined.
///
/// Zero is indistinguishable from an empty file; prefer [`file_size`] unless that is acceptable.
#[instrument(skip(pal), fields(path = %path))]
pub fn file_size_or_zero(pal: &PalHandle, path: &FsPath) -> u64 {
    match pal.file_size(path) {
        Ok(size) => size,
        Err(e) if e.is_not_found() => {
            debug!("file not found, reporting size 0");
            0
        }
        Err(e) => {
            warn!(error = %e, "failed to get file size, reporting 0");
            0
        }
    }
}

/// Capacity, free and available bytes of the volume containing `path`.
#[instrument(skip(pal), fields(path = %path))]
pub fn space(pal: &PalHandle, path: &FsPath) -> PathfsResult<SpaceInfo> {
    pal.space(path)
        .with_context(|| format!("Failed to query space of volume containing '{}'", path))
}

/// The process working directory.
#[instrument(skip(pal))]
pub fn current_path(pal: &PalHandle) -> PathfsResult<FsPath> {
    pal.current_path()
        .context("Failed to get current directory")
}

/// Appends `segment` to `base`, inserting a separator only if `base` is a directory.
///
/// This reads the filesystem. When `base` is not a directory (or does not exist) the segment is
/// appended directly, which turns `log` + `.1` into `log.1`. For purely lexical composition use
/// [`FsPath::join`].
#[instrument(skip(pal), fields(base = %base))]
pub fn join_resolved(pal: &PalHandle, base: &FsPath, segment: &str) -> PathfsResult<FsPath> {
    let base_is_directory = is_directory(pal, base)?;
    let joined = if base_is_directory {
        base.join(segment)
    } else {
        base.concat(segment)
    };
    debug!(base_is_directory, joined = %joined, "joined path");
    Ok(joined)
}
