use tracing::{debug, instrument};

use pathfs_base::{CopyMode, FsPath, PalHandle, PathfsResult, ResultExt};

use crate::query::{is_directory, is_symlink};

/// Create a single directory.
///
/// Returns `Ok(true)` if the directory was created and `Ok(false)` if it already existed.
#[instrument(skip(pal), fields(path = %path))]
pub fn create_directory(pal: &PalHandle, path: &FsPath) -> PathfsResult<bool> {
    pal.create_directory(path)
        .with_context(|| format!("Failed to create directory '{}'", path))
}

/// Create a directory together with any missing parents.
#[instrument(skip(pal), fields(path = %path))]
pub fn create_directories(pal: &PalHandle, path: &FsPath) -> PathfsResult<()> {
    pal.create_directory_all(path)
        .with_context(|| format!("Failed to create directories '{}'", path))
}

/// Change the process working directory.
#[instrument(skip(pal), fields(path = %path))]
pub fn set_current_path(pal: &PalHandle, path: &FsPath) -> PathfsResult<()> {
    pal.set_current_path(path)
        .with_context(|| format!("Failed to change current directory to '{}'", path))
}

/// Whether `path` should be removed as a directory. Links are removed as links, whatever they
/// point to.
fn is_real_directory(pal: &PalHandle, path: &FsPath) -> PathfsResult<bool> {
    Ok(!is_symlink(pal, path)? && is_directory(pal, path)?)
}

/// Remove a file, a symbolic link or an empty directory.
#[instrument(skip(pal), fields(path = %path))]
pub fn remove(pal: &PalHandle, path: &FsPath) -> PathfsResult<()> {
    if is_real_directory(pal, path)? {
        debug!("removing directory");
        pal.remove_directory(path)
            .with_context(|| format!("Failed to remove directory '{}'", path))
    } else {
        debug!("removing file");
        pal.remove_file(path)
            .with_context(|| format!("Failed to remove file '{}'", path))
    }
}

/// Remove a file or link, or a directory with everything in it.
#[instrument(skip(pal), fields(path = %path))]
pub fn remove_all(pal: &PalHandle, path: &FsPath) -> PathfsResult<()> {
    if is_real_directory(pal, path)? {
        debug!("removing directory tree");
        pal.remove_directory_all(path)
            .with_context(|| format!("Failed to remove directory tree '{}'", path))
    } else {
        debug!("removing file");
        pal.remove_file(path)
            .with_context(|| format!("Failed to remove file '{}'", path))
    }
}

/// Copy a file, replacing the destination if it exists. Returns the number of bytes copied.
#[instrument(skip(pal), fields(from = %from, to = %to))]
pub fn copy(pal: &PalHandle, from: &FsPath, to: &FsPath) -> PathfsResult<u64> {
    copy_with_mode(pal, from, to, CopyMode::Overwrite)
}

/// Copy a file with an explicit policy for an existing destination.
#[instrument(skip(pal), fields(from = %from, to = %to))]
pub fn copy_with_mode(
    pal: &PalHandle,
    from: &FsPath,
    to: &FsPath,
    mode: CopyMode,
) -> PathfsResult<u64> {
    pal.copy_file(from, to, mode)
        .with_context(|| format!("Failed to copy '{}' to '{}'", from, to))
}

/// Move or rename a file or directory.
#[instrument(skip(pal), fields(from = %old_path, to = %new_path))]
pub fn rename(pal: &PalHandle, old_path: &FsPath, new_path: &FsPath) -> PathfsResult<()> {
    pal.rename(old_path, new_path)
        .with_context(|| format!("Failed to rename '{}' to '{}'", old_path, new_path))
}
