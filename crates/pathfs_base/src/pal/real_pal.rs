use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use relative_path::RelativePath;
use tracing::{debug, instrument};

use crate::{PathfsError, PathfsResult};

use super::FsPath;
use super::space::{SpaceInfo, volume_space};
use super::traits::{CopyMode, Pal, ReadSeek};

/* 📖 # Why use std::fs instead of async or other crates?

Every operation is a single blocking host call that returns before the next statement runs.
std::fs covers all of them except the volume space query, which goes to statvfs or
GetDiskFreeSpaceExW directly.
*/

/// Concrete PAL implementation using the host filesystem.
///
/// Relative paths are resolved against a configured base directory; absolute paths are used
/// as they are. With the default base directory `.`, relative paths follow the live process
/// working directory, including changes made through [`Pal::set_current_path`].
#[derive(Debug)]
pub struct RealPal {
    base_dir: PathBuf,
}

impl RealPal {
    /// Create a new RealPal with the given base directory.
    ///
    /// # Arguments
    /// * `base_dir` - Relative paths will be resolved against this directory
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve an FsPath to a host path.
    fn resolve_path(&self, path: &FsPath) -> PathBuf {
        if path.is_absolute() {
            return PathBuf::from(path.as_str());
        }
        let portable = path.as_str().replace(path.style().separator(), "/");
        RelativePath::new(&portable).to_path(&self.base_dir)
    }
}

impl Default for RealPal {
    fn default() -> Self {
        Self::new(PathBuf::from("."))
    }
}

impl Pal for RealPal {
    #[instrument(skip(self), fields(path = %path))]
    fn exists(&self, path: &FsPath) -> PathfsResult<bool> {
        let resolved = self.resolve_path(path);
        let exists = resolved.try_exists().map_err(|e| {
            debug!(error = %e, "failed to check existence");
            PathfsError::io(&resolved, e)
        })?;
        debug!(exists, resolved = %resolved.display(), "checked existence");
        Ok(exists)
    }

    #[instrument(skip(self), fields(path = %path))]
    fn is_directory(&self, path: &FsPath) -> PathfsResult<bool> {
        let resolved = self.resolve_path(path);
        match fs::metadata(&resolved) {
            Ok(metadata) => {
                debug!(is_dir = metadata.is_dir(), "read metadata");
                Ok(metadata.is_dir())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("path not found");
                Ok(false)
            }
            Err(e) => {
                debug!(error = %e, "failed to read metadata");
                Err(PathfsError::io(resolved, e))
            }
        }
    }

    #[instrument(skip(self), fields(path = %path))]
    fn is_symlink(&self, path: &FsPath) -> PathfsResult<bool> {
        let resolved = self.resolve_path(path);
        match fs::symlink_metadata(&resolved) {
            Ok(metadata) => {
                debug!(is_symlink = metadata.is_symlink(), "read link metadata");
                Ok(metadata.is_symlink())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("path not found");
                Ok(false)
            }
            Err(e) => {
                debug!(error = %e, "failed to read link metadata");
                Err(PathfsError::io(resolved, e))
            }
        }
    }

    #[instrument(skip(self), fields(path = %path))]
    fn file_size(&self, path: &FsPath) -> PathfsResult<u64> {
        let resolved = self.resolve_path(path);
        let metadata = fs::metadata(&resolved).map_err(|e| {
            debug!(error = %e, "failed to read metadata");
            PathfsError::io(&resolved, e)
        })?;
        if metadata.is_dir() {
            debug!("path is a directory");
            return Err(PathfsError::io(
                resolved,
                io::Error::new(io::ErrorKind::IsADirectory, "path is a directory"),
            ));
        }
        debug!(size = metadata.len(), "read file size");
        Ok(metadata.len())
    }

    #[instrument(skip(self), fields(path = %path))]
    fn space(&self, path: &FsPath) -> PathfsResult<SpaceInfo> {
        let resolved = self.resolve_path(path);
        let info = volume_space(&resolved).map_err(|e| {
            debug!(error = %e, "failed to query volume space");
            PathfsError::io(&resolved, e)
        })?;
        debug!(
            capacity = info.capacity,
            free = info.free,
            available = info.available,
            "queried volume space"
        );
        Ok(info)
    }

    #[instrument(skip(self))]
    fn current_path(&self) -> PathfsResult<FsPath> {
        let current = env::current_dir().map_err(|e| {
            debug!(error = %e, "failed to get current directory");
            PathfsError::io("<current_dir>", e)
        })?;
        debug!(current = %current.display(), "read current directory");
        host_to_fs_path(&current)
    }

    #[instrument(skip(self), fields(path = %path))]
    fn set_current_path(&self, path: &FsPath) -> PathfsResult<()> {
        let resolved = self.resolve_path(path);
        env::set_current_dir(&resolved).map_err(|e| {
            debug!(error = %e, "failed to change current directory");
            PathfsError::io(&resolved, e)
        })?;
        debug!(resolved = %resolved.display(), "changed current directory");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %path))]
    fn create_directory(&self, path: &FsPath) -> PathfsResult<bool> {
        let resolved = self.resolve_path(path);
        match fs::create_dir(&resolved) {
            Ok(()) => {
                debug!("directory created");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && resolved.is_dir() => {
                debug!("directory already exists");
                Ok(false)
            }
            Err(e) => {
                debug!(error = %e, "failed to create directory");
                Err(PathfsError::io(resolved, e))
            }
        }
    }

    #[instrument(skip(self), fields(path = %path))]
    fn create_directory_all(&self, path: &FsPath) -> PathfsResult<()> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "creating directory and parents");
        fs::create_dir_all(&resolved).map_err(|e| {
            debug!(error = %e, "failed to create directory");
            PathfsError::io(&resolved, e)
        })?;
        debug!("directory created successfully");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %path))]
    fn remove_file(&self, path: &FsPath) -> PathfsResult<()> {
        let resolved = self.resolve_path(path);
        remove_file_or_link(&resolved).map_err(|e| {
            debug!(error = %e, "failed to remove file");
            PathfsError::io(&resolved, e)
        })?;
        debug!("file removed");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %path))]
    fn remove_directory(&self, path: &FsPath) -> PathfsResult<()> {
        let resolved = self.resolve_path(path);
        fs::remove_dir(&resolved).map_err(|e| {
            debug!(error = %e, "failed to remove directory");
            PathfsError::io(&resolved, e)
        })?;
        debug!("directory removed");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %path))]
    fn remove_directory_all(&self, path: &FsPath) -> PathfsResult<()> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "removing directory and contents");
        fs::remove_dir_all(&resolved).map_err(|e| {
            debug!(error = %e, "failed to remove directory");
            PathfsError::io(&resolved, e)
        })?;
        debug!("directory removed successfully");
        Ok(())
    }

    #[instrument(skip(self), fields(from = %from, to = %to))]
    fn copy_file(&self, from: &FsPath, to: &FsPath, mode: CopyMode) -> PathfsResult<u64> {
        let source = self.resolve_path(from);
        let target = self.resolve_path(to);
        let copied = match mode {
            CopyMode::Overwrite => fs::copy(&source, &target).map_err(|e| {
                debug!(error = %e, "failed to copy file");
                PathfsError::io(&source, e)
            })?,
            CopyMode::FailIfExists => {
                let mut reader = fs::File::open(&source).map_err(|e| {
                    debug!(error = %e, "failed to open source");
                    PathfsError::io(&source, e)
                })?;
                let mut writer = fs::OpenOptions::new()
                    .write(true)
                    .create_new(true)
                    .open(&target)
                    .map_err(|e| {
                        debug!(error = %e, "failed to create target");
                        PathfsError::io(&target, e)
                    })?;
                io::copy(&mut reader, &mut writer).map_err(|e| {
                    debug!(error = %e, "failed to copy contents");
                    PathfsError::io(&target, e)
                })?
            }
        };
        debug!(copied, "file copied");
        Ok(copied)
    }

    #[instrument(skip(self), fields(from = %from, to = %to))]
    fn rename(&self, from: &FsPath, to: &FsPath) -> PathfsResult<()> {
        let source = self.resolve_path(from);
        let target = self.resolve_path(to);
        fs::rename(&source, &target).map_err(|e| {
            debug!(error = %e, "failed to rename");
            PathfsError::io(&source, e)
        })?;
        debug!("renamed");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %path))]
    fn read_file(&self, path: &FsPath) -> PathfsResult<Box<dyn ReadSeek + 'static>> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "opening file for reading");
        let file = fs::File::open(&resolved).map_err(|e| {
            debug!(error = %e, "failed to open file");
            PathfsError::io(&resolved, e)
        })?;
        debug!("file opened successfully");
        Ok(Box::new(file))
    }

    #[instrument(skip(self), fields(path = %path))]
    fn create_file(&self, path: &FsPath) -> PathfsResult<Box<dyn Write>> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "creating file");
        let file = fs::File::create(&resolved).map_err(|e| {
            debug!(error = %e, "failed to create file");
            PathfsError::io(&resolved, e)
        })?;
        debug!("file created successfully");
        Ok(Box::new(file))
    }
}

/// Converts a host path into an FsPath, refusing text that is not valid UTF-8.
///
/// A lossy conversion would name a different location, so passing it back to the host would
/// silently act somewhere else.
fn host_to_fs_path(path: &Path) -> PathfsResult<FsPath> {
    match path.to_str() {
        Some(text) => Ok(FsPath::new(text)),
        None => Err(PathfsError::io(
            path,
            io::Error::new(io::ErrorKind::InvalidData, "path is not valid UTF-8"),
        )),
    }
}

/// Windows keeps directory symlinks as directory entries, so they need `remove_dir`.
#[cfg(windows)]
fn remove_file_or_link(path: &Path) -> io::Result<()> {
    use std::os::windows::fs::FileTypeExt;

    if fs::symlink_metadata(path)?.file_type().is_symlink_dir() {
        return fs::remove_dir(path);
    }
    fs::remove_file(path)
}

#[cfg(not(windows))]
fn remove_file_or_link(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}
