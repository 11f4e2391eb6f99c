use std::io::{Read, Seek, Write};
use std::sync::Arc;

use crate::PathfsResult;

use super::fs_path::FsPath;
use super::space::SpaceInfo;

/// Trait combining Read + Seek for file operations.
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

/// What a copy does when the destination already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyMode {
    /// Replace the destination's contents.
    #[default]
    Overwrite,
    /// Fail with `ErrorKind::AlreadyExists`.
    FailIfExists,
}

/* 📖 # Why is Pal a trait instead of a struct?

Using a trait enables two key benefits:
1. **Testability**: MockPal implements Pal for fast, deterministic tests without filesystem side effects
2. **Flexibility**: Code depends on the abstraction, not the concrete implementation

Each method is one host primitive. Composite behaviour (remove deciding between file and
directory, joining depending on directory-ness) lives in `pathfs_ops` on top of these.
*/

/// Platform Abstraction Layer (PAL) trait providing filesystem primitives.
///
/// Two implementations are provided:
/// - `RealPal`: Uses the host filesystem via `std::fs` and native volume queries
/// - `MockPal`: In-memory implementation for testing
pub trait Pal: std::fmt::Debug + Send + Sync + 'static {
    /// Check whether anything exists at the given path.
    ///
    /// A missing path is `Ok(false)`; failures to find out (e.g. permission) are errors.
    fn exists(&self, path: &FsPath) -> PathfsResult<bool>;

    /// Check whether the path is a directory. Reads metadata on every call.
    ///
    /// A missing path is `Ok(false)`.
    fn is_directory(&self, path: &FsPath) -> PathfsResult<bool>;

    /// Check whether `path` itself is a symbolic link, without following it.
    ///
    /// A missing path is `Ok(false)`.
    fn is_symlink(&self, path: &FsPath) -> PathfsResult<bool>;

    /// Size in bytes of the regular file at `path`.
    fn file_size(&self, path: &FsPath) -> PathfsResult<u64>;

    /// Capacity and free space of the volume containing `path`.
    fn space(&self, path: &FsPath) -> PathfsResult<SpaceInfo>;

    /// The process working directory.
    fn current_path(&self) -> PathfsResult<FsPath>;

    /// Change the process working directory.
    fn set_current_path(&self, path: &FsPath) -> PathfsResult<()>;

    /// Create a single directory.
    ///
    /// Returns `Ok(true)` if it was created and `Ok(false)` if a directory was already there.
    fn create_directory(&self, path: &FsPath) -> PathfsResult<bool>;

    /// Create a directory and all parent directories.
    fn create_directory_all(&self, path: &FsPath) -> PathfsResult<()>;

    /// Delete a file or a symbolic link. A link is removed, never its target.
    fn remove_file(&self, path: &FsPath) -> PathfsResult<()>;

    /// Delete an empty directory.
    fn remove_directory(&self, path: &FsPath) -> PathfsResult<()>;

    /// Remove a directory and all its contents.
    fn remove_directory_all(&self, path: &FsPath) -> PathfsResult<()>;

    /// Copy a file's contents, returning the number of bytes copied.
    fn copy_file(&self, from: &FsPath, to: &FsPath, mode: CopyMode) -> PathfsResult<u64>;

    /// Move or rename a file or directory.
    fn rename(&self, from: &FsPath, to: &FsPath) -> PathfsResult<()>;

    /// Open a file for reading.
    fn read_file(&self, path: &FsPath) -> PathfsResult<Box<dyn ReadSeek + 'static>>;

    /// Read entire file contents as a UTF-8 string.
    fn read_file_to_string(&self, path: &FsPath) -> PathfsResult<String> {
        let mut reader = self.read_file(path)?;
        let mut contents = Vec::new();
        reader
            .read_to_end(&mut contents)
            .map_err(|e| crate::PathfsError::io(path.as_str(), e))?;
        String::from_utf8(contents).map_err(|_e| crate::err!("File is not valid UTF-8: {}", path))
    }

    /// Create a new file, overwriting if it exists.
    fn create_file(&self, path: &FsPath) -> PathfsResult<Box<dyn Write>>;
}

/* 📖 # Why use Arc<dyn Pal> with PalHandle?

Arc enables cheap cloning of the entire PAL implementation, allowing it to be
shared across multiple parts of the application (thread-safe via dyn Pal bounds).
PalHandle wraps this for ergonomic Deref access and Clone support.
*/

/// Handle to a PAL implementation, enabling shared ownership.
///
/// # Examples
///
/// ```no_run
/// use pathfs_base::{PalHandle, RealPal};
///
/// let pal = PalHandle::new(RealPal::new(".".into()));
/// let pal_clone = pal.clone(); // Cheap clone, shares the same implementation
/// ```
#[derive(Debug, Clone)]
pub struct PalHandle(Arc<dyn Pal>);

impl PalHandle {
    /// Create a new PalHandle from a Pal implementation.
    pub fn new(pal: impl Pal + 'static) -> Self {
        Self(Arc::new(pal))
    }
}

impl std::ops::Deref for PalHandle {
    type Target = dyn Pal;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}
