use std::collections::{HashMap, HashSet};
use std::io::{self, Cursor, Write};
use std::sync::{Arc, Mutex};

use crate::{PathfsError, PathfsResult};

use super::FsPath;
use super::space::SpaceInfo;
use super::traits::{CopyMode, Pal, ReadSeek};

/* 📖 # Why use HashMap for MockPal storage?

MockPal uses in-memory storage with Arc<Mutex<T>> for several reasons:
1. **Speed**: No filesystem I/O, deterministic and fast for unit tests
2. **Isolation**: No side effects on the real filesystem or the process working directory
3. **Control**: Easy to set up specific scenarios such as a full volume
4. **Thread-safe**: Mutex allows concurrent test execution

Paths are keyed by their exact text; the mock does no normalization, so tests should build
paths the same way they query them.
*/

/// In-memory PAL implementation for testing.
///
/// # Examples
///
/// ```
/// use pathfs_base::{FsPath, MockPal, Pal};
///
/// let mock = MockPal::new();
/// mock.add_file(FsPath::from("test.txt"), b"content".to_vec());
/// assert_eq!(mock.file_size(&FsPath::from("test.txt")).unwrap(), 7);
/// ```
#[derive(Debug, Clone)]
pub struct MockPal {
    files: Arc<Mutex<HashMap<FsPath, Vec<u8>>>>,
    directories: Arc<Mutex<HashSet<FsPath>>>,
    current_dir: Arc<Mutex<FsPath>>,
    space: Arc<Mutex<SpaceInfo>>,
}

impl MockPal {
    /// Create a new empty MockPal.
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            directories: Arc::new(Mutex::new(HashSet::new())),
            current_dir: Arc::new(Mutex::new(FsPath::default())),
            space: Arc::new(Mutex::new(SpaceInfo::default())),
        }
    }

    /// Add a file to the mock storage.
    pub fn add_file(&self, path: FsPath, content: Vec<u8>) {
        self.files.lock().unwrap().insert(path, content);
    }

    /// Add a directory to the mock storage.
    pub fn add_directory(&self, path: FsPath) {
        self.directories.lock().unwrap().insert(path);
    }

    /// Set the snapshot returned by `space` for every existing path.
    pub fn set_space(&self, info: SpaceInfo) {
        *self.space.lock().unwrap() = info;
    }

    /// Contents of a file, if present.
    pub fn file_contents(&self, path: &FsPath) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(path).cloned()
    }

    fn has_file(&self, path: &FsPath) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn has_directory(&self, path: &FsPath) -> bool {
        self.directories.lock().unwrap().contains(path)
    }

    fn has_children(&self, path: &FsPath) -> bool {
        let is_child = |entry: &FsPath| entry.parent_path() == *path;
        self.files.lock().unwrap().keys().any(is_child)
            || self.directories.lock().unwrap().iter().any(is_child)
    }

    fn error(path: &FsPath, kind: io::ErrorKind, message: &str) -> Box<PathfsError> {
        PathfsError::io(path.as_str(), io::Error::new(kind, format!("{}: {}", message, path)))
    }

    fn not_found(path: &FsPath) -> Box<PathfsError> {
        Self::error(path, io::ErrorKind::NotFound, "No such file or directory")
    }

    /// Whether `entry` lies strictly below `ancestor`.
    fn is_descendant(entry: &FsPath, ancestor: &FsPath) -> bool {
        let prefix = ancestor.join("");
        entry.as_str().starts_with(prefix.as_str())
    }

    fn rebase(entry: &FsPath, from: &FsPath, to: &FsPath) -> FsPath {
        FsPath::with_style(
            format!("{}{}", to.as_str(), &entry.as_str()[from.as_str().len()..]),
            entry.style(),
        )
    }
}

impl Default for MockPal {
    fn default() -> Self {
        Self::new()
    }
}

impl Pal for MockPal {
    fn exists(&self, path: &FsPath) -> PathfsResult<bool> {
        Ok(self.has_file(path) || self.has_directory(path))
    }

    fn is_directory(&self, path: &FsPath) -> PathfsResult<bool> {
        Ok(self.has_directory(path))
    }

    fn is_symlink(&self, _path: &FsPath) -> PathfsResult<bool> {
        // The mock has no links.
        Ok(false)
    }

    fn file_size(&self, path: &FsPath) -> PathfsResult<u64> {
        if let Some(content) = self.files.lock().unwrap().get(path) {
            return Ok(content.len() as u64);
        }
        if self.has_directory(path) {
            return Err(Self::error(
                path,
                io::ErrorKind::IsADirectory,
                "Is a directory",
            ));
        }
        Err(Self::not_found(path))
    }

    fn space(&self, path: &FsPath) -> PathfsResult<SpaceInfo> {
        if !self.exists(path)? {
            return Err(Self::not_found(path));
        }
        Ok(*self.space.lock().unwrap())
    }

    fn current_path(&self) -> PathfsResult<FsPath> {
        Ok(self.current_dir.lock().unwrap().clone())
    }

    fn set_current_path(&self, path: &FsPath) -> PathfsResult<()> {
        if !self.has_directory(path) {
            return Err(Self::not_found(path));
        }
        *self.current_dir.lock().unwrap() = path.clone();
        Ok(())
    }

    fn create_directory(&self, path: &FsPath) -> PathfsResult<bool> {
        if self.has_directory(path) {
            return Ok(false);
        }
        if self.has_file(path) {
            return Err(Self::error(path, io::ErrorKind::AlreadyExists, "File exists"));
        }
        let parent = path.parent_path();
        if !parent.is_empty() && !self.has_directory(&parent) {
            return Err(Self::not_found(&parent));
        }
        self.add_directory(path.clone());
        Ok(true)
    }

    fn create_directory_all(&self, path: &FsPath) -> PathfsResult<()> {
        let mut current = path.clone();
        while !current.is_empty() {
            if self.has_file(&current) {
                return Err(Self::error(&current, io::ErrorKind::AlreadyExists, "File exists"));
            }
            let parent = current.parent_path();
            self.add_directory(current);
            current = parent;
        }
        Ok(())
    }

    fn remove_file(&self, path: &FsPath) -> PathfsResult<()> {
        if self.files.lock().unwrap().remove(path).is_some() {
            return Ok(());
        }
        if self.has_directory(path) {
            return Err(Self::error(
                path,
                io::ErrorKind::IsADirectory,
                "Is a directory",
            ));
        }
        Err(Self::not_found(path))
    }

    fn remove_directory(&self, path: &FsPath) -> PathfsResult<()> {
        if !self.has_directory(path) {
            return Err(Self::not_found(path));
        }
        if self.has_children(path) {
            return Err(Self::error(
                path,
                io::ErrorKind::DirectoryNotEmpty,
                "Directory not empty",
            ));
        }
        self.directories.lock().unwrap().remove(path);
        Ok(())
    }

    fn remove_directory_all(&self, path: &FsPath) -> PathfsResult<()> {
        if !self.has_directory(path) {
            return Err(Self::not_found(path));
        }
        self.files
            .lock()
            .unwrap()
            .retain(|entry, _| !Self::is_descendant(entry, path));
        self.directories
            .lock()
            .unwrap()
            .retain(|entry| entry != path && !Self::is_descendant(entry, path));
        Ok(())
    }

    fn copy_file(&self, from: &FsPath, to: &FsPath, mode: CopyMode) -> PathfsResult<u64> {
        let content = self.file_contents(from).ok_or_else(|| Self::not_found(from))?;
        if mode == CopyMode::FailIfExists && self.exists(to)? {
            return Err(Self::error(to, io::ErrorKind::AlreadyExists, "File exists"));
        }
        let copied = content.len() as u64;
        self.add_file(to.clone(), content);
        Ok(copied)
    }

    fn rename(&self, from: &FsPath, to: &FsPath) -> PathfsResult<()> {
        let moved_file = self.files.lock().unwrap().remove(from);
        if let Some(content) = moved_file {
            self.add_file(to.clone(), content);
            return Ok(());
        }
        if !self.has_directory(from) {
            return Err(Self::not_found(from));
        }

        let mut files = self.files.lock().unwrap();
        let moved_files: Vec<FsPath> = files
            .keys()
            .filter(|entry| Self::is_descendant(entry, from))
            .cloned()
            .collect();
        for entry in moved_files {
            if let Some(content) = files.remove(&entry) {
                files.insert(Self::rebase(&entry, from, to), content);
            }
        }

        let mut directories = self.directories.lock().unwrap();
        let moved_directories: Vec<FsPath> = directories
            .iter()
            .filter(|entry| *entry == from || Self::is_descendant(entry, from))
            .cloned()
            .collect();
        for entry in moved_directories {
            directories.remove(&entry);
            directories.insert(Self::rebase(&entry, from, to));
        }
        Ok(())
    }

    fn read_file(&self, path: &FsPath) -> PathfsResult<Box<dyn ReadSeek + 'static>> {
        let content = self.file_contents(path).ok_or_else(|| Self::not_found(path))?;
        Ok(Box::new(Cursor::new(content)))
    }

    fn create_file(&self, path: &FsPath) -> PathfsResult<Box<dyn Write>> {
        // Return a writer that will store in the mock storage when dropped
        Ok(Box::new(MockFileWriter {
            path: path.clone(),
            files: Arc::clone(&self.files),
            buffer: Vec::new(),
        }))
    }
}

/// Helper struct for writing files to MockPal.
struct MockFileWriter {
    path: FsPath,
    files: Arc<Mutex<HashMap<FsPath, Vec<u8>>>>,
    buffer: Vec<u8>,
}

impl Write for MockFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for MockFileWriter {
    fn drop(&mut self) {
        self.files
            .lock()
            .unwrap()
            .insert(self.path.clone(), std::mem::take(&mut self.buffer));
    }
}
