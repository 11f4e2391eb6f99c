/* 📖 # Why have pathfs_base as a core library?
pathfs_base provides the path value type, the platform abstraction layer and the error handling
used by every operation. The operations crate builds on it without any host calls of its own.
*/

pub mod error;
mod error_tests;
pub mod pal;
pub mod tracing;

// Re-export commonly used types for convenience
pub use error::{ErrorKind, PathfsError, PathfsResult, ResultExt};
pub use pal::{CopyMode, FsPath, MockPal, Pal, PalHandle, PathStyle, ReadSeek, RealPal, SpaceInfo};
