/* 📖 # What is the Platform Abstraction Layer?

The PAL provides a trait-based abstraction over host filesystem calls, enabling testable code.
Key benefits:
- Testability: MockPal allows deterministic unit tests without filesystem access
- Flexibility: Switch between the host filesystem and in-memory implementations
- Consistency: All filesystem operations use the same error handling

FsPath lives here as well because it is the currency every PAL call is made in.
*/

mod fs_path;
pub mod mock;
pub mod real_pal;
mod space;
mod traits;

pub use fs_path::{FsPath, PathStyle};
pub use mock::MockPal;
pub use real_pal::RealPal;
pub use space::SpaceInfo;
pub use traits::{CopyMode, Pal, PalHandle, ReadSeek};
