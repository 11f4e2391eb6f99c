/* 📖 # Why a separate operations crate?

pathfs_base owns the primitives: the path value and one PAL method per host call.
This crate composes them into the operations callers use. Remove decides between file and
directory removal, the directory-sensitive join asks the filesystem first, and every operation
attaches context naming the paths involved. Configuration loading lives here too because it
is just another client of the PAL.
*/

pub mod config;
pub mod mutate;
pub mod query;

pub use config::{Config, StyleSetting, load_config};
pub use mutate::{
    copy, copy_with_mode, create_directories, create_directory, remove, remove_all, rename,
    set_current_path,
};
pub use query::{
    current_path, exists, file_size, file_size_or_zero, is_directory, is_symlink, join_resolved,
    space,
};
