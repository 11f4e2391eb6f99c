use std::io;
use std::path::Path;

/// Snapshot of a volume's size, taken once per query.
///
/// All values are in bytes. `free` counts every free byte on the volume, `available` only the
/// bytes the calling user may allocate (quotas and reserved blocks excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpaceInfo {
    pub capacity: u64,
    pub free: u64,
    pub available: u64,
}

/// Queries the volume containing `path` via `statvfs`.
#[cfg(unix)]
#[allow(
    clippy::unnecessary_cast,
    reason = "statvfs field widths differ between unix targets"
)]
pub(crate) fn volume_space(path: &Path) -> io::Result<SpaceInfo> {
    use std::ffi::CString;
    use std::mem;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "path contains an interior nul byte",
        )
    })?;

    // SAFETY: All-zero is a valid initial value for this type.
    let mut stat: libc::statvfs = unsafe { mem::zeroed() };

    // SAFETY: c_path is nul-terminated and outlives the call, stat is a valid out pointer.
    let result = unsafe { libc::statvfs(c_path.as_ptr(), &raw mut stat) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }

    let fragment_size = stat.f_frsize as u64;
    Ok(SpaceInfo {
        capacity: (stat.f_blocks as u64).saturating_mul(fragment_size),
        free: (stat.f_bfree as u64).saturating_mul(fragment_size),
        available: (stat.f_bavail as u64).saturating_mul(fragment_size),
    })
}

/// Queries the volume containing `path` via `GetDiskFreeSpaceExW`.
///
/// The call only accepts directories, so a file is measured through its parent directory.
#[cfg(windows)]
pub(crate) fn volume_space(path: &Path) -> io::Result<SpaceInfo> {
    use std::fs;
    use std::iter;
    use std::os::windows::ffi::OsStrExt;

    use windows::Win32::Storage::FileSystem::GetDiskFreeSpaceExW;
    use windows::core::PCWSTR;

    let directory = if fs::metadata(path)?.is_dir() {
        path
    } else {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    };

    let wide: Vec<u16> = directory
        .as_os_str()
        .encode_wide()
        .chain(iter::once(0))
        .collect();

    let mut available = 0_u64;
    let mut capacity = 0_u64;
    let mut free = 0_u64;

    // SAFETY: wide is nul-terminated and outlives the call, the out pointers are valid.
    unsafe {
        GetDiskFreeSpaceExW(
            PCWSTR(wide.as_ptr()),
            Some(&raw mut available),
            Some(&raw mut capacity),
            Some(&raw mut free),
        )
    }
    .map_err(|_| io::Error::last_os_error())?;

    Ok(SpaceInfo {
        capacity,
        free,
        available,
    })
}
