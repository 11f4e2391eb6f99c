use std::fs;
use std::io::Write;

use pathfs_base::tracing::init_tracing;
use pathfs_base::{CopyMode, ErrorKind, FsPath, PalHandle, RealPal};
use pathfs_ops::{
    Config, copy, copy_with_mode, create_directories, create_directory, exists, file_size,
    file_size_or_zero, is_directory, is_symlink, join_resolved, load_config, remove, remove_all,
    rename, space,
};
use tempfile::TempDir;

fn setup() -> (TempDir, PalHandle) {
    // Only the first test to get here installs the subscriber.
    let _ = init_tracing();
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let pal = PalHandle::new(RealPal::new(temp_dir.path().to_path_buf()));
    (temp_dir, pal)
}

fn write_bytes(pal: &PalHandle, path: &FsPath, content: &[u8]) {
    let mut writer = pal.create_file(path).unwrap();
    writer.write_all(content).unwrap();
}

#[test]
fn create_query_and_remove_directory() {
    let (_temp_dir, pal) = setup();
    let dir = FsPath::from("X");

    assert!(create_directory(&pal, &dir).unwrap());
    assert!(exists(&pal, &dir).unwrap());
    assert!(is_directory(&pal, &dir).unwrap());

    remove(&pal, &dir).unwrap();
    assert!(!exists(&pal, &dir).unwrap());
}

#[test]
fn file_size_of_missing_and_written_file() {
    let (_temp_dir, pal) = setup();
    let missing = FsPath::from("missing.bin");
    let answer = FsPath::from("answer.bin");
    write_bytes(&pal, &answer, &[b'*'; 42]);

    assert!(file_size(&pal, &missing).unwrap_err().is_not_found());
    assert_eq!(file_size_or_zero(&pal, &missing), 0);
    assert_eq!(file_size(&pal, &answer).unwrap(), 42);
}

#[test]
fn copy_then_compare_sizes() {
    let (_temp_dir, pal) = setup();
    let a = FsPath::from("a.txt");
    let b = FsPath::from("b.txt");
    write_bytes(&pal, &a, b"some text worth copying");

    copy(&pal, &a, &b).unwrap();

    assert!(exists(&pal, &b).unwrap());
    assert_eq!(file_size(&pal, &b).unwrap(), file_size(&pal, &a).unwrap());
}

#[test]
fn copy_fail_if_exists_keeps_destination() {
    let (temp_dir, pal) = setup();
    let a = FsPath::from("a.txt");
    let b = FsPath::from("b.txt");
    write_bytes(&pal, &a, b"new");
    write_bytes(&pal, &b, b"original");

    let err = copy_with_mode(&pal, &a, &b, CopyMode::FailIfExists).unwrap_err();

    assert!(matches!(err.kind(), ErrorKind::AlreadyExists { .. }));
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("b.txt")).unwrap(),
        "original"
    );
}

#[test]
fn join_resolved_inserts_one_separator_per_directory() {
    let (_temp_dir, pal) = setup();
    let dir = FsPath::from("dir");
    create_directories(&pal, &dir.join("a")).unwrap();

    let a = join_resolved(&pal, &dir, "a").unwrap();
    let b = join_resolved(&pal, &a, "b").unwrap();

    assert_eq!(a, dir.join("a"));
    assert_eq!(b, dir.join("a").join("b"));
}

#[test]
fn join_resolved_onto_file_concatenates() {
    let (_temp_dir, pal) = setup();
    let log = FsPath::from("app.log");
    write_bytes(&pal, &log, b"line\n");

    assert_eq!(join_resolved(&pal, &log, ".1").unwrap(), FsPath::from("app.log.1"));
}

#[test]
fn rename_and_remove_tree() {
    let (_temp_dir, pal) = setup();
    let old = FsPath::from("old");
    let new = FsPath::from("new");
    create_directories(&pal, &old.join("nested")).unwrap();
    write_bytes(&pal, &old.join("nested").join("f.txt"), b"x");

    rename(&pal, &old, &new).unwrap();
    assert!(!exists(&pal, &old).unwrap());
    assert!(exists(&pal, &new.join("nested").join("f.txt")).unwrap());

    assert!(remove(&pal, &new).is_err());
    remove_all(&pal, &new).unwrap();
    assert!(!exists(&pal, &new).unwrap());
}

#[test]
fn space_of_workspace_volume() {
    let (_temp_dir, pal) = setup();
    let info = space(&pal, &FsPath::from(".")).unwrap();
    assert!(info.capacity > 0);
    assert!(info.available <= info.capacity);
}

#[test]
fn config_opens_pal_at_base_directory() {
    let (temp_dir, pal) = setup();
    let workspace = temp_dir.path().join("workspace");
    fs::create_dir(&workspace).unwrap();
    fs::write(workspace.join("inside.txt"), "hi").unwrap();

    let base = workspace.to_string_lossy().replace('\\', "\\\\");
    write_bytes(
        &pal,
        &FsPath::from("pathfs.toml"),
        format!("base_directory = \"{}\"\n", base).as_bytes(),
    );

    let config: Config = load_config(&pal, &FsPath::from("pathfs.toml")).unwrap();
    let workspace_pal = config.open_pal();

    assert!(exists(&workspace_pal, &config.path("inside.txt")).unwrap());
}

#[cfg(unix)]
#[test]
fn remove_deletes_directory_link_but_not_target() {
    let (temp_dir, pal) = setup();
    let target = FsPath::from("target");
    let link = FsPath::from("link");
    create_directory(&pal, &target).unwrap();
    write_bytes(&pal, &target.join("kept.txt"), b"keep me");
    std::os::unix::fs::symlink(temp_dir.path().join("target"), temp_dir.path().join("link"))
        .unwrap();

    assert!(is_symlink(&pal, &link).unwrap());
    assert!(is_directory(&pal, &link).unwrap());

    remove(&pal, &link).unwrap();

    assert!(!exists(&pal, &link).unwrap());
    assert!(!is_symlink(&pal, &link).unwrap());
    assert!(exists(&pal, &target.join("kept.txt")).unwrap());
}

#[cfg(unix)]
#[test]
fn remove_all_on_directory_link_keeps_target_contents() {
    let (temp_dir, pal) = setup();
    let target = FsPath::from("target");
    let link = FsPath::from("link");
    create_directories(&pal, &target.join("inner")).unwrap();
    write_bytes(&pal, &target.join("inner").join("kept.txt"), b"keep me");
    std::os::unix::fs::symlink(temp_dir.path().join("target"), temp_dir.path().join("link"))
        .unwrap();

    remove_all(&pal, &link).unwrap();

    assert!(!exists(&pal, &link).unwrap());
    assert!(exists(&pal, &target.join("inner").join("kept.txt")).unwrap());
}
