use std::path::{Path, PathBuf};

use crate::utils::path::{exec_dir, exec_name, exec_path, file_name, resolve_against, resolve_exec_path};

#[test]
fn test_exec_dir_contains_executable() {
    let exe = exec_path().unwrap();
    let dir = exec_dir().unwrap();
    assert_eq!(exe.parent(), Some(dir.as_path()));
    assert!(!exec_name().is_empty());
    assert_eq!(exe.file_name().unwrap().to_string_lossy(), exec_name());
}

#[test]
fn test_resolve_relative_path_against_exec_dir() {
    let resolved = resolve_exec_path("config.json").unwrap();
    assert!(resolved.is_absolute());
    assert_eq!(resolved, exec_dir().unwrap().join("config.json"));
}

#[test]
fn test_resolve_keeps_absolute_path() {
    let tmp = tempfile::tempdir().unwrap();
    let absolute = tmp.path().join("settings.toml");
    assert_eq!(resolve_exec_path(&absolute).unwrap(), absolute);
    assert_eq!(resolve_against("/somewhere/else", &absolute).unwrap(), absolute);
}

#[test]
fn test_resolve_against_base() {
    let resolved = resolve_against(Path::new("/opt/app"), "conf/app.json").unwrap();
    assert_eq!(resolved, PathBuf::from("/opt/app/conf/app.json"));
}

#[test]
fn test_file_name_splits_on_both_separators() {
    assert_eq!(file_name("/usr/local/bin/tool"), "tool");
    assert_eq!(file_name(r"C:\Program Files\tool.exe"), "tool.exe");
    assert_eq!(file_name(r"mixed/dir\name"), "name");
    assert_eq!(file_name("plain"), "plain");
    assert_eq!(file_name("trailing/"), "");
}
