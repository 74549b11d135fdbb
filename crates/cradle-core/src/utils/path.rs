use std::io;
use std::path::{Path, PathBuf};

/// Full path of the running executable.
pub fn exec_path() -> io::Result<PathBuf> {
    std::env::current_exe()
}

/// Directory containing the running executable.
pub fn exec_dir() -> io::Result<PathBuf> {
    let exe = exec_path()?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("executable path has no parent: {}", exe.display())))
}

/// Resolve `path` against the executable directory. Absolute paths are returned unchanged.
pub fn resolve_exec_path<P: AsRef<Path>>(path: P) -> io::Result<PathBuf> {
    resolve_against(exec_dir()?, path)
}

/// Resolve `path` against `base`. Absolute paths are returned unchanged.
pub fn resolve_against<B: AsRef<Path>, P: AsRef<Path>>(base: B, path: P) -> io::Result<PathBuf> {
    let path = path.as_ref();
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(base.as_ref().join(path))
    }
}

/// Last component of a path string, splitting on both `/` and `\`.
pub fn file_name(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}

/// File name of the running executable, empty if it cannot be determined.
pub fn exec_name() -> String {
    exec_path()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_default()
}
