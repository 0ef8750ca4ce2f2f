//! Lexical path helpers. Nothing here touches the filesystem.

use std::path::{Component, Path, PathBuf};

/// Lexically normalize `path`: drop `.` components, fold `..` against the
/// preceding component where possible and remove duplicate separators.
pub fn clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(comp),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(if path.as_os_str().is_empty() { "" } else { "." });
    }
    out.iter().collect()
}

/// Resolve `arg` against `dir`. Absolute arguments are kept as they are.
pub fn resolve(dir: &str, arg: &str) -> String {
    clean(&Path::new(dir).join(arg)).to_string_lossy().into_owned()
}

/// The directory `levels` steps above `path`.
pub fn ancestor(path: &str, levels: usize) -> String {
    let mut p = Path::new(path);
    for _ in 0..levels {
        p = p.parent().unwrap_or(p);
    }
    p.to_string_lossy().into_owned()
}

/// `path` relative to `base`, if it lies underneath it.
pub fn relative_to(base: &str, path: &str) -> Option<String> {
    if base.is_empty() {
        return None;
    }
    let base = clean(Path::new(base));
    let path = clean(Path::new(path));
    path.strip_prefix(&base)
        .ok()
        .map(|rel| rel.to_string_lossy().into_owned())
}

/// Split off the first slash-delimited component. The prefix keeps its
/// slash so that `prefix + tail == path`; without a slash the prefix is empty.
pub fn split_prefix(path: &str) -> (&str, &str) {
    match path.find('/') {
        Some(i) => path.split_at(i + 1),
        None => ("", path),
    }
}
