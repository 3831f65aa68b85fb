//! Path normalization utilities.
//!
//! - `normalize_path` - absolute, lexically cleaned paths for output files
//! - `relative_to` - relative reference from one directory to a target path

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Output files usually don't exist yet, so this never touches the file
/// system: relative paths are joined onto `base` and `.`/`..` are folded
/// lexically.
///
/// # Example
/// ```ignore
/// let abs = normalize_path(Path::new("./src/../icon/Icon.tsx"), Path::new("/app"));
/// assert_eq!(abs, PathBuf::from("/app/icon/Icon.tsx"));
/// ```
pub fn normalize_path(path: &Path, base: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Relative reference from directory `from_dir` to `target`, in URL form.
///
/// Always uses `/` separators and is prefixed with `./` unless it already
/// climbs out with `../`, so the result can be dropped into an `import`
/// statement or a CSS `url()` as-is.
///
/// # Examples
/// ```ignore
/// relative_to(Path::new("/a/icon"), Path::new("/a/icon/assets"))  -> "./assets"
/// relative_to(Path::new("/a/comp"), Path::new("/a/style/x.css"))  -> "../style/x.css"
/// ```
pub fn relative_to(from_dir: &Path, target: &Path) -> String {
    let relative = pathdiff::diff_paths(target, from_dir).unwrap_or_else(|| target.to_path_buf());

    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();

    let joined = parts.join("/");
    if joined.is_empty() {
        ".".to_owned()
    } else if joined.starts_with("../") || joined == ".." {
        joined
    } else {
        format!("./{joined}")
    }
}

/// Parent directory of a file path (empty path if there is none).
pub fn parent_dir(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new(""))
}
