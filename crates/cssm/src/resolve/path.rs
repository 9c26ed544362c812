//! Mapping declared module paths to store keys.

use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

/// Maps a declared path, relative to the referencing document's directory,
/// to the key its translations are stored under.
///
/// Any `Fn(&str, &Path) -> PathBuf` closure is a resolver.
pub trait PathResolver: Send + Sync {
    /// Resolve `declared` against `current_dir`.
    fn resolve(&self, declared: &str, current_dir: &Path) -> PathBuf;
}

impl<F> PathResolver for F
where
    F: Fn(&str, &Path) -> PathBuf + Send + Sync,
{
    fn resolve(&self, declared: &str, current_dir: &Path) -> PathBuf {
        self(declared, current_dir)
    }
}

/// Joins onto the current directory and normalizes `.` and `..`
/// lexically. The file system is never consulted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultPathResolver;

impl PathResolver for DefaultPathResolver {
    fn resolve(&self, declared: &str, current_dir: &Path) -> PathBuf {
        normalize(&current_dir.join(declared))
    }
}

/// Lexically normalize a path.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(out.components().next_back(), Some(Component::Normal(_)));
                if can_pop {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }

    out
}

/// A trailing `.` followed by ASCII word characters.
static EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(?-u:\w)+$").expect("valid extension pattern"));

/// Whether the declared path ends in `.<word characters>`.
pub fn has_extension(declared: &str) -> bool {
    EXTENSION.is_match(declared)
}

/// Append `extension` when the declared path has none.
pub fn with_default_extension(declared: &str, extension: &str) -> String {
    if has_extension(declared) {
        declared.to_string()
    } else {
        format!("{declared}{extension}")
    }
}
