//! Pluggable scoped name generators.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use super::hash::{string_hash, to_base36};

/// Width of each hash segment in a generated name.
const SEGMENT_WIDTH: usize = 5;

/// 36^5, the number of distinct five-digit base-36 segments.
const SEGMENT_SPACE: u32 = 60_466_176;

/// Seed material identifying the file that owns a class.
#[derive(Debug, Clone, Copy)]
pub struct Seed<'a> {
    /// Resolved path of the owning file.
    pub path: &'a Path,
    /// Source text of the owning file. Empty for files not processed yet.
    pub source: &'a str,
}

impl<'a> Seed<'a> {
    /// Create seed material for a file.
    pub fn new(path: &'a Path, source: &'a str) -> Self {
        Self { path, source }
    }
}

/// Strategy for deriving a scoped name from a class name.
///
/// Implementations must be deterministic: equal inputs give equal names.
/// Any `Fn(&str, &Seed<'_>) -> String` closure is a generator.
pub trait NameGenerator: Send + Sync {
    /// Generate the scoped name for `class_name` owned by the seeded file.
    fn generate(&self, class_name: &str, seed: &Seed<'_>) -> String;
}

impl<F> NameGenerator for F
where
    F: Fn(&str, &Seed<'_>) -> String + Send + Sync,
{
    fn generate(&self, class_name: &str, seed: &Seed<'_>) -> String {
        self(class_name, seed)
    }
}

/// Which part of the seed disambiguates generated names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeedMode {
    /// Hash the file path together with the class name.
    #[default]
    Path,
    /// Hash the file content and append the line of the class's first use.
    ///
    /// Files whose content is not known yet, such as placeholders for
    /// referenced files, fall back to path names.
    Content,
}

/// The built-in generator, producing `_<class>_<hash>_<hash-or-line>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultNameGenerator {
    mode: SeedMode,
}

impl DefaultNameGenerator {
    /// Create a generator using the given seed mode.
    pub fn new(mode: SeedMode) -> Self {
        Self { mode }
    }

    /// The seed mode in use.
    pub fn mode(&self) -> SeedMode {
        self.mode
    }

    fn path_name(class_name: &str, path: &Path) -> String {
        let path = path.to_string_lossy().replace('\\', "/");
        let file_part = fixed_segment(string_hash(&path));
        let class_part = fixed_segment(string_hash(&format!("{class_name}:{path}")));
        format!("_{class_name}_{file_part}_{class_part}")
    }

    fn content_name(class_name: &str, source: &str) -> String {
        let line = match source.find(&format!(".{class_name}")) {
            Some(index) => {
                source[..index]
                    .chars()
                    .filter(|c| matches!(c, '\r' | '\n'))
                    .count()
                    + 1
            }
            None => 1,
        };
        let hash: String = to_base36(string_hash(source))
            .chars()
            .take(SEGMENT_WIDTH)
            .collect();
        format!("_{class_name}_{hash}_{line}")
    }
}

impl NameGenerator for DefaultNameGenerator {
    fn generate(&self, class_name: &str, seed: &Seed<'_>) -> String {
        match self.mode {
            SeedMode::Content if !seed.source.is_empty() => {
                Self::content_name(class_name, seed.source)
            }
            SeedMode::Content | SeedMode::Path => Self::path_name(class_name, seed.path),
        }
    }
}

impl fmt::Display for SeedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path => write!(f, "path"),
            Self::Content => write!(f, "content"),
        }
    }
}

fn fixed_segment(hash: u32) -> String {
    format!("{:0>width$}", to_base36(hash % SEGMENT_SPACE), width = SEGMENT_WIDTH)
}
