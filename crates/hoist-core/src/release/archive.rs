//! Naming for packaged release artifacts.

use std::fmt;

use super::ReleaseTag;

/// The `<project>_<tag>` name shared by the per-release build directory
/// (`rel/<name>/`) and the packaged upgrade archive (`rel/<name>.tar.gz`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveName(String);

impl ArchiveName {
    pub fn new(project: &str, tag: &ReleaseTag) -> Self {
        Self(format!("{project}_{tag}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the packaged upgrade archive.
    pub fn tarball(&self) -> String {
        format!("{}.tar.gz", self.0)
    }
}

impl fmt::Display for ArchiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
