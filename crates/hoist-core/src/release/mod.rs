//! Release tags and version bumping.
//!
//! A release tag has the shape `v<major>.<minor>.<patch>[+<build>]`. Build
//! metadata is kept on parsed tags for display but never participates in
//! ordering or bump computation. Anything that does not match the expected
//! shape degrades to the zero tag `v0.0.0`.

use std::fmt;

use semver::Version;

mod archive;

pub use archive::ArchiveName;

/// Which component of the version triple to increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpKind {
    /// Increment major, reset minor and patch.
    Major,
    /// Increment minor, reset patch.
    Minor,
    /// Increment patch only.
    Patch,
}

/// A release tag attached to a packaged build.
///
/// Equality and ordering consider only the numeric triple; the raw string is
/// preserved so a tag read from history round-trips with its build metadata.
#[derive(Debug, Clone)]
pub struct ReleaseTag {
    major: u64,
    minor: u64,
    patch: u64,
    raw: String,
}

impl ReleaseTag {
    /// The zero tag used when no parseable tag exists in history.
    pub fn zero() -> Self {
        Self {
            major: 0,
            minor: 0,
            patch: 0,
            raw: "v0.0.0".to_string(),
        }
    }

    /// Build a tag from an explicit triple.
    pub fn from_parts(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            raw: format!("v{major}.{minor}.{patch}"),
        }
    }

    /// Parse a tag string, falling back to the zero tag on any mismatch.
    ///
    /// Accepts `v1.2.3` and `v1.2.3+build.7`; the metadata after `+` is
    /// ignored for the numeric triple but retained in the raw form.
    pub fn parse_or_zero(raw: &str) -> Self {
        Self::try_parse(raw).unwrap_or_else(Self::zero)
    }

    fn try_parse(raw: &str) -> Option<Self> {
        let rest = raw.strip_prefix('v')?;
        let version = Version::parse(rest).ok()?;
        if !version.pre.is_empty() {
            return None;
        }
        Some(Self {
            major: version.major,
            minor: version.minor,
            patch: version.patch,
            raw: raw.to_string(),
        })
    }

    /// Compute the next tag for the given bump kind.
    ///
    /// Exactly one component is incremented; lower-order components reset to
    /// zero. The result carries no build metadata.
    pub fn bumped(&self, kind: BumpKind) -> Self {
        match kind {
            BumpKind::Major => Self::from_parts(self.major + 1, 0, 0),
            BumpKind::Minor => Self::from_parts(self.major, self.minor + 1, 0),
            BumpKind::Patch => Self::from_parts(self.major, self.minor, self.patch + 1),
        }
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    /// The tag as it appears in source history, metadata included.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialEq for ReleaseTag {
    fn eq(&self, other: &Self) -> bool {
        (self.major, self.minor, self.patch) == (other.major, other.minor, other.patch)
    }
}

impl Eq for ReleaseTag {}

/// Check that a project name is safe to embed in remote paths and
/// release-handler arguments.
pub fn validate_project_name(name: &str) -> anyhow::Result<()> {
    let mut chars = name.chars();
    let valid_first = chars
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
    let valid_rest = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !valid_first || !valid_rest {
        anyhow::bail!(
            "Invalid project name '{}': expected lowercase letters, digits and underscores",
            name
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests;
