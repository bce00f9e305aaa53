//! Local source control for release tagging.
//!
//! Tag reading and creation go through libgit2; pushing shells out to the
//! `git` binary so the user's normal credential helpers apply.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Context;
use git2::{DescribeFormatOptions, DescribeOptions, ObjectType, Repository};
use tracing::debug;

use crate::release::ReleaseTag;

/// Tagging operations on the release repository.
pub trait SourceControl {
    /// Most recent tag reachable from HEAD, or the zero tag when none
    /// parses as a release tag.
    fn latest_tag(&self) -> anyhow::Result<ReleaseTag>;

    /// Create an annotated tag on HEAD.
    fn create_tag(&self, tag: &ReleaseTag, message: &str) -> anyhow::Result<()>;

    /// Push tags to the default remote.
    fn push_tags(&self) -> anyhow::Result<()>;
}

/// Git-backed implementation over a local working copy.
#[derive(Debug, Clone)]
pub struct GitRepo {
    path: PathBuf,
}

impl GitRepo {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> anyhow::Result<Repository> {
        Repository::open(&self.path)
            .with_context(|| format!("Failed to open git repository at {}", self.path.display()))
    }
}

impl SourceControl for GitRepo {
    fn latest_tag(&self) -> anyhow::Result<ReleaseTag> {
        let repo = self.open()?;
        let mut opts = DescribeOptions::new();
        opts.describe_tags();
        let raw = match repo.describe(&opts) {
            Ok(description) => {
                let mut format = DescribeFormatOptions::new();
                format.abbreviated_size(0);
                description.format(Some(&format))?
            }
            // No tag reachable from HEAD
            Err(_) => {
                debug!(path = %self.path.display(), "no tags found, starting from v0.0.0");
                return Ok(ReleaseTag::zero());
            }
        };
        Ok(ReleaseTag::parse_or_zero(&raw))
    }

    fn create_tag(&self, tag: &ReleaseTag, message: &str) -> anyhow::Result<()> {
        let repo = self.open()?;
        let head = repo
            .head()?
            .peel(ObjectType::Commit)
            .context("HEAD does not point at a commit")?;
        let signature = repo.signature()?;
        repo.tag(tag.as_str(), &head, &signature, message, false)
            .with_context(|| format!("Failed to create tag {}", tag))?;
        debug!(%tag, "created annotated tag");
        Ok(())
    }

    fn push_tags(&self) -> anyhow::Result<()> {
        let output = Command::new("git")
            .args(["push", "--tags"])
            .current_dir(&self.path)
            .output()
            .context("Failed to invoke git push")?;
        if !output.status.success() {
            anyhow::bail!(
                "git push --tags failed:\n{}",
                String::from_utf8_lossy(&output.stderr)
            );
        }
        Ok(())
    }
}
