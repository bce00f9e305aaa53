//! Application context for unified dependency injection.

use std::path::PathBuf;

use crate::config::TargetConfig;
use crate::deploy::{DeployCoordinator, DeployOutcome};
use crate::exec::SshExecutor;
use crate::node::NodeHandle;
use crate::provision::Provisioner;
use crate::release::{BumpKind, ReleaseTag};
use crate::rpc::ErlRpc;
use crate::source::{GitRepo, SourceControl};
use crate::status::{self, ReleaseEntry};

/// Unified application context built once per invocation.
///
/// Holds the validated target configuration and the path of the local
/// release repository, and wires the concrete executor, rpc client and
/// coordinators together for the CLI.
#[derive(Debug, Clone)]
pub struct AppContext {
    config: TargetConfig,
    repo_root: PathBuf,
}

impl AppContext {
    /// Create a context for the current directory's working copy.
    pub fn new(config: TargetConfig) -> anyhow::Result<Self> {
        let repo_root = std::env::current_dir()?;
        Self::with_repo_root(config, repo_root)
    }

    /// Create a context with an explicit local repository path.
    pub fn with_repo_root(config: TargetConfig, repo_root: PathBuf) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self { config, repo_root })
    }

    pub fn config(&self) -> &TargetConfig {
        &self.config
    }

    pub fn executor(&self) -> SshExecutor {
        SshExecutor::new(&self.config.host)
    }

    pub fn node_handle(&self) -> NodeHandle {
        NodeHandle::new(self.config.node(), &self.config.host, &self.config.cookie)
    }

    pub fn rpc(&self) -> ErlRpc<SshExecutor> {
        ErlRpc::new(self.executor(), self.node_handle())
    }

    pub fn source(&self) -> GitRepo {
        GitRepo::new(&self.repo_root)
    }

    /// Provision the target host, building the latest tagged release.
    pub fn setup(&self) -> anyhow::Result<ReleaseTag> {
        let tag = self.source().latest_tag()?;
        let exec = self.executor();
        Provisioner::new(&exec, &self.config).provision(&tag)?;
        Ok(tag)
    }

    /// Deploy a new release of the requested kind.
    pub fn deploy(&self, kind: BumpKind, message: &str) -> anyhow::Result<DeployOutcome> {
        let exec = self.executor();
        let source = self.source();
        let rpc = self.rpc();
        DeployCoordinator::new(&exec, &source, &rpc, &self.config).deploy(kind, message)
    }

    /// Query the releases the running node knows about.
    pub fn releases(&self) -> anyhow::Result<Vec<ReleaseEntry>> {
        status::which_releases(&self.rpc())
    }
}
