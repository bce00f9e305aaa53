//! Release deployment coordinator.
//!
//! Sequences one deployment end to end: derive the next tag, record it in
//! source history, rebuild on the target against the previous release, stage
//! the packaged upgrade, then hand over to the hot-upgrade coordinator. The
//! liveness probe inside the upgrade step still gates all release-handler
//! calls, so an unreachable node aborts before any remote activation.

use tracing::info;

use crate::config::TargetConfig;
use crate::exec::Executor;
use crate::release::{ArchiveName, BumpKind, ReleaseTag};
use crate::rpc::ReleaseRpc;
use crate::source::SourceControl;
use crate::upgrade::{HotUpgrader, UpgradeReport};

/// What a finished deployment produced.
#[derive(Debug, Clone)]
pub struct DeployOutcome {
    pub previous: ReleaseTag,
    pub new: ReleaseTag,
    pub report: UpgradeReport,
}

pub struct DeployCoordinator<'a, E: Executor, S: SourceControl, R: ReleaseRpc> {
    exec: &'a E,
    source: &'a S,
    rpc: &'a R,
    config: &'a TargetConfig,
}

impl<'a, E: Executor, S: SourceControl, R: ReleaseRpc> DeployCoordinator<'a, E, S, R> {
    pub fn new(exec: &'a E, source: &'a S, rpc: &'a R, config: &'a TargetConfig) -> Self {
        Self {
            exec,
            source,
            rpc,
            config,
        }
    }

    /// Deploy a new release of the requested kind, tagged with `message`.
    pub fn deploy(&self, kind: BumpKind, message: &str) -> anyhow::Result<DeployOutcome> {
        let previous = self.source.latest_tag()?;
        let new = previous.bumped(kind);
        info!(%previous, %new, "deploying release");

        self.source.create_tag(&new, message)?;
        self.source.push_tags()?;

        self.update_remote_sources()?;
        self.build_upgrade(&previous, &new)?;

        let archive = ArchiveName::new(&self.config.project, &new);
        let report = HotUpgrader::new(self.rpc).upgrade(&archive, &new)?;

        Ok(DeployOutcome {
            previous,
            new,
            report,
        })
    }

    fn update_remote_sources(&self) -> anyhow::Result<()> {
        self.exec
            .sudo_in(&self.config.code_root(), &["git", "pull"])?
            .ensure_success("git pull")?;
        Ok(())
    }

    /// Build the upgrade package against the previous release and stage it
    /// where the release handler looks for archives.
    fn build_upgrade(&self, previous: &ReleaseTag, new: &ReleaseTag) -> anyhow::Result<()> {
        let code_root = self.config.code_root();
        let previous_archive = ArchiveName::new(&self.config.project, previous);
        let new_archive = ArchiveName::new(&self.config.project, new);
        let previous_arg = format!("previous_release={previous_archive}");
        let tarball = format!("rel/{}", new_archive.tarball());

        let steps: [&[&str]; 6] = [
            &["./rebar", "get-deps"],
            &["./rebar", "compile", "generate"],
            &["./rebar", "generate-appups", previous_arg.as_str()],
            &["./rebar", "generate-upgrade", previous_arg.as_str()],
            &["mkdir", "-p", "active_release/releases"],
            &["mv", tarball.as_str(), "active_release/releases/"],
        ];
        for argv in steps {
            self.exec
                .sudo_in(&code_root, argv)?
                .ensure_success(&argv.join(" "))?;
        }
        info!(archive = %new_archive, "upgrade package staged");
        Ok(())
    }
}
