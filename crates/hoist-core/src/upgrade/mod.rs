//! Hot-upgrade coordinator.
//!
//! Drives a running node through the three-phase release activation:
//! unpack the staged archive, install (hot code load, no restart), then make
//! the installed release permanent so it survives a cold boot. A liveness
//! probe gates the whole sequence; if the node does not answer, no mutating
//! call is issued at all.
//!
//! The sequence halts on the first failed step. There is no rollback of a
//! partially completed sequence, so a failure can leave the node
//! unpacked-but-not-installed or installed-but-not-permanent; the error
//! carries the raw remote output so the operator can see where it stopped.

use std::fmt;

use thiserror::Error;
use tracing::info;

use crate::release::{ArchiveName, ReleaseTag};
use crate::rpc::{Liveness, ReleaseOp, ReleaseRpc, RpcOutcome};

/// One phase of the activation sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeStep {
    Unpack,
    Install,
    MakePermanent,
}

impl fmt::Display for UpgradeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unpack => "unpack_release",
            Self::Install => "install_release",
            Self::MakePermanent => "make_permanent",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum UpgradeError {
    /// The liveness probe failed; the activation sequence was not started.
    #[error("node '{node}' is unreachable; no release calls were issued")]
    NodeUnreachable { node: String },

    /// A step was delivered but the release handler rejected it. Later steps
    /// were skipped; the node may be left mid-sequence.
    #[error("remote {step} of '{argument}' failed: {output}")]
    StepFailed {
        step: UpgradeStep,
        argument: String,
        output: String,
    },

    /// The transport itself failed.
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

/// What a successful activation did, for operator display.
#[derive(Debug, Clone)]
pub struct UpgradeReport {
    pub tag: ReleaseTag,
    /// Steps completed, in order, with the node's reply to each.
    pub completed: Vec<(UpgradeStep, String)>,
}

/// Coordinates the three-phase activation against a reachable node.
pub struct HotUpgrader<'a, R: ReleaseRpc> {
    rpc: &'a R,
}

impl<'a, R: ReleaseRpc> HotUpgrader<'a, R> {
    pub fn new(rpc: &'a R) -> Self {
        Self { rpc }
    }

    /// Activate `new_tag` on the node.
    ///
    /// Expects the packaged archive for `archive` to already be staged under
    /// `active_release/releases/` on the target host.
    pub fn upgrade(
        &self,
        archive: &ArchiveName,
        new_tag: &ReleaseTag,
    ) -> Result<UpgradeReport, UpgradeError> {
        if self.rpc.ping()? == Liveness::Unreachable {
            return Err(UpgradeError::NodeUnreachable {
                node: self.rpc.node().name().to_string(),
            });
        }

        let steps = [
            (UpgradeStep::Unpack, ReleaseOp::UnpackRelease(archive.clone())),
            (UpgradeStep::Install, ReleaseOp::InstallRelease(new_tag.clone())),
            (
                UpgradeStep::MakePermanent,
                ReleaseOp::MakePermanent(new_tag.clone()),
            ),
        ];

        let mut completed = Vec::with_capacity(steps.len());
        for (step, op) in steps {
            let argument = op.argument().unwrap_or_default().to_string();
            match self.rpc.call(&op)? {
                RpcOutcome::Ok(reply) => {
                    info!(step = %step, %argument, "activation step succeeded");
                    completed.push((step, reply));
                }
                RpcOutcome::Error(output) => {
                    return Err(UpgradeError::StepFailed {
                        step,
                        argument,
                        output,
                    });
                }
            }
        }

        Ok(UpgradeReport {
            tag: new_tag.clone(),
            completed,
        })
    }
}
