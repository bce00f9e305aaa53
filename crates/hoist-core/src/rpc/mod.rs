//! Release-handler RPC against a live node.
//!
//! The remote surface is three mutating operations plus one read-only query,
//! all on the node's `release_handler` module. Operations are fixed and
//! parameterized ([`ReleaseOp`]); their single string argument is always a
//! typed value ([`ArchiveName`] or [`ReleaseTag`]) whose character set is
//! validated at construction, so nothing free-form ever reaches the remote
//! evaluator.

use crate::node::NodeHandle;
use crate::release::{ArchiveName, ReleaseTag};

mod erl;

pub use erl::ErlRpc;

/// Result of the liveness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Reachable,
    Unreachable,
}

/// Outcome of a single release-handler call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcOutcome {
    /// The call succeeded; carries the node's printed reply.
    Ok(String),
    /// The call was delivered but the release handler reported an error.
    Error(String),
}

/// One of the fixed release-handler operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOp {
    /// Make the new release's code available without activating it.
    UnpackRelease(ArchiveName),
    /// Hot-swap the live process onto the unpacked release.
    InstallRelease(ReleaseTag),
    /// Mark the installed release as the cold-boot version.
    MakePermanent(ReleaseTag),
    /// Read-only query of known releases and their status.
    WhichReleases,
}

impl ReleaseOp {
    /// Remote module every operation lives in.
    pub fn module(&self) -> &'static str {
        "release_handler"
    }

    pub fn function(&self) -> &'static str {
        match self {
            Self::UnpackRelease(_) => "unpack_release",
            Self::InstallRelease(_) => "install_release",
            Self::MakePermanent(_) => "make_permanent",
            Self::WhichReleases => "which_releases",
        }
    }

    /// The single string argument, if the operation takes one.
    pub fn argument(&self) -> Option<&str> {
        match self {
            Self::UnpackRelease(archive) => Some(archive.as_str()),
            Self::InstallRelease(tag) | Self::MakePermanent(tag) => Some(tag.as_str()),
            Self::WhichReleases => None,
        }
    }
}

/// Calls into the release handler of a running node.
///
/// Every call, the probe included, opens a fresh ephemeral identity on the
/// transport and discards it afterwards.
pub trait ReleaseRpc {
    /// The node this client talks to.
    fn node(&self) -> &NodeHandle;

    /// Ping the node to check it is reachable before touching it.
    fn ping(&self) -> anyhow::Result<Liveness>;

    /// Invoke one release-handler operation.
    fn call(&self, op: &ReleaseOp) -> anyhow::Result<RpcOutcome>;
}
