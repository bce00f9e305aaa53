//! Hoist Core Library
//!
//! Provides the domain logic for provisioning a remote host, building
//! versioned releases of a running OTP-style application, and performing
//! hot in-place upgrades through the remote release handler.

pub mod config;
pub mod context;
pub mod deploy;
pub mod exec;
pub mod node;
pub mod provision;
pub mod release;
pub mod rpc;
pub mod source;
pub mod status;
pub mod upgrade;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{ConfigStore, HoistConfig, TargetConfig};

    // Releases
    pub use crate::release::{ArchiveName, BumpKind, ReleaseTag};

    // Remote execution
    pub use crate::exec::{CommandOutput, Executor, SshExecutor};

    // Node / RPC
    pub use crate::node::{NodeHandle, ProbeIdentity};
    pub use crate::rpc::{ErlRpc, Liveness, ReleaseOp, ReleaseRpc, RpcOutcome};

    // Coordinators
    pub use crate::deploy::{DeployCoordinator, DeployOutcome};
    pub use crate::provision::{Provisioner, UserOutcome};
    pub use crate::upgrade::{HotUpgrader, UpgradeError, UpgradeReport, UpgradeStep};

    // Source control
    pub use crate::source::{GitRepo, SourceControl};

    // Context
    pub use crate::context::AppContext;
}
