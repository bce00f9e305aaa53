//! Hot-upgrade coordinator behavior against stub nodes.

use std::cell::RefCell;

use hoist_core::node::NodeHandle;
use hoist_core::release::{ArchiveName, ReleaseTag};
use hoist_core::rpc::{Liveness, ReleaseOp, ReleaseRpc, RpcOutcome};
use hoist_core::upgrade::{HotUpgrader, UpgradeError, UpgradeStep};

/// Records every call; never mutates anything.
struct StubRpc {
    node: NodeHandle,
    liveness: Liveness,
    /// Function name that should report an error, if any.
    fail_on: Option<&'static str>,
    calls: RefCell<Vec<ReleaseOp>>,
}

impl StubRpc {
    fn reachable() -> Self {
        Self {
            node: NodeHandle::new("myapp", "tambur.io", "secret"),
            liveness: Liveness::Reachable,
            fail_on: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    fn unreachable() -> Self {
        Self {
            liveness: Liveness::Unreachable,
            ..Self::reachable()
        }
    }

    fn failing_on(function: &'static str) -> Self {
        Self {
            fail_on: Some(function),
            ..Self::reachable()
        }
    }
}

impl ReleaseRpc for StubRpc {
    fn node(&self) -> &NodeHandle {
        &self.node
    }

    fn ping(&self) -> anyhow::Result<Liveness> {
        Ok(self.liveness)
    }

    fn call(&self, op: &ReleaseOp) -> anyhow::Result<RpcOutcome> {
        self.calls.borrow_mut().push(op.clone());
        if self.fail_on == Some(op.function()) {
            Ok(RpcOutcome::Error("error {error, enoent}".to_string()))
        } else {
            Ok(RpcOutcome::Ok("ok".to_string()))
        }
    }
}

fn new_tag() -> ReleaseTag {
    ReleaseTag::parse_or_zero("v1.2.1")
}

#[test]
fn reachable_node_gets_exactly_three_calls_in_order() {
    let rpc = StubRpc::reachable();
    let tag = new_tag();
    let archive = ArchiveName::new("myapp", &tag);

    let report = HotUpgrader::new(&rpc).upgrade(&archive, &tag).unwrap();

    let calls = rpc.calls.borrow();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].function(), "unpack_release");
    assert_eq!(calls[0].argument(), Some("myapp_v1.2.1"));
    assert_eq!(calls[1].function(), "install_release");
    assert_eq!(calls[1].argument(), Some("v1.2.1"));
    assert_eq!(calls[2].function(), "make_permanent");
    assert_eq!(calls[2].argument(), Some("v1.2.1"));

    assert_eq!(report.tag, tag);
    assert_eq!(report.completed.len(), 3);
}

#[test]
fn unreachable_node_aborts_before_any_call() {
    let rpc = StubRpc::unreachable();
    let tag = new_tag();
    let archive = ArchiveName::new("myapp", &tag);

    let err = HotUpgrader::new(&rpc).upgrade(&archive, &tag).unwrap_err();

    assert!(rpc.calls.borrow().is_empty());
    match err {
        UpgradeError::NodeUnreachable { node } => assert_eq!(node, "myapp"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn failed_step_halts_the_sequence() {
    let rpc = StubRpc::failing_on("install_release");
    let tag = new_tag();
    let archive = ArchiveName::new("myapp", &tag);

    let err = HotUpgrader::new(&rpc).upgrade(&archive, &tag).unwrap_err();

    let calls = rpc.calls.borrow();
    assert_eq!(calls.len(), 2, "make_permanent must not be issued");
    match err {
        UpgradeError::StepFailed { step, argument, .. } => {
            assert_eq!(step, UpgradeStep::Install);
            assert_eq!(argument, "v1.2.1");
        }
        other => panic!("unexpected error: {other}"),
    }
}
