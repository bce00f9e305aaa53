//! erl client command construction and reply handling.

use std::cell::RefCell;
use std::path::Path;

use hoist_core::exec::{CommandOutput, Executor};
use hoist_core::node::NodeHandle;
use hoist_core::release::{ArchiveName, ReleaseTag};
use hoist_core::rpc::{ErlRpc, Liveness, ReleaseOp, ReleaseRpc, RpcOutcome};

/// Records privileged argvs and replies with a fixed stdout.
struct FixedReplyExec {
    stdout: &'static str,
    argvs: RefCell<Vec<Vec<String>>>,
}

impl FixedReplyExec {
    fn new(stdout: &'static str) -> Self {
        Self {
            stdout,
            argvs: RefCell::new(Vec::new()),
        }
    }
}

impl Executor for FixedReplyExec {
    fn run(&self, _argv: &[&str]) -> anyhow::Result<CommandOutput> {
        unreachable!("erl calls are privileged")
    }

    fn sudo(&self, argv: &[&str]) -> anyhow::Result<CommandOutput> {
        self.argvs
            .borrow_mut()
            .push(argv.iter().map(|s| s.to_string()).collect());
        Ok(CommandOutput::new(true, self.stdout, ""))
    }

    fn sudo_in(&self, _dir: &Path, _argv: &[&str]) -> anyhow::Result<CommandOutput> {
        unreachable!("erl calls have no working directory")
    }
}

fn node() -> NodeHandle {
    NodeHandle::new("myapp", "tambur.io", "secret")
}

fn flag_value<'a>(argv: &'a [String], flag: &str) -> &'a str {
    let at = argv.iter().position(|a| a == flag).unwrap();
    &argv[at + 1]
}

#[test]
fn ping_reply_determines_liveness() {
    let rpc = ErlRpc::new(FixedReplyExec::new("pong"), node());
    assert_eq!(rpc.ping().unwrap(), Liveness::Reachable);

    let rpc = ErlRpc::new(FixedReplyExec::new("pang"), node());
    assert_eq!(rpc.ping().unwrap(), Liveness::Unreachable);
}

#[test]
fn calls_run_as_hidden_nodes_with_the_shared_cookie() {
    let exec = FixedReplyExec::new("ok ok");
    let tag = ReleaseTag::parse_or_zero("v1.2.1");
    {
        let rpc = ErlRpc::new(&exec, node());
        rpc.call(&ReleaseOp::MakePermanent(tag)).unwrap();
    }

    let argvs = exec.argvs.borrow();
    let argv = &argvs[0];
    assert_eq!(argv[0], "erl");
    assert!(argv.contains(&"-hidden".to_string()));
    assert_eq!(flag_value(argv, "-setcookie"), "secret");

    let eval = flag_value(argv, "-eval");
    assert!(eval.contains("rpc:call(Target, release_handler, make_permanent, [\"v1.2.1\"])"));
    assert!(eval.contains("list_to_atom(\"myapp@\" ++ Host)"));
}

#[test]
fn each_call_claims_a_fresh_probe_identity() {
    let exec = FixedReplyExec::new("pong");
    {
        let rpc = ErlRpc::new(&exec, node());
        rpc.ping().unwrap();
        rpc.ping().unwrap();
    }

    let argvs = exec.argvs.borrow();
    let first = flag_value(&argvs[0], "-name").to_string();
    let second = flag_value(&argvs[1], "-name").to_string();
    assert!(first.starts_with("hoist_"));
    assert!(second.starts_with("hoist_"));
    assert_ne!(first, second);
}

#[test]
fn error_replies_surface_as_rpc_errors() {
    let exec = FixedReplyExec::new("error {badrpc, nodedown}");
    let rpc = ErlRpc::new(&exec, node());
    let tag = ReleaseTag::parse_or_zero("v1.2.1");
    let archive = ArchiveName::new("myapp", &tag);

    match rpc.call(&ReleaseOp::UnpackRelease(archive)).unwrap() {
        RpcOutcome::Error(output) => assert!(output.contains("badrpc")),
        other => panic!("unexpected outcome: {other:?}"),
    }
}
