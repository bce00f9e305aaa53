//! erl-backed RPC client.
//!
//! Each call spawns a short-lived hidden node on the target host with a
//! fresh probe identity, resolves the main node's full name from the local
//! hostname, and either pings it or relays one `rpc:call/4` into its
//! release handler. The eval expressions below are fixed templates; the only
//! values spliced in are the node name from validated config and the typed
//! operation argument.

use anyhow::Context;
use tracing::{debug, warn};

use crate::exec::Executor;
use crate::node::{NodeHandle, ProbeIdentity};

use super::{Liveness, ReleaseOp, ReleaseRpc, RpcOutcome};

pub struct ErlRpc<E: Executor> {
    exec: E,
    node: NodeHandle,
}

impl<E: Executor> ErlRpc<E> {
    pub fn new(exec: E, node: NodeHandle) -> Self {
        Self { exec, node }
    }

    fn run_eval(&self, eval: &str) -> anyhow::Result<String> {
        let identity = ProbeIdentity::random();
        let argv = [
            "erl",
            "-name",
            identity.as_str(),
            "-hidden",
            "-setcookie",
            self.node.cookie(),
            "-noshell",
            "-noinput",
            "-eval",
            eval,
            "-s",
            "erlang",
            "halt",
        ];
        let output = self
            .exec
            .sudo(&argv)
            .with_context(|| format!("Failed to reach node '{}'", self.node.name()))?;
        if !output.success {
            anyhow::bail!(
                "erl call to node '{}' failed:\n{}",
                self.node.name(),
                output.combined()
            );
        }
        Ok(output.stdout)
    }

    /// Prelude resolving the main node's full name from the probe's own host.
    fn node_binding(&self) -> String {
        format!(
            "[Host] = tl(string:tokens(atom_to_list(node()), \"@\")), \
             Target = list_to_atom(\"{}@\" ++ Host)",
            self.node.name()
        )
    }
}

impl<E: Executor> ReleaseRpc for ErlRpc<E> {
    fn node(&self) -> &NodeHandle {
        &self.node
    }

    fn ping(&self) -> anyhow::Result<Liveness> {
        let eval = format!(
            "{}, io:format(\"~p\", [net_adm:ping(Target)]).",
            self.node_binding()
        );
        let reply = self.run_eval(&eval)?;
        if reply.contains("pong") {
            debug!(node = %self.node.name(), "node answered ping");
            Ok(Liveness::Reachable)
        } else {
            warn!(node = %self.node.name(), %reply, "node did not answer ping");
            Ok(Liveness::Unreachable)
        }
    }

    fn call(&self, op: &ReleaseOp) -> anyhow::Result<RpcOutcome> {
        let args = match op.argument() {
            Some(arg) => format!("[\"{arg}\"]"),
            None => "[]".to_string(),
        };
        let eval = format!(
            "{}, Result = rpc:call(Target, {}, {}, {}), \
             case Result of \
                 {{badrpc, _}} -> io:format(\"error ~p\", [Result]); \
                 {{error, _}} -> io:format(\"error ~p\", [Result]); \
                 _ -> io:format(\"ok ~p\", [Result]) \
             end.",
            self.node_binding(),
            op.module(),
            op.function(),
            args
        );
        let reply = self.run_eval(&eval)?;
        debug!(function = op.function(), %reply, "release handler call finished");
        if let Some(rest) = reply.strip_prefix("ok ") {
            Ok(RpcOutcome::Ok(rest.trim().to_string()))
        } else {
            Ok(RpcOutcome::Error(reply.trim().to_string()))
        }
    }
}
