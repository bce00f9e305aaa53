//! Read-only release status query.
//!
//! Asks the running node which releases it knows about and parses the
//! printed reply, a list of `{Name, Vsn, Apps, Status}` tuples, well enough
//! to report each release's version and status.

use serde::Serialize;

use crate::rpc::{Liveness, ReleaseOp, ReleaseRpc, RpcOutcome};

/// Status the release handler assigns to a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseState {
    /// Loaded on the next cold boot.
    Permanent,
    Current,
    Old,
    Unpacked,
    Other(String),
}

impl ReleaseState {
    fn from_atom(atom: &str) -> Self {
        match atom {
            "permanent" => Self::Permanent,
            "current" => Self::Current,
            "old" => Self::Old,
            "unpacked" => Self::Unpacked,
            other => Self::Other(other.to_string()),
        }
    }
}

/// One release known to the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseEntry {
    pub name: String,
    pub version: String,
    pub state: ReleaseState,
}

/// Query the node for all releases it knows about.
pub fn which_releases<R: ReleaseRpc>(rpc: &R) -> anyhow::Result<Vec<ReleaseEntry>> {
    if rpc.ping()? == Liveness::Unreachable {
        anyhow::bail!("node '{}' is unreachable", rpc.node().name());
    }
    match rpc.call(&ReleaseOp::WhichReleases)? {
        RpcOutcome::Ok(reply) => Ok(parse_releases(&reply)),
        RpcOutcome::Error(output) => anyhow::bail!("which_releases failed: {output}"),
    }
}

/// The release the node will boot into after a restart, if any.
pub fn permanent_release<R: ReleaseRpc>(rpc: &R) -> anyhow::Result<Option<ReleaseEntry>> {
    Ok(which_releases(rpc)?
        .into_iter()
        .find(|entry| entry.state == ReleaseState::Permanent))
}

/// Parse the printed `which_releases` reply.
///
/// Tolerant of whitespace and of extra fields; tuples that do not look like
/// release entries are skipped.
pub fn parse_releases(reply: &str) -> Vec<ReleaseEntry> {
    let trimmed = reply.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(trimmed);

    let mut entries = Vec::new();
    for tuple in split_depth_zero(inner) {
        let tuple = tuple.trim();
        let Some(body) = tuple.strip_prefix('{').and_then(|s| s.strip_suffix('}')) else {
            continue;
        };
        let fields = split_depth_zero(body);
        if fields.len() < 4 {
            continue;
        }
        entries.push(ReleaseEntry {
            name: unquote(fields[0].trim()),
            version: unquote(fields[1].trim()),
            state: ReleaseState::from_atom(fields[3].trim()),
        });
    }
    entries
}

/// Split on commas that are not nested inside brackets, braces or strings.
fn split_depth_zero(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '{' | '[' | '(' if !in_string => depth += 1,
            '}' | ']' | ')' if !in_string => depth = depth.saturating_sub(1),
            ',' if !in_string && depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < s.len() {
        parts.push(&s[start..]);
    }
    parts
}

fn unquote(s: &str) -> String {
    s.trim_matches('"').to_string()
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use crate::node::NodeHandle;

    use super::*;

    struct StubRpc {
        node: NodeHandle,
        liveness: Liveness,
        reply: &'static str,
        queried: Cell<bool>,
    }

    impl StubRpc {
        fn new(liveness: Liveness, reply: &'static str) -> Self {
            Self {
                node: NodeHandle::new("myapp", "tambur.io", "secret"),
                liveness,
                reply,
                queried: Cell::new(false),
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

        fn call(&self, _op: &ReleaseOp) -> anyhow::Result<RpcOutcome> {
            self.queried.set(true);
            Ok(RpcOutcome::Ok(self.reply.to_string()))
        }
    }

    #[test]
    fn permanent_release_picks_the_permanent_entry() {
        let rpc = StubRpc::new(
            Liveness::Reachable,
            r#"[{"myapp","v1.2.0",[],old},{"myapp","v1.2.1",[],permanent}]"#,
        );
        let entry = permanent_release(&rpc).unwrap().unwrap();
        assert_eq!(entry.version, "v1.2.1");
    }

    #[test]
    fn queries_are_gated_on_the_liveness_probe() {
        let rpc = StubRpc::new(Liveness::Unreachable, "[]");
        assert!(which_releases(&rpc).is_err());
        assert!(!rpc.queried.get());
    }

    #[test]
    fn parses_release_tuples() {
        let reply = r#"[{"myapp","v1.2.1",["kernel-8.2","stdlib-4.0"],permanent},
                       {"myapp","v1.2.0",["kernel-8.2"],old}]"#;
        let releases = parse_releases(reply);
        assert_eq!(releases.len(), 2);
        assert_eq!(releases[0].name, "myapp");
        assert_eq!(releases[0].version, "v1.2.1");
        assert_eq!(releases[0].state, ReleaseState::Permanent);
        assert_eq!(releases[1].version, "v1.2.0");
        assert_eq!(releases[1].state, ReleaseState::Old);
    }

    #[test]
    fn skips_malformed_entries() {
        assert!(parse_releases("[]").is_empty());
        assert!(parse_releases("not a list").is_empty());
        assert_eq!(parse_releases(r#"[{"a","v1.0.0",[],current},junk]"#).len(), 1);
    }
}
