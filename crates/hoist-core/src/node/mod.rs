//! Remote node identity and ephemeral probe identities.

use std::fmt;

use rand::Rng;

/// Alphabet used for probe identity suffixes.
const PROBE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of the random suffix on a probe identity.
const PROBE_SUFFIX_LEN: usize = 8;

/// Address of a live running process instance on the target host.
///
/// The node is assumed to already be running; hoist never starts or stops
/// it, it only observes and calls into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeHandle {
    name: String,
    host: String,
    cookie: String,
}

impl NodeHandle {
    pub fn new(name: impl Into<String>, host: impl Into<String>, cookie: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            cookie: cookie.into(),
        }
    }

    /// Short node name, without the host part.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Shared secret authorizing calls into the node.
    pub fn cookie(&self) -> &str {
        &self.cookie
    }
}

/// Ephemeral client identity used for a single remote call.
///
/// Concurrent invocations of this tool must not claim the same identity on
/// the same transport, so every call gets a fresh randomly suffixed name.
/// The identity is discarded as soon as the call returns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProbeIdentity(String);

impl ProbeIdentity {
    /// Generate a fresh identity with a random 8-character suffix.
    pub fn random() -> Self {
        let mut rng = rand::rng();
        let suffix: String = (0..PROBE_SUFFIX_LEN)
            .map(|_| PROBE_ALPHABET[rng.random_range(0..PROBE_ALPHABET.len())] as char)
            .collect();
        Self(format!("hoist_{suffix}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProbeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
