//! Configuration schema.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::release::validate_project_name;

/// Top-level hoist.toml contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HoistConfig {
    /// Target used when none is named on the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_target: Option<String>,

    /// Named deployment targets.
    #[serde(default)]
    pub targets: BTreeMap<String, TargetConfig>,
}

impl HoistConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick a target by explicit name, falling back to the default.
    pub fn select(&self, name: Option<&str>) -> anyhow::Result<&TargetConfig> {
        let name = match name.or(self.default_target.as_deref()) {
            Some(name) => name,
            None => anyhow::bail!(
                "No target selected. Pass --target <name> or set default_target in hoist.toml"
            ),
        };
        self.targets.get(name).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown target '{}'. Configured targets: {}",
                name,
                self.targets
                    .keys()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
    }
}

/// One deployment target: a host, the service user on it, and the node of
/// the running application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Project name, used for the code root, release names and defaults.
    pub project: String,

    /// Release repository URL cloned onto the target.
    pub repository: String,

    /// ssh destination (e.g. "deploy@tambur.io").
    pub host: String,

    /// Dedicated service user owning the project tree. Defaults to the
    /// project name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Service user's home. Defaults to /opt/<user>.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_home: Option<PathBuf>,

    /// Short name of the running node. Defaults to the project name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,

    /// Shared secret authorizing calls into the node.
    pub cookie: String,

    /// Extra OS packages installed during provisioning.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub packages: Vec<String>,
}

impl TargetConfig {
    pub fn user(&self) -> &str {
        self.user.as_deref().unwrap_or(&self.project)
    }

    pub fn node(&self) -> &str {
        self.node.as_deref().unwrap_or(&self.project)
    }

    pub fn user_home(&self) -> PathBuf {
        self.user_home
            .clone()
            .unwrap_or_else(|| PathBuf::from("/opt").join(self.user()))
    }

    /// Directory holding project checkouts on the target.
    pub fn projects_path(&self) -> PathBuf {
        self.user_home().join("projects")
    }

    /// Checkout of the release repository on the target.
    pub fn code_root(&self) -> PathBuf {
        self.projects_path().join(&self.project)
    }

    /// Reject values that cannot be safely embedded in remote paths and
    /// release-handler arguments.
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_project_name(&self.project)?;
        let node = self.node();
        if node.is_empty()
            || !node
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'))
        {
            anyhow::bail!("Invalid node name '{}'", node);
        }
        if self.cookie.is_empty() || self.cookie.chars().any(char::is_whitespace) {
            anyhow::bail!("Cookie must be non-empty and contain no whitespace");
        }
        if self.host.is_empty() {
            anyhow::bail!("Target host must not be empty");
        }
        Ok(())
    }
}
