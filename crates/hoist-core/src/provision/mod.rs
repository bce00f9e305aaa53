//! Host provisioning.
//!
//! Brings a fresh target host to the point where releases can be built and
//! upgraded: OS packages, the dedicated service user, the project directory
//! tree, a checkout of the release repository, and the first release build
//! with its `active_release` symlink.

use tracing::info;

use crate::config::TargetConfig;
use crate::exec::Executor;
use crate::release::{ArchiveName, ReleaseTag};

/// Debian/Ubuntu packages every target needs.
const BASE_PACKAGES: &[&str] = &["build-essential", "erlang"];

/// Result of the create-user step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserOutcome {
    Created,
    /// The user pre-existed; left unchanged.
    AlreadyExists,
}

/// Runs the provisioning steps against one target.
pub struct Provisioner<'a, E: Executor> {
    exec: &'a E,
    config: &'a TargetConfig,
}

impl<'a, E: Executor> Provisioner<'a, E> {
    pub fn new(exec: &'a E, config: &'a TargetConfig) -> Self {
        Self { exec, config }
    }

    /// Run all provisioning steps in order, ending with the initial release
    /// build for `tag`.
    pub fn provision(&self, tag: &ReleaseTag) -> anyhow::Result<()> {
        self.verify_sudo()?;
        self.install_packages()?;
        self.create_user()?;
        self.setup_directories()?;
        self.clone_or_update_sources()?;
        self.build_initial_release(tag)?;
        Ok(())
    }

    /// Check the login user can run privileged commands before doing any work.
    pub fn verify_sudo(&self) -> anyhow::Result<()> {
        self.exec.sudo(&["true"])?.ensure_success("sudo check")?;
        Ok(())
    }

    /// Install base packages plus any target-specific extras.
    pub fn install_packages(&self) -> anyhow::Result<()> {
        self.exec
            .sudo(&["apt-get", "update"])?
            .ensure_success("apt-get update")?;

        let mut argv = vec!["apt-get", "-y", "install"];
        argv.extend_from_slice(BASE_PACKAGES);
        argv.extend(self.config.packages.iter().map(String::as_str));
        self.exec.sudo(&argv)?.ensure_success("package install")?;
        info!(packages = %argv[3..].join(" "), "packages installed");
        Ok(())
    }

    /// Create the dedicated service user.
    ///
    /// A pre-existing user is left untouched and reported, not treated as an
    /// error.
    pub fn create_user(&self) -> anyhow::Result<UserOutcome> {
        let user = self.config.user();
        let home = self.config.user_home();
        let home = home.to_string_lossy();
        let output = self
            .exec
            .sudo(&["useradd", "-d", &*home, "-m", "-r", user])?;
        if output.success {
            info!(%user, "service user created");
            return Ok(UserOutcome::Created);
        }
        if output.combined().contains("already exists") {
            info!(%user, "service user already exists, leaving unchanged");
            return Ok(UserOutcome::AlreadyExists);
        }
        anyhow::bail!("useradd failed:\n{}", output.combined())
    }

    /// Create the directory tree the project lives in.
    pub fn setup_directories(&self) -> anyhow::Result<()> {
        let projects = self.config.projects_path();
        let projects = projects.to_string_lossy();
        self.exec
            .sudo(&["mkdir", "-p", &*projects])?
            .ensure_success("mkdir")?;
        Ok(())
    }

    /// Clone the release repository, or pull when a checkout already exists.
    pub fn clone_or_update_sources(&self) -> anyhow::Result<()> {
        let code_root = self.config.code_root();
        let marker = code_root.join(".git");
        let marker = marker.to_string_lossy();
        let exists = self.exec.run(&["test", "-d", &*marker])?.success;
        if exists {
            self.exec
                .sudo_in(&code_root, &["git", "pull"])?
                .ensure_success("git pull")?;
        } else {
            let dest = code_root.to_string_lossy();
            self.exec
                .sudo(&["git", "clone", self.config.repository.as_str(), &*dest])?
                .ensure_success("git clone")?;
        }
        Ok(())
    }

    /// Build the first release and point `active_release` at it.
    pub fn build_initial_release(&self, tag: &ReleaseTag) -> anyhow::Result<()> {
        let code_root = self.config.code_root();
        let archive = ArchiveName::new(&self.config.project, tag);
        let release_dir = format!("rel/{archive}");
        let build_dir = format!("rel/{}", self.config.project);

        let steps: [&[&str]; 5] = [
            &["./rebar", "get-deps"],
            &["./rebar", "compile", "generate"],
            &["mv", build_dir.as_str(), release_dir.as_str()],
            &["rm", "-f", "active_release"],
            &["ln", "-s", release_dir.as_str(), "active_release"],
        ];
        for argv in steps {
            self.exec
                .sudo_in(&code_root, argv)?
                .ensure_success(&argv.join(" "))?;
        }
        info!(%tag, "initial release built and activated");
        Ok(())
    }
}
