//! Hoist - release deployment tool
//!
//! Usage:
//!   hoist setup                      # provision the target host
//!   hoist deploy bugfix -m "fix"     # hot-deploy a new release
//!   hoist releases                   # what is the node running?

mod report;

use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use dialoguer::Confirm;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hoist_core::config::ConfigStore;
use hoist_core::context::AppContext;
use hoist_core::release::BumpKind;

#[derive(Parser)]
#[command(name = "hoist")]
#[command(about = "Provision hosts and hot-deploy versioned releases", long_about = None)]
struct Cli {
    /// Deployment target from hoist.toml (defaults to default_target)
    #[arg(long, short, global = true)]
    target: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision the target host and build the first release
    Setup,

    /// Tag, build and hot-activate a new release on the running node
    Deploy {
        /// Which version component to bump
        kind: DeployKind,

        /// Tag message recorded with the release
        #[arg(short, long)]
        message: String,

        /// Skip the confirmation prompt (for CI/CD)
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show the releases the running node knows about
    Releases {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Set the default target in hoist.toml
    Target {
        /// Target name as configured under [targets.<name>]
        name: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DeployKind {
    /// Breaking release: v(A+1).0.0
    Major,
    /// Feature release: vA.(B+1).0
    Minor,
    /// Bugfix release: vA.B.(C+1)
    Bugfix,
}

impl From<DeployKind> for BumpKind {
    fn from(kind: DeployKind) -> Self {
        match kind {
            DeployKind::Major => BumpKind::Major,
            DeployKind::Minor => BumpKind::Minor,
            DeployKind::Bugfix => BumpKind::Patch,
        }
    }
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hoist=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Setup => run_setup(load_context(cli.target.as_deref())?),
        Commands::Deploy { kind, message, yes } => {
            run_deploy(load_context(cli.target.as_deref())?, kind, &message, yes)
        }
        Commands::Releases { format } => {
            run_releases(load_context(cli.target.as_deref())?, format)
        }
        Commands::Target { name } => run_target(&name),
    }
}

fn load_context(target: Option<&str>) -> Result<AppContext> {
    let store = ConfigStore::from_default_location()?;
    let config = store.load()?;
    let target = config.select(target)?;
    AppContext::new(target.clone())
}

fn run_setup(ctx: AppContext) -> Result<()> {
    println!("{}", style("Start setup...").white().on_green());
    let started = Instant::now();

    let tag = ctx.setup()?;

    println!(
        "[{}] Finished setup of release {} in {} seconds",
        style(chrono::Local::now().format("%H:%M:%S")).white().on_green(),
        tag,
        started.elapsed().as_secs()
    );
    Ok(())
}

fn run_deploy(ctx: AppContext, kind: DeployKind, message: &str, yes: bool) -> Result<()> {
    let target = &ctx.config().host;
    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Deploy a new release to {target}?"))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let started = Instant::now();
    let outcome = ctx.deploy(kind.into(), message)?;

    println!(
        "{} {} -> {}",
        style("Upgraded").white().on_green(),
        outcome.previous,
        outcome.new
    );
    for (step, reply) in &outcome.report.completed {
        println!("  {step}: {reply}");
    }
    println!(
        "[{}] Finished in {} seconds",
        style(chrono::Local::now().format("%H:%M:%S")).white().on_green(),
        started.elapsed().as_secs()
    );
    Ok(())
}

fn run_releases(ctx: AppContext, format: OutputFormat) -> Result<()> {
    let releases = ctx.releases()?;
    match format {
        OutputFormat::Table => report::print_release_table(&releases),
        OutputFormat::Json => report::print_release_json(&releases)?,
    }
    Ok(())
}

fn run_target(name: &str) -> Result<()> {
    let store = ConfigStore::from_default_location()?;
    let mut config = store.load()?;
    if !config.targets.contains_key(name) {
        anyhow::bail!(
            "No target '{}' in {}. Add a [targets.{}] section first.",
            name,
            store.config_path().display(),
            name
        );
    }
    config.default_target = Some(name.to_string());
    store.save(&config)?;
    println!("Default target set to '{name}'");
    Ok(())
}
