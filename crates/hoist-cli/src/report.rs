//! Operator-facing release reporting.

use anyhow::Result;
use console::style;

use hoist_core::status::{ReleaseEntry, ReleaseState};

pub fn print_release_table(releases: &[ReleaseEntry]) {
    if releases.is_empty() {
        println!("The node reports no releases.");
        return;
    }
    println!("{:<20} {:<16} {}", "NAME", "VERSION", "STATUS");
    for entry in releases {
        let state = match &entry.state {
            ReleaseState::Permanent => style("permanent").green().to_string(),
            ReleaseState::Current => style("current").cyan().to_string(),
            ReleaseState::Old => style("old").dim().to_string(),
            ReleaseState::Unpacked => style("unpacked").yellow().to_string(),
            ReleaseState::Other(other) => other.clone(),
        };
        println!("{:<20} {:<16} {}", entry.name, entry.version, state);
    }
}

pub fn print_release_json(releases: &[ReleaseEntry]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(releases)?);
    Ok(())
}
