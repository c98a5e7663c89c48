use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

mod config;
mod flows;
mod render;
mod system;

#[cfg(test)]
mod tests;

/// Crafts a pending-operation queue that downgrades system files to older
/// versions taken from the component archive.
#[derive(Parser, Debug)]
#[command(name = "downdate")]
#[command(
    about = "Craft a customized downgrading update from the component archive",
    long_about = None
)]
struct Cli {
    /// Declarative list of desired file replacements.
    #[arg(
        long,
        value_name = "PATH",
        conflicts_with = "custom_pending_xml",
        required_unless_present = "custom_pending_xml"
    )]
    config_xml: Option<PathBuf>,

    /// Finalized queue document to use as-is instead of crafting one.
    #[arg(long, value_name = "PATH")]
    custom_pending_xml: Option<PathBuf>,

    /// Root of the versioned component archive. Defaults to the live
    /// system's archive.
    #[arg(long, value_name = "DIR")]
    store_root: Option<PathBuf>,

    /// Base manifest document differential records are patched against.
    #[arg(long, value_name = "PATH", requires = "config_xml")]
    base_manifest: Option<PathBuf>,

    /// Where to write the crafted queue document.
    #[arg(long, value_name = "PATH", default_value = "Downgrade.xml")]
    output: PathBuf,

    /// Force an automatic machine restart; the update takes place during
    /// the restart.
    #[arg(long)]
    force_restart: bool,

    /// Seconds to wait before the forced restart.
    #[arg(
        long,
        value_name = "SECONDS",
        default_value_t = 10,
        requires = "force_restart"
    )]
    restart_timeout: u32,

    /// Elevate to the servicing account before queueing (reserved).
    #[arg(long)]
    elevate: bool,

    /// Install missing updates so the downgrade stays invisible (reserved).
    #[arg(long)]
    invisible: bool,

    /// Empty future updates so they cannot overwrite the downgrade
    /// (reserved).
    #[arg(long)]
    persistent: bool,

    /// Patch repair tooling so the downgrade cannot be reverted (reserved).
    #[arg(long)]
    irreversible: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    flows::run(cli)
}
