use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

use downdate_core::{expand_environment_strings, path_exists};
use downdate_manifest::{BaseManifest, ComponentStore};
use downdate_queue::build_downgrade_queue;
use downdate_resolver::resolve_update_files;

use crate::config::parse_config_xml;
use crate::render::{current_output_style, resolution_progress, status_line, OutputStyle};
use crate::system::schedule_restart;
use crate::Cli;

pub fn run(cli: Cli) -> Result<()> {
    refuse_reserved_features(&cli)?;

    let style = current_output_style();
    let queue_path = match (&cli.config_xml, &cli.custom_pending_xml) {
        (Some(config_path), None) => craft_queue_document(&cli, config_path, style)?,
        (None, Some(custom_path)) => {
            if !path_exists(custom_path) {
                anyhow::bail!(
                    "custom pending document {} does not exist",
                    custom_path.display()
                );
            }
            custom_path.clone()
        }
        _ => anyhow::bail!("exactly one of --config-xml and --custom-pending-xml must be given"),
    };

    println!(
        "{}",
        status_line(
            style,
            "done",
            &format!("queue document ready: {}", queue_path.display())
        )
    );

    if cli.force_restart {
        schedule_restart(cli.restart_timeout)?;
    }

    Ok(())
}

fn craft_queue_document(cli: &Cli, config_path: &Path, style: OutputStyle) -> Result<PathBuf> {
    if !path_exists(config_path) {
        anyhow::bail!("config {} does not exist", config_path.display());
    }
    let base_manifest_path = cli
        .base_manifest
        .as_deref()
        .ok_or_else(|| anyhow!("--base-manifest is required when crafting from --config-xml"))?;

    let base = BaseManifest::load(base_manifest_path)?;
    let store = ComponentStore::open(store_root(cli), base);
    let mut update_files = parse_config_xml(config_path)?;

    let pending = update_files
        .iter()
        .filter(|update_file| update_file.needs_resolution)
        .count() as u64;
    let progress = resolution_progress(style, pending);
    let mut resolved_lines = Vec::new();
    let skipped_entries = resolve_update_files(&store, &mut update_files, |update_file, resolution| {
        if let Some(progress) = &progress {
            progress.inc(1);
        }
        resolved_lines.push(format!(
            "resolved {} from component '{}'",
            update_file.destination.display(),
            resolution.component
        ));
    })?;
    if let Some(progress) = progress {
        progress.finish_and_clear();
    }

    for line in resolved_lines {
        println!("{}", status_line(style, "step", &line));
    }
    for entry in &skipped_entries {
        eprintln!(
            "{}",
            status_line(
                style,
                "warn",
                &format!(
                    "component '{}' file entry {} is missing its '{}' attribute, entry skipped",
                    entry.component, entry.position, entry.missing_attribute
                )
            )
        );
    }

    let built = build_downgrade_queue(&update_files)?;
    for destination in &built.skipped {
        println!(
            "{}",
            status_line(
                style,
                "step",
                &format!(
                    "skipping update of {}, source and destination are the same",
                    destination.display()
                )
            )
        );
    }

    built.document.write_to(&cli.output)?;
    Ok(cli.output.clone())
}

fn store_root(cli: &Cli) -> PathBuf {
    match &cli.store_root {
        Some(root) => root.clone(),
        None => PathBuf::from(expand_environment_strings("%SystemRoot%\\WinSxS")),
    }
}

fn refuse_reserved_features(cli: &Cli) -> Result<()> {
    for (enabled, flag) in [
        (cli.invisible, "--invisible"),
        (cli.persistent, "--persistent"),
        (cli.irreversible, "--irreversible"),
        (cli.elevate, "--elevate"),
    ] {
        if enabled {
            anyhow::bail!("feature-unimplemented: {flag} is reserved and not implemented yet");
        }
    }
    Ok(())
}
