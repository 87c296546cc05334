use crate::kits;
use crate::output::{print_json, print_list, print_table};
use crate::prompt::confirm;
use crate::target::resolve_target;
use anyhow::bail;
use clap::Args;
use lite_kits_core::installer::{InstallOutcome, InstallPreview, Installer, InstallerOptions};
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct AddArgs {
    /// Kits to add, comma-separated (default: the manifest's default kit)
    #[arg(long, value_delimiter = ',')]
    pub kit: Vec<String>,

    /// Add every available kit
    #[arg(long, conflicts_with_all = ["kit", "recommended"])]
    pub all: bool,

    /// Add the recommended kits
    #[arg(long, conflicts_with = "kit")]
    pub recommended: bool,

    /// Agents to install for, comma-separated (default: auto-detect)
    #[arg(long, value_delimiter = ',')]
    pub agent: Vec<String>,

    /// Shells to install scripts for, comma-separated (default: auto-detect)
    #[arg(long, value_delimiter = ',')]
    pub shell: Vec<String>,

    /// Skip preview and confirmations, overwrite existing files
    #[arg(long)]
    pub force: bool,

    /// Show what would be installed without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Target directory (default: current directory)
    pub target: Option<PathBuf>,
}

pub fn run(kits_dir: Option<&Path>, args: AddArgs, json: bool) -> anyhow::Result<()> {
    let target = resolve_target(args.target.as_deref())?;
    let manifest = kits::load(kits_dir)?;
    let opts = InstallerOptions {
        kits: super::select_kits(&manifest, args.kit, args.all, args.recommended),
        force: args.force,
        agents: super::clean_list(args.agent),
        shells: super::clean_list(args.shell),
        dry_run: args.dry_run,
    };
    let mut installer = Installer::new(&target, manifest, opts.clone())?;

    if !installer.is_spec_kit_project() {
        return Err(super::not_spec_kit(installer.manifest(), &target));
    }

    if json {
        let outcome = installer.install();
        print_json(&outcome)?;
        return finish(&outcome);
    }

    let already: Vec<&str> = installer
        .kits()
        .iter()
        .filter(|k| installer.is_kit_installed(k))
        .map(|k| installer.manifest().kit_display_name(k))
        .collect();
    if !already.is_empty() {
        println!();
        println!("Warning: already installed: {}", already.join(", "));
        if !args.force && !args.dry_run && !confirm("Reinstall anyway?")? {
            println!("Cancelled");
            return Ok(());
        }
    }

    if !args.force {
        let preview = installer.preview_installation()?;
        display_preview(&preview);

        if args.dry_run {
            let outcome = installer.install();
            display_outcome(&outcome);
            return finish(&outcome);
        }

        println!();
        if !confirm("Proceed with installation?")? {
            println!("Installation cancelled");
            return Ok(());
        }

        // The user has seen the conflicts; overwrite them.
        installer = Installer::new(
            &target,
            installer.manifest().clone(),
            InstallerOptions {
                force: true,
                ..opts
            },
        )?;
    }

    if args.dry_run {
        println!("\nDry run for {}\n", target.display());
    } else {
        println!("\nInstalling kits to {}\n", target.display());
    }
    let outcome = installer.install();
    display_outcome(&outcome);
    finish(&outcome)
}

fn finish(outcome: &InstallOutcome) -> anyhow::Result<()> {
    if outcome.success {
        return Ok(());
    }
    bail!(
        "installation failed: {}",
        outcome.error.as_deref().unwrap_or("unknown error")
    )
}

fn display_preview(preview: &InstallPreview) {
    if !preview.agents.is_empty() {
        println!();
        println!("Agents: {}", preview.agents.join(", "));
        if !preview.shells.is_empty() {
            println!("Shells: {}", preview.shells.join(", "));
        }
    }

    for kit in &preview.kits {
        println!();
        println!("=== {} ===", kit.name);
        for (title, marker, items) in [
            ("Files to be created", '+', &kit.new_files),
            ("Files to be modified", '~', &kit.modified_files),
            ("Directories to be created", '+', &kit.new_directories),
        ] {
            if items.is_empty() {
                continue;
            }
            println!("{title}:");
            for item in items {
                println!("  {marker} {item}");
            }
        }
    }

    if !preview.kits.is_empty() {
        println!();
        let rows = preview
            .kits
            .iter()
            .map(|k| {
                vec![
                    k.name.clone(),
                    k.new_files.len().to_string(),
                    k.modified_files.len().to_string(),
                    k.new_directories.len().to_string(),
                ]
            })
            .collect();
        print_table(&["Kit", "New", "Modified", "Directories"], rows);
    }

    if !preview.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &preview.warnings {
            println!("  ⚠ {warning}");
        }
    }
    if !preview.conflicts.is_empty() {
        println!("\nConflicts (will overwrite):");
        for conflict in &preview.conflicts {
            println!(
                "  ⚠ {} ({} -> {} bytes)",
                conflict.path, conflict.size_current, conflict.size_new
            );
        }
    }
}

fn display_outcome(outcome: &InstallOutcome) {
    let (installed, skipped) = if outcome.dry_run {
        ("Would install", "Would skip")
    } else {
        ("Installed", "Skipped")
    };
    print_list(installed, &outcome.installed);
    print_list(skipped, &outcome.skipped);
    for warning in &outcome.warnings {
        println!("⚠ {warning}");
    }

    if !outcome.success {
        if !outcome.conflicts.is_empty() {
            println!("\nConflicts:");
            for conflict in &outcome.conflicts {
                println!("  ⚠ {}", conflict.path);
            }
        }
        return;
    }

    if let Some(validation) = &outcome.validation {
        println!();
        for check in validation.checks.iter().filter(|c| !c.passed) {
            println!("[!] {}", check.message);
        }
    }

    if outcome.dry_run {
        println!("\n[OK] Dry run complete, nothing was written.");
        return;
    }
    println!("\n[OK] Kits installed successfully!");
    println!("\nNext steps:");
    println!("  1. Run: /orient (in GitHub Copilot or Claude Code)");
    println!("  2. Validate: lite-kits validate");
}
