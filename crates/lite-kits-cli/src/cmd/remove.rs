use crate::kits;
use crate::output::{print_json, print_table};
use crate::prompt::confirm;
use crate::target::resolve_target;
use anyhow::bail;
use clap::Args;
use lite_kits_core::installer::{Installer, InstallerOptions, RemovalOutcome, RemovalPreview};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct RemoveArgs {
    /// Kits to remove, comma-separated
    #[arg(long, value_delimiter = ',')]
    pub kit: Vec<String>,

    /// Remove every installed kit
    #[arg(long, conflicts_with = "kit")]
    pub all: bool,

    /// Skip preview and confirmation
    #[arg(long)]
    pub force: bool,

    /// Show what would be removed without deleting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Target directory (default: current directory)
    pub target: Option<PathBuf>,
}

pub fn run(kits_dir: Option<&Path>, args: RemoveArgs, json: bool) -> anyhow::Result<()> {
    let requested = super::clean_list(args.kit);
    if requested.is_empty() && !args.all {
        bail!(
            "specify --kit or --all\n\nExamples:\n  lite-kits remove --kit dev\n  lite-kits remove --all"
        );
    }

    let target = resolve_target(args.target.as_deref())?;
    let manifest = kits::load(kits_dir)?;
    let kits = if args.all {
        super::all_kits(&manifest)
    } else {
        requested
    };
    let opts = InstallerOptions {
        kits: Some(kits),
        force: args.force,
        dry_run: args.dry_run,
        ..Default::default()
    };
    let installer = Installer::new(&target, manifest, opts.clone())?;

    let installed: Vec<String> = installer
        .kits()
        .iter()
        .filter(|k| installer.is_kit_installed(k))
        .cloned()
        .collect();
    if installed.is_empty() {
        if json {
            print_json(&RemovalOutcome {
                success: true,
                dry_run: args.dry_run,
                ..Default::default()
            })?;
        } else {
            println!("No kits detected to remove");
        }
        return Ok(());
    }

    let installer = Installer::new(
        &target,
        installer.manifest().clone(),
        InstallerOptions {
            kits: Some(installed),
            ..opts
        },
    )?;

    if !json && (!args.force || args.dry_run) {
        let preview = installer.preview_removal();
        if preview.total_files == 0 {
            println!("No files found to remove");
            return Ok(());
        }
        display_preview(&preview);

        if !args.dry_run {
            println!();
            if !confirm("Continue with removal?")? {
                println!("Cancelled");
                return Ok(());
            }
        }
    }

    let outcome = installer.remove();
    if json {
        print_json(&outcome)?;
    } else {
        display_outcome(&outcome);
    }
    if !outcome.success {
        bail!(
            "removal failed: {}",
            outcome.error.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}

fn display_preview(preview: &RemovalPreview) {
    for kit in &preview.kits {
        println!();
        println!("=== {} ===", kit.name);
        println!("Files to be removed:");
        for file in &kit.files {
            println!("  - {file}");
        }
    }

    println!();
    let rows = preview
        .kits
        .iter()
        .map(|k| {
            let dirs: BTreeSet<&str> = k
                .files
                .iter()
                .filter_map(|f| f.rsplit_once('/').map(|(dir, _)| dir))
                .collect();
            vec![k.name.clone(), k.files.len().to_string(), dirs.len().to_string()]
        })
        .collect();
    print_table(&["Kit", "Files", "Directories"], rows);
}

fn display_outcome(outcome: &RemovalOutcome) {
    if !outcome.success {
        return;
    }
    let removed: usize = outcome.removed.iter().map(|k| k.files.len()).sum();
    if outcome.dry_run {
        println!("\nWould remove {removed} files");
        println!("\n[OK] Dry run complete, nothing was deleted.");
        return;
    }
    println!("\nRemoved {removed} files");
    if !outcome.cleaned_dirs.is_empty() {
        println!(
            "Cleaned up empty directories: {}",
            outcome.cleaned_dirs.join(", ")
        );
    }
    println!("\n[OK] Removal complete!");
}
