use crate::kits;
use crate::output::print_json;
use crate::target::resolve_target;
use anyhow::bail;
use lite_kits_core::installer::{Installer, InstallerOptions};
use lite_kits_core::validator::{KitStatus, ValidationReport};
use std::path::Path;

pub fn run(kits_dir: Option<&Path>, target: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let target = resolve_target(target)?;
    let manifest = kits::load(kits_dir)?;
    let opts = InstallerOptions {
        kits: Some(super::all_kits(&manifest)),
        ..Default::default()
    };
    let installer = Installer::new(&target, manifest, opts)?;

    if !installer.is_spec_kit_project() {
        return Err(super::not_spec_kit(installer.manifest(), &target));
    }
    if !installer.kits().iter().any(|k| installer.is_kit_installed(k)) {
        bail!("no enhancement kits installed\n  Run: lite-kits add");
    }

    let report = installer.validate()?;
    if json {
        print_json(&report)?;
    } else {
        println!("\nValidating {}\n", target.display());
        display_report(&report);
    }

    if !report.valid {
        bail!("validation failed");
    }
    if !json {
        println!("\n[OK] Validation passed!");
    }
    Ok(())
}

fn display_report(report: &ValidationReport) {
    for check in &report.checks {
        match check.status {
            KitStatus::Installed => println!("[OK] {}", check.message),
            KitStatus::NotInstalled => println!("[-] {}", check.message),
            KitStatus::Partial => {
                println!("[!] {}", check.message);
                let shown: Vec<&str> = check
                    .missing_files
                    .iter()
                    .take(3)
                    .map(String::as_str)
                    .collect();
                if !shown.is_empty() {
                    let more = if check.missing_files.len() > 3 { " ..." } else { "" };
                    println!("    Missing: {}{more}", shown.join(", "));
                }
                if !check.corrupted_files.is_empty() {
                    println!("    Too small: {}", check.corrupted_files.join(", "));
                }
            }
        }
    }
}
