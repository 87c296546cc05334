use crate::kits;
use crate::output::{print_json, print_table};
use crate::target::resolve_target;
use lite_kits_core::installer::{Installer, InstallerOptions};
use std::path::Path;

pub fn run(kits_dir: Option<&Path>, target: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let target = resolve_target(target)?;
    let manifest = kits::load(kits_dir)?;
    let opts = InstallerOptions {
        kits: Some(super::all_kits(&manifest)),
        ..Default::default()
    };
    let installer = Installer::new(&target, manifest, opts)?;

    let spec_kit = installer.is_spec_kit_project();
    let installed = installer.installed_breakdown()?;

    if json {
        print_json(&serde_json::json!({
            "target": target.display().to_string(),
            "spec_kit": spec_kit,
            "installed": installed,
        }))?;
        return Ok(());
    }

    println!();
    if !spec_kit {
        println!("[X] {} is not a spec-kit project", target.display());
        println!("  {}", super::spec_kit_hint(installer.manifest()));
        return Ok(());
    }

    println!("[OK] Spec-kit project detected in {}.", target.display());
    println!();
    if installed.is_empty() {
        println!("No kits installed.");
        return Ok(());
    }

    let none = || "none".to_string();
    let rows = installed
        .iter()
        .map(|k| {
            let agents = if k.agents.is_empty() { none() } else { k.agents.join(", ") };
            let shells = if k.shells.is_empty() { none() } else { k.shells.join(", ") };
            vec![k.name.clone(), agents, shells]
        })
        .collect();
    print_table(&["Kit", "Agents", "Scripts"], rows);
    Ok(())
}
