use crate::kits;
use crate::output::{print_json, print_table};
use std::path::Path;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const REPOSITORY: &str = env!("CARGO_PKG_REPOSITORY");
const LICENSE: &str = env!("CARGO_PKG_LICENSE");

pub fn run(kits_dir: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let manifest = kits::load(kits_dir)?;

    if json {
        let kits: Vec<_> = manifest
            .kit_names()
            .into_iter()
            .filter_map(|name| manifest.kit(name).map(|kit| (name, kit)))
            .map(|(name, kit)| {
                serde_json::json!({
                    "kit": name,
                    "name": kit.name,
                    "description": kit.description,
                    "icon": kit.icon,
                    "recommended": kit.recommended,
                    "commands": kit.commands,
                })
            })
            .collect();
        print_json(&serde_json::json!({
            "version": VERSION,
            "repository": REPOSITORY,
            "license": LICENSE,
            "kits_dir": manifest.kits_dir().display().to_string(),
            "kits": kits,
        }))?;
        return Ok(());
    }

    println!();
    println!("Version     {VERSION}");
    println!("Repository  {REPOSITORY}");
    println!("License     {LICENSE}");
    println!("Kits        {}", manifest.kits_dir().display());
    println!();

    let rows = manifest
        .kit_names()
        .into_iter()
        .filter_map(|name| manifest.kit(name).map(|kit| (name, kit)))
        .map(|(name, kit)| {
            let default = if name == manifest.default_kit() { " (default)" } else { "" };
            vec![
                format!("{} {name}{default}", kit.icon),
                kit.name.clone(),
                kit.description.clone(),
            ]
        })
        .collect();
    print_table(&["Kit", "Name", "Description"], rows);

    for name in manifest.kit_names() {
        let commands = manifest.kit_commands(name);
        if commands.is_empty() {
            continue;
        }
        println!();
        println!("{} commands:", manifest.kit_display_name(name));
        for command in commands {
            let status = match command.status.as_deref() {
                Some(s) if s != "stable" => format!(" [{s}]"),
                _ => String::new(),
            };
            println!("  /{:<10} {}{status}", command.name, command.description);
        }
    }

    println!();
    println!("Uninstall: lite-kits uninstall");
    Ok(())
}
