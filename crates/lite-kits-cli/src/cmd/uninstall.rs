use crate::output::print_json;

pub fn run(json: bool) -> anyhow::Result<()> {
    if json {
        print_json(&serde_json::json!({
            "commands": ["cargo uninstall lite-kits-cli", "sudo apt remove lite-kits"],
            "note": "Kits already added to projects are not removed; run `lite-kits remove --all` in each project first.",
        }))?;
        return Ok(());
    }

    println!();
    println!("Uninstall lite-kits");
    println!();
    println!("If installed with cargo:");
    println!();
    println!("  cargo uninstall lite-kits-cli");
    println!();
    println!("If installed from the .deb package:");
    println!();
    println!("  sudo apt remove lite-kits");
    println!();
    println!("Note: this removes the binary but NOT the kits you've added to projects.");
    println!("To remove kits from a project, first run: lite-kits remove --all");
    Ok(())
}
