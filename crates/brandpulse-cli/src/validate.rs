//! Roster validation command.

use std::path::Path;

use brandpulse_core::Platform;

pub(crate) fn run_validate(brands_path: &Path) -> anyhow::Result<()> {
    let roster = brandpulse_core::load_brands(brands_path)?;

    let primary = roster
        .primary()
        .map_or_else(|| "<none>".to_string(), |b| b.name.clone());

    println!(
        "roster ok: {} brands, primary = {primary}",
        roster.brands.len()
    );
    for brand in &roster.brands {
        let platforms: Vec<String> = Platform::ALL
            .iter()
            .filter(|p| brand.sheet_for(**p).is_some())
            .map(ToString::to_string)
            .collect();
        let platforms = if platforms.is_empty() {
            "no sources".to_string()
        } else {
            platforms.join(", ")
        };
        println!("  {} ({}) [{platforms}]", brand.slug(), brand.role);
    }

    Ok(())
}
