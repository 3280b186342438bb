//! `plugwire bind` - contract table and conflicts

use std::path::Path;

use anyhow::{Context, Result};

use super::app::module_loader;
use super::output::{file_name, Output};
use crate::binding::bind;
use crate::bootstrap::BootstrapError;
use crate::config::Config;
use crate::plugin::discover_with;

pub fn run(output: &Output, dir: &Path, config: &Config) -> Result<()> {
    let loader = module_loader();
    let discovery = discover_with(dir, &loader, &config.discovery)
        .with_context(|| format!("Failed to scan {}", dir.display()))?;
    let (modules, types) = discovery.into_parts();
    let failed: Vec<_> = modules.iter().filter(|m| !m.loaded_successfully).collect();

    let table = bind(types);

    if output.is_json() {
        output.data(&serde_json::json!({
            "bindings": table.summaries(),
            "conflicts": table.conflicts(),
            "failed_modules": failed,
        }));
    } else {
        if table.is_empty() {
            println!("No bindings.");
        } else {
            println!("{:<30} IMPLEMENTATION", "CONTRACT");
            println!("{}", "-".repeat(70));
            for binding in &table {
                let implementation = binding.implementation();
                println!(
                    "{:<30} {} ({})",
                    binding.contract(),
                    implementation.name,
                    file_name(&implementation.module)
                );
            }
        }

        if table.has_conflicts() {
            println!();
            println!("Conflicts:");
            for conflict in table.conflicts() {
                println!(
                    "  {}: kept {}, discarded {}",
                    conflict.contract, conflict.winner, conflict.discarded
                );
            }
        }

        for module in &failed {
            output.warn(&format!(
                "{} failed to load: {}",
                file_name(&module.path),
                module.error.as_deref().unwrap_or("unknown error")
            ));
        }
    }

    if config.binding.deny_conflicts && table.has_conflicts() {
        return Err(BootstrapError::ConflictsDenied(table.conflicts().to_vec()).into());
    }

    Ok(())
}
