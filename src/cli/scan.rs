//! `plugwire scan` - module load status and discovered types

use std::path::Path;

use anyhow::{Context, Result};

use super::app::module_loader;
use super::output::{file_name, Output};
use crate::config::Config;
use crate::domain::Contract;
use crate::plugin::discover_with;

pub fn run(output: &Output, dir: &Path, config: &Config) -> Result<()> {
    let loader = module_loader();
    let discovery = discover_with(dir, &loader, &config.discovery)
        .with_context(|| format!("Failed to scan {}", dir.display()))?;

    if output.is_json() {
        let types: Vec<_> = discovery
            .types()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "module": t.module.display().to_string(),
                    "contracts": t.contracts,
                    "constructible": t.constructor.is_some(),
                })
            })
            .collect();
        output.data(&serde_json::json!({
            "modules": discovery.modules(),
            "types": types,
        }));
        return Ok(());
    }

    if discovery.modules().is_empty() {
        println!("No modules found in {}", dir.display());
        return Ok(());
    }

    println!("{:<30} {:<8} DETAILS", "MODULE", "STATUS");
    println!("{}", "-".repeat(70));
    for module in discovery.modules() {
        let name = file_name(&module.path);
        if module.loaded_successfully {
            println!(
                "{:<30} {:<8} {} type(s), {} skipped",
                name, "ok", module.types_found, module.types_skipped
            );
        } else {
            println!(
                "{:<30} {:<8} {}",
                name,
                "failed",
                module.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    let types: Vec<_> = discovery.types().collect();
    println!();
    if types.is_empty() {
        println!("No instantiable types found.");
    } else {
        println!("{:<30} {:<30} CONTRACTS", "TYPE", "MODULE");
        println!("{}", "-".repeat(70));
        for ty in types {
            let contracts: Vec<_> = ty.contracts.iter().map(Contract::as_str).collect();
            println!(
                "{:<30} {:<30} {}",
                ty.name,
                file_name(&ty.module),
                contracts.join(", ")
            );
        }
    }

    let failed = discovery.failures().count();
    if failed > 0 {
        output.warn(&format!("{} module(s) failed to load", failed));
    }

    Ok(())
}
