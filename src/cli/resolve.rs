//! `plugwire resolve` - bootstrap a directory and construct one contract

use std::path::Path;

use anyhow::{Context, Result};

use super::app::module_loader;
use super::output::{file_name, Output};
use crate::bootstrap::Bootstrapper;
use crate::config::Config;

pub fn run(output: &Output, dir: &Path, contract: &str, config: Config) -> Result<()> {
    let mut bootstrapper = Bootstrapper::with_config(module_loader(), config);
    let report = bootstrapper
        .register_modules_from(dir)
        .with_context(|| format!("Failed to register modules from {}", dir.display()))?;

    for module in report.failed_modules() {
        output.warn(&format!(
            "{} failed to load: {}",
            file_name(&module.path),
            module.error.as_deref().unwrap_or("unknown error")
        ));
    }

    let instance = bootstrapper.container().resolve(contract)?;
    let implementation = instance.type_ref();

    if output.is_json() {
        output.data(&serde_json::json!({
            "contract": contract,
            "implementation": implementation.name,
            "module": implementation.module.display().to_string(),
            "registered": report.registered,
        }));
    } else {
        output.success(&format!(
            "{} -> {} ({})",
            contract,
            implementation.name,
            file_name(&implementation.module)
        ));
    }

    Ok(())
}
