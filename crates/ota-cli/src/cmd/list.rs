use anyhow::{Context, Result};
use ota_core::{ArtifactRegistry, OtaConfig};

use crate::ui::table::artifact_table;

/// List artifacts in the store
pub fn list(config: &OtaConfig, json: bool) -> Result<()> {
    let registry = ArtifactRegistry::new(&config.store_dir);
    let artifacts = registry.try_list().with_context(|| {
        format!(
            "Failed to read artifact store {}",
            config.store_dir.display()
        )
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&artifacts)?);
        return Ok(());
    }

    if artifacts.is_empty() {
        println!();
        println!("  No apps found in {}.", config.store_dir.display());
        println!("  Place .apk or .ipa files there to publish them.");
        return Ok(());
    }

    println!("{}", artifact_table(registry.root(), &artifacts));
    Ok(())
}
