use anyhow::Result;
use ota_core::listing::{InstallAction, build_listing};
use ota_core::trigger::{ClientCapabilities, InstallLog};
use ota_core::{ArtifactRegistry, OtaConfig};
use ota_schema::ResolvedHost;

/// Print install links for every iOS artifact
pub fn link(config: &OtaConfig, base_url: &str, verbose: bool) -> Result<()> {
    let host = ResolvedHost::parse(base_url)?;
    let caps = ClientCapabilities::for_host(&host);
    let registry = ArtifactRegistry::new(&config.store_dir);
    let entries = build_listing(registry.list(), &caps, &config.defaults);

    let mut log = InstallLog::new();
    let mut count = 0;
    for entry in &entries {
        let InstallAction::Manifest {
            manifest_url,
            install_uri: Some(uri),
        } = &entry.action
        else {
            continue;
        };
        println!("{}", entry.artifact.filename);
        println!("  manifest: {manifest_url}");
        println!("  install:  {uri}");
        log.record_link(&entry.artifact.filename, uri);
        count += 1;
    }

    if count == 0 {
        println!("No iOS artifacts in {}.", config.store_dir.display());
    }

    if verbose {
        for line in log.entries() {
            eprintln!("{line}");
        }
    }
    Ok(())
}
