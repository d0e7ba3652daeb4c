use anyhow::{Result, bail};
use ota_core::{ArtifactRegistry, OtaConfig, manifest};
use ota_schema::ResolvedHost;

use crate::ManifestArgs;

/// Print the install manifest for one artifact
pub fn manifest(config: &OtaConfig, args: &ManifestArgs) -> Result<()> {
    let host = ResolvedHost::parse(&args.base_url)?;
    let registry = ArtifactRegistry::new(&config.store_dir);
    if !registry.contains(&args.file)? {
        bail!(
            "'{}' is not in the artifact store {}",
            args.file,
            config.store_dir.display()
        );
    }

    let mut req = config.defaults.request_for(args.file.as_str());
    if let Some(bundle_id) = &args.bundle_id {
        req = req.with_bundle_id(bundle_id.as_str());
    }
    if let Some(version) = &args.version {
        req = req.with_version(version.as_str());
    }
    if let Some(title) = &args.title {
        req = req.with_title(title.as_str());
    }

    let generated = manifest::generate(&req, &host)?;
    tracing::debug!(asset_url = generated.asset_url(), "generated manifest");
    print!("{}", generated.as_str());
    Ok(())
}
