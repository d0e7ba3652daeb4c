use anyhow::Result;
use ota_core::OtaConfig;

/// Run the HTTP server until Ctrl-C
pub async fn serve(config: &OtaConfig) -> Result<()> {
    crate::server::serve(config).await
}
