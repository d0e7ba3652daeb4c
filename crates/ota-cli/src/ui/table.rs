//! Table rendering for `ota list`

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use ota_schema::Artifact;
use std::path::Path;

/// Render artifacts as a table: Filename | Platform | Size | Install
pub fn artifact_table(root: &Path, artifacts: &[Artifact]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Filename", "Platform", "Size", "Install"]);

    for artifact in artifacts {
        // The file may vanish between listing and stat.
        let size = std::fs::metadata(root.join(&artifact.filename))
            .map(|m| format_size(m.len()))
            .unwrap_or_else(|_| "-".to_string());
        let install = if artifact.platform.is_installable() {
            "yes"
        } else {
            "no"
        };
        table.add_row(vec![
            artifact.filename.clone(),
            artifact.platform.to_string(),
            size,
            install.to_string(),
        ]);
    }
    table
}

/// Human-readable byte count (1024-based)
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_table_rows() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.ipa"), vec![0u8; 2048]).unwrap();
        let artifacts = vec![Artifact::new("a.ipa"), Artifact::new("gone.txt")];
        let rendered = artifact_table(dir.path(), &artifacts).to_string();
        assert!(rendered.contains("a.ipa"));
        assert!(rendered.contains("iOS"));
        assert!(rendered.contains("2.0 KB"));
        assert!(rendered.contains("Unknown"));
    }
}
