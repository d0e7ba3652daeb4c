//! HTML for the downloads listing.

use ota_core::listing::{InstallAction, ListingEntry};
use quick_xml::escape::escape;
use std::fmt::Write;

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>App Downloads</title>
<style>
body { font-family: system-ui, sans-serif; max-width: 42rem; margin: 2rem auto; padding: 0 1rem; }
.entry { border: 1px solid #ddd; border-radius: .5rem; padding: 1rem; margin-bottom: 1rem; display: flex; justify-content: space-between; align-items: flex-start; gap: 1rem; }
.platform { color: #666; font-size: .875rem; }
.button { color: #fff; padding: .5rem 1rem; border-radius: .25rem; text-decoration: none; font-size: .875rem; white-space: nowrap; }
.ios { background: #2563eb; } .android { background: #16a34a; }
.debug-log { background: #000; color: #4ade80; font: .75rem monospace; padding: .5rem; max-width: 300px; white-space: pre-wrap; overflow-x: auto; }
.note { color: #666; font-size: .875rem; }
.instructions { margin-top: 3rem; padding: 1rem; background: #f3f4f6; border-radius: .25rem; font-size: .875rem; }
</style>
</head>
<body>
<main>
<h1>App Downloads</h1>
"#;

// Prepends "[time] Clicked install for <file>." lines to the entry's own panel.
const SCRIPT: &str = r#"<script>
document.querySelectorAll("a.ios[data-file]").forEach(function (link) {
  link.addEventListener("click", function () {
    var panel = document.getElementById(link.dataset.log);
    var line = document.createElement("div");
    line.textContent = "[" + new Date().toLocaleTimeString() + "] Clicked install for " +
      link.dataset.file + ".\nURL: " + link.href;
    panel.insertBefore(line, panel.children[1] || null);
    panel.hidden = false;
  });
});
</script>
"#;

const FOOT: &str = r#"<div class="instructions">
<h3>Instructions</h3>
<ul>
<li>Place <strong>.apk</strong> or <strong>.ipa</strong> files in the artifact store directory.</li>
<li>Links are generated for the domain you are visiting, including tunnels such as ngrok.</li>
<li>The bundle identifier in the manifest must match the signed <strong>.ipa</strong> exactly.</li>
</ul>
</div>
</main>
"#;

/// Render the listing page.
pub fn render_listing(entries: &[ListingEntry]) -> String {
    let mut html = String::from(HEAD);

    if entries.is_empty() {
        html.push_str(
            "<p class=\"note\">No apps found. Add .ipa or .apk files to the artifact store to publish them.</p>\n",
        );
    }

    for (i, entry) in entries.iter().enumerate() {
        let file = escape(entry.artifact.filename.as_str());
        let _ = write!(
            html,
            "<div class=\"entry\">\n<div>\n<h2>{file}</h2>\n<span class=\"platform\">{}</span>\n</div>\n<div>\n",
            entry.artifact.platform
        );
        match &entry.action {
            InstallAction::Manifest {
                install_uri: Some(uri),
                ..
            } => {
                let _ = write!(
                    html,
                    "<a class=\"button ios\" href=\"{}\" data-file=\"{file}\" data-log=\"log-{i}\">Install iOS</a>\n\
                     <div class=\"debug-log\" id=\"log-{i}\" hidden><strong>Debug Logs</strong></div>\n",
                    escape(uri.as_str())
                );
            }
            InstallAction::Manifest {
                install_uri: None, ..
            } => {
                html.push_str(
                    "<span class=\"note\">Open this page in Safari on iOS to install.</span>\n",
                );
            }
            InstallAction::Download { url } => {
                let _ = write!(
                    html,
                    "<a class=\"button android\" href=\"{}\" download>Download APK</a>\n",
                    escape(url.as_str())
                );
            }
            InstallAction::NotInstallable => {
                html.push_str("<span class=\"note\">Not installable</span>\n");
            }
        }
        html.push_str("</div>\n</div>\n");
    }

    html.push_str(FOOT);
    if !entries.is_empty() {
        html.push_str(SCRIPT);
    }
    html.push_str("</body>\n</html>\n");
    html
}
