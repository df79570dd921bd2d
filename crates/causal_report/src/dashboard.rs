//! Static dashboard page. It fetches the manifest on load, so the page itself
//! never changes and the server only has to keep the manifest current.

use std::path::Path;

use crate::error::Result;
use crate::layout::MANIFEST_FILE;
use crate::util::write_string;

const MANIFEST_PLACEHOLDER: &str = "__MANIFEST_URL__";

const DASHBOARD_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Causal Inference Reports</title>
  <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-slate-50 text-slate-900 font-sans antialiased">
<div class="max-w-5xl mx-auto py-12 px-6">
  <header class="mb-10 border-b border-slate-200 pb-6">
    <h1 class="text-4xl font-black text-slate-800 tracking-tight">Causal Inference <span class="text-indigo-600">Reports</span></h1>
    <p id="summary" class="mt-2 text-slate-500">Loading manifest...</p>
  </header>
  <main id="groups" class="space-y-8"></main>
</div>
<script>
  async function loadManifest() {
    const summary = document.getElementById('summary');
    const groups = document.getElementById('groups');
    try {
      const response = await fetch('__MANIFEST_URL__', { cache: 'no-store' });
      const entries = await response.json();
      const byType = new Map();
      for (const entry of entries) {
        if (!byType.has(entry.type)) byType.set(entry.type, []);
        byType.get(entry.type).push(entry);
      }
      summary.textContent = `${entries.length} examples in ${byType.size} categories`;
      groups.replaceChildren();
      for (const [type, items] of byType) {
        const section = document.createElement('section');
        section.className = 'bg-white rounded-2xl shadow-sm border border-slate-200 p-6';
        const heading = document.createElement('h2');
        heading.className = 'text-sm font-bold text-slate-400 uppercase tracking-wider mb-3';
        heading.textContent = type;
        const list = document.createElement('ul');
        list.className = 'space-y-1';
        for (const item of items) {
          const li = document.createElement('li');
          const link = document.createElement('a');
          link.href = `${encodeURIComponent(item.id)}.html`;
          link.className = 'text-indigo-600 hover:underline';
          link.textContent = item.name;
          li.appendChild(link);
          list.appendChild(li);
        }
        section.append(heading, list);
        groups.appendChild(section);
      }
    } catch (err) {
      summary.textContent = 'Failed to load manifest: ' + err;
    }
  }
  document.addEventListener('DOMContentLoaded', loadManifest);
</script>
</body>
</html>
"#;

#[must_use]
pub fn render_dashboard() -> String {
    DASHBOARD_TEMPLATE.replace(MANIFEST_PLACEHOLDER, MANIFEST_FILE)
}

pub fn write_dashboard(path: &Path) -> Result<()> {
    write_string(path, &render_dashboard())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::{render_dashboard, write_dashboard};

    #[test]
    fn dashboard_fetches_relative_manifest() {
        let html = render_dashboard();
        assert!(html.contains("fetch('manifest.json'"));
        assert!(!html.contains("__MANIFEST_URL__"));
    }

    #[test]
    fn repeated_writes_are_identical() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("site/index.html");
        write_dashboard(&path).expect("first write");
        let first = std::fs::read(&path).expect("read");
        write_dashboard(&path).expect("second write");
        assert_eq!(first, std::fs::read(&path).expect("read"));
    }
}
