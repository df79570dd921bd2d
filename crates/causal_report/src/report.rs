use std::path::Path;

use crate::case::CaseRecord;
use crate::diff::highlight_differences;
use crate::error::Result;
use crate::graph::{build_diagram, build_spec_text};
use crate::label::humanize_stem;
use crate::util::write_string;

const MERMAID_CDN: &str = "https://cdn.jsdelivr.net/npm/mermaid/dist/mermaid.min.js";
const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

const STYLE: &str = "  <style>\n    .mermaid { display: flex; justify-content: center; background-color: #ffffff; padding: 20px; border-radius: 12px; box-shadow: inset 0 2px 4px 0 rgba(0, 0, 0, 0.06); }\n    .node rect { fill: #eef2ff !important; stroke: #4f46e5 !important; stroke-width: 2px !important; }\n    .edgePath path { stroke: #6366f1 !important; stroke-width: 2px !important; }\n    .diff-highlight { border-radius: 4px; padding: 0 2px; }\n    .diff-s { background-color: #d1fae5; }\n    .diff-s-prime { background-color: #ffe4e6; }\n  </style>\n";

const MERMAID_INIT: &str = "<script>\n  mermaid.initialize({\n    startOnLoad: true,\n    theme: 'base',\n    themeVariables: {\n      primaryColor: '#eef2ff',\n      primaryTextColor: '#4f46e5',\n      primaryBorderColor: '#4f46e5',\n      lineColor: '#6366f1',\n      secondaryColor: '#f8fafc',\n      tertiaryColor: '#ffffff'\n    }\n  });\n</script>\n";

/// Rendering switches.
///
/// Field values are trusted and interpolated verbatim by default; a case
/// file containing markup will inject it into the report. `escape_html`
/// escapes every interpolated value instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub escape_html: bool,
}

impl RenderOptions {
    fn field(self, value: &str) -> String {
        if self.escape_html {
            v_htmlescape::escape(value).to_string()
        } else {
            value.to_string()
        }
    }
}

/// Subtitle derived from a report path: `daily_delayed_train.html` ->
/// `Daily Delayed Train`.
#[must_use]
pub fn report_title(output_path: &Path) -> String {
    let stem = output_path
        .file_stem()
        .map_or_else(String::new, |stem| stem.to_string_lossy().into_owned());
    humanize_stem(&stem)
}

fn section_header(html: &mut String, color: &str, title: &str) {
    html.push_str(&format!(
        "<div class=\"px-6 py-4 {color}\"><h3 class=\"text-lg font-bold\">{title}</h3></div>\n"
    ));
}

/// Renders the complete report document for one case.
#[must_use]
pub fn render_report(case: &CaseRecord, title: &str, options: RenderOptions) -> String {
    let mut html = String::new();

    html.push_str(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"UTF-8\">\n  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n  <title>Causal Inference Report</title>\n",
    );
    html.push_str(&format!("  <script src=\"{MERMAID_CDN}\"></script>\n"));
    html.push_str(&format!("  <script src=\"{TAILWIND_CDN}\"></script>\n"));
    html.push_str(STYLE);
    html.push_str("</head>\n<body class=\"bg-slate-50 text-slate-900 font-sans antialiased\">\n");
    html.push_str("<div class=\"max-w-5xl mx-auto py-12 px-6\">\n");

    html.push_str("<header class=\"mb-12 border-b border-slate-200 pb-8 text-center\">\n");
    html.push_str(
        "<h1 class=\"text-5xl font-black text-slate-800 tracking-tight mb-4\">Causal Inference <span class=\"text-indigo-600\">Analysis Report</span></h1>\n",
    );
    html.push_str(&format!(
        "<p class=\"text-xl text-slate-500 max-w-2xl mx-auto italic\">{}</p>\n",
        options.field(title)
    ));
    html.push_str("</header>\n");

    html.push_str("<div class=\"grid grid-cols-1 lg:grid-cols-3 gap-8\">\n");
    html.push_str("<div class=\"lg:col-span-1 space-y-8\">\n");

    // Causal structure
    html.push_str(
        "<section class=\"bg-white rounded-2xl shadow-sm border border-slate-200 overflow-hidden\">\n",
    );
    section_header(&mut html, "bg-indigo-600 text-white", "Causal Structure (G)");
    html.push_str("<div class=\"p-6\">\n");
    html.push_str(&format!(
        "<div id=\"mermaid-container\" class=\"mb-4\"><pre class=\"mermaid\">\n{}\n</pre></div>\n",
        options.field(&build_diagram(&case.graph))
    ));
    html.push_str(&format!(
        "<pre class=\"text-xs text-slate-500 font-mono bg-slate-50 p-3 rounded-lg border border-slate-100 whitespace-pre-wrap\">{}</pre>\n",
        options.field(&build_spec_text(&case.graph))
    ));
    if let Some(raw_graph) = &case.raw_graph {
        html.push_str(&format!(
            "<div class=\"text-xs text-slate-400 font-mono mt-3\"><span class=\"font-bold text-slate-500\">Raw Graph:</span> {}</div>\n",
            options.field(raw_graph)
        ));
    }
    html.push_str("</div>\n</section>\n");

    // Intervention and formalism
    html.push_str(
        "<section class=\"bg-white rounded-2xl shadow-sm border border-slate-200 overflow-hidden\">\n",
    );
    section_header(&mut html, "bg-amber-500 text-white", "Intervention &amp; Query");
    html.push_str("<div class=\"p-6 space-y-4\">\n");
    html.push_str(&format!(
        "<div><span class=\"text-xs font-bold text-slate-400 uppercase tracking-wider\">Intervention (V)</span><p class=\"mt-1 font-semibold text-slate-700\">{}</p></div>\n",
        options.field(&case.intervention)
    ));
    html.push_str(&format!(
        "<div><span class=\"text-xs font-bold text-slate-400 uppercase tracking-wider\">Formalism (M)</span><p class=\"mt-1 font-mono text-xs text-indigo-600 bg-indigo-50 p-2 rounded\">{}</p></div>\n",
        options.field(&case.formalism)
    ));
    html.push_str("</div>\n</section>\n");

    html.push_str("</div>\n<div class=\"lg:col-span-2 space-y-8\">\n");

    // Narrative and query
    html.push_str(
        "<section class=\"bg-white rounded-2xl shadow-sm border border-slate-200 overflow-hidden\">\n",
    );
    section_header(&mut html, "bg-slate-800 text-white", "Factual Story (T)");
    html.push_str(&format!(
        "<div class=\"p-8\"><p class=\"text-lg leading-relaxed text-slate-700 italic\">{}</p></div>\n</section>\n",
        options.field(&case.story)
    ));

    html.push_str(
        "<section class=\"bg-white rounded-2xl shadow-sm border border-indigo-200 overflow-hidden ring-4 ring-indigo-50\">\n",
    );
    section_header(&mut html, "bg-indigo-50 text-indigo-900", "Counterfactual Query (Q)");
    html.push_str(&format!(
        "<div class=\"p-8\"><p class=\"text-xl font-medium text-slate-800 leading-snug\">{}</p></div>\n</section>\n",
        options.field(&case.query)
    ));

    // Responses, with the differing word runs highlighted
    let responses = highlight_differences(
        &options.field(&case.response),
        &options.field(&case.response_prime),
    );
    html.push_str("<div class=\"grid grid-cols-1 md:grid-cols-2 gap-6\">\n");
    html.push_str(&format!(
        "<div class=\"bg-white rounded-2xl shadow-sm border border-emerald-200 overflow-hidden\"><div class=\"px-4 py-3 bg-emerald-500 text-white text-sm font-bold uppercase tracking-widest\">Response S</div><div class=\"p-6\"><p class=\"text-slate-600 leading-relaxed\">{}</p></div></div>\n",
        responses.left
    ));
    html.push_str(&format!(
        "<div class=\"bg-white rounded-2xl shadow-sm border border-rose-200 overflow-hidden\"><div class=\"px-4 py-3 bg-rose-500 text-white text-sm font-bold uppercase tracking-widest\">Response S'</div><div class=\"p-6\"><p class=\"text-slate-600 leading-relaxed\">{}</p></div></div>\n",
        responses.right
    ));
    html.push_str("</div>\n");

    let error_text = case.error_text();
    if !error_text.trim().is_empty() {
        html.push_str(
            "<section class=\"bg-rose-50 rounded-2xl shadow-sm border border-rose-200 overflow-hidden\">\n",
        );
        section_header(&mut html, "bg-rose-100 text-rose-900", "Error Analysis");
        html.push_str(&format!(
            "<div class=\"p-8\"><p class=\"text-rose-800 font-semibold text-lg leading-relaxed\">{}</p></div>\n</section>\n",
            options.field(&error_text)
        ));
    }

    html.push_str("</div>\n</div>\n</div>\n");
    html.push_str(MERMAID_INIT);
    html.push_str("</body>\n</html>\n");
    html
}

/// Renders `case` and writes it to `output_path`, creating parent
/// directories and overwriting any existing file.
pub fn write_report(case: &CaseRecord, output_path: &Path, options: RenderOptions) -> Result<()> {
    let html = render_report(case, &report_title(output_path), options);
    write_string(output_path, &html)
}
