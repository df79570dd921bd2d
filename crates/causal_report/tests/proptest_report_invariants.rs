//! Property-based invariants for the derivations feeding the report:
//!
//! 1. Specification text has two lines, or three with bidirected pairs.
//! 2. Each directed edge yields one diagram line, in input order, naming
//!    both sanitized ids and both formatted labels.
//! 3. `sanitize_id` and `format_label` are idempotent.
//! 4. Error annotation never repeats the type prefix.
//! 5. The manifest is sorted by `(type, name)` and rebuilds byte-identically.

use std::fs;

use causal_report::annotate::{annotate_error, error_prefix};
use causal_report::graph::{GraphSpec, MERMAID_LINE_BREAK, build_diagram, build_spec_text};
use causal_report::label::{format_label, sanitize_id};
use causal_report::manifest::build_manifest;
use indexmap::IndexMap;
use proptest::prelude::*;
use tempfile::tempdir;

// ── Strategies ────────────────────────────────────────────────────────────

fn node_id() -> impl Strategy<Value = String> {
    "[A-Z][a-z0-9'?]{0,3}"
}

fn pairs(max: usize) -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((node_id(), node_id()), 0..max)
}

fn graph() -> impl Strategy<Value = GraphSpec> {
    (
        prop::collection::vec((node_id(), "[a-z_ ]{1,10}"), 0..6),
        pairs(8),
        pairs(4),
    )
        .prop_map(|(names, edge_pairs, bidirected_pairs)| GraphSpec {
            variable_mapping: names.into_iter().collect::<IndexMap<_, _>>(),
            edge_pairs,
            bidirected_pairs,
        })
}

// ═══════════════════════════════════════════════════════════════════════════
// 1. Specification text line count
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn spec_text_line_count_tracks_bidirected_pairs(graph in graph()) {
        let text = build_spec_text(&graph);
        let expected = if graph.bidirected_pairs.is_empty() { 2 } else { 3 };
        prop_assert_eq!(text.split('\n').count(), expected);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// 2. Directed diagram lines
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn directed_lines_follow_edge_order(graph in graph()) {
        let diagram = build_diagram(&graph);
        let lines: Vec<&str> = diagram.split(MERMAID_LINE_BREAK).collect();

        prop_assert_eq!(lines[0], "graph TD");
        prop_assert_eq!(
            lines.len(),
            1 + graph.edge_pairs.len() + graph.bidirected_pairs.len() + 1
        );

        for (index, (from, to)) in graph.edge_pairs.iter().enumerate() {
            let line = lines[index + 1];
            prop_assert!(line.contains(" --> "));
            let (left, right) = line.split_once(" --> ").expect("arrow present");
            prop_assert!(left.contains(&sanitize_id(from)));
            prop_assert!(left.contains(&graph.label_for(from)));
            prop_assert!(right.contains(&sanitize_id(to)));
            prop_assert!(right.contains(&graph.label_for(to)));
        }

        for index in 0..graph.bidirected_pairs.len() {
            let line = lines[1 + graph.edge_pairs.len() + index];
            prop_assert!(line.contains(" <-.-> "));
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// 3. Formatter idempotence
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn sanitize_id_is_idempotent(raw in ".{0,32}") {
        let once = sanitize_id(&raw);
        prop_assert_eq!(sanitize_id(&once), once.clone());
        prop_assert!(once.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_'));
    }

    #[test]
    fn format_label_is_idempotent(raw in "[a-zA-Z0-9_ .'-]{0,32}") {
        let once = format_label(&raw);
        prop_assert_eq!(format_label(&once), once);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// 4. Error annotation never double-prefixes
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn annotation_has_single_prefix(
        tag in "[0-9A-Za-z]{1,3}",
        body in "[a-z ,.]{0,40}",
        already_prefixed in any::<bool>(),
    ) {
        let prefix = error_prefix(&tag);
        let comment = if already_prefixed {
            format!("{prefix} {body}")
        } else {
            body.clone()
        };

        let annotated = annotate_error(Some(&tag), &comment);
        prop_assert!(annotated.trim_start().starts_with(&prefix));
        prop_assert_eq!(annotated.matches(&prefix).count(), 1);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// 5. Manifest ordering and idempotence
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn manifest_is_sorted_and_stable(
        stems in prop::collection::btree_set("[a-c]{1,3}(_[a-z0-9]{1,5}){0,2}", 0..12),
    ) {
        let temp = tempdir().expect("tempdir");
        let input = temp.path().join("example");
        fs::create_dir_all(&input).expect("mkdir");
        for stem in &stems {
            fs::write(input.join(format!("{stem}.json")), "{}").expect("write case");
        }
        let output = temp.path().join("reports/manifest.json");

        let entries = build_manifest(&input, &output).expect("build manifest");
        prop_assert_eq!(entries.len(), stems.len());
        for window in entries.windows(2) {
            prop_assert!(
                (&window[0].kind, &window[0].name) <= (&window[1].kind, &window[1].name),
                "{:?} sorted after {:?}", window[1], window[0]
            );
        }

        let first = fs::read(&output).expect("read manifest");
        build_manifest(&input, &output).expect("rebuild manifest");
        prop_assert_eq!(first, fs::read(&output).expect("reread manifest"));
    }
}
