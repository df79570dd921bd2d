//! Identifier and label formatting shared by the diagram, report titles and
//! the manifest.

/// Replaces every character that is not an ASCII letter or digit with `_`,
/// producing an identifier Mermaid accepts as a node id.
#[must_use]
pub fn sanitize_id(raw: &str) -> String {
    raw.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect()
}

/// Display label for a diagram node: underscores become spaces, then upper-case.
#[must_use]
pub fn format_label(raw: &str) -> String {
    raw.replace('_', " ").to_uppercase()
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the
/// rest. Digits and punctuation end a run, so `example1b` becomes `Example1B`.
#[must_use]
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_word = false;
    for ch in raw.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

/// `daily_delayed_train` -> `Daily Delayed Train`.
#[must_use]
pub fn humanize_stem(stem: &str) -> String {
    title_case(&stem.replace('_', " "))
}
