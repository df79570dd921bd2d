//! Word-level comparison of the two candidate responses.
//!
//! Words are compared position by position; runs of differing positions are
//! wrapped in a highlight span on each side. This is intentionally not an
//! edit-distance diff: an inserted word shifts every following position.

/// The two responses with their differing runs wrapped in highlight markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedPair {
    pub left: String,
    pub right: String,
}

const LEFT_CLASS: &str = "diff-highlight diff-s";
const RIGHT_CLASS: &str = "diff-highlight diff-s-prime";

fn highlight(class: &str, words: &[&str]) -> String {
    format!(
        "<span class=\"{class}\"><strong>{}</strong></span> ",
        words.join(" ")
    )
}

/// Highlights the word runs where `left` and `right` differ. When either
/// side is empty both are returned unchanged.
#[must_use]
pub fn highlight_differences(left: &str, right: &str) -> HighlightedPair {
    if left.is_empty() || right.is_empty() {
        return HighlightedPair {
            left: left.to_string(),
            right: right.to_string(),
        };
    }

    let left_words: Vec<&str> = left.split_whitespace().collect();
    let right_words: Vec<&str> = right.split_whitespace().collect();
    let max_len = left_words.len().max(right_words.len());
    let same_at = |i: usize| left_words.get(i) == right_words.get(i);

    let mut left_out = String::new();
    let mut right_out = String::new();
    let mut i = 0;

    while i < max_len {
        if same_at(i) {
            let start = i;
            while i < max_len && same_at(i) {
                i += 1;
            }
            let shared = left_words[start..i].join(" ");
            left_out.push_str(&shared);
            left_out.push(' ');
            right_out.push_str(&shared);
            right_out.push(' ');
        } else {
            let mut left_run = Vec::new();
            let mut right_run = Vec::new();
            while i < max_len && !same_at(i) {
                left_run.extend(left_words.get(i));
                right_run.extend(right_words.get(i));
                i += 1;
            }
            if !left_run.is_empty() {
                left_out.push_str(&highlight(LEFT_CLASS, &left_run));
            }
            if !right_run.is_empty() {
                right_out.push_str(&highlight(RIGHT_CLASS, &right_run));
            }
        }
    }

    HighlightedPair {
        left: left_out.trim().to_string(),
        right: right_out.trim().to_string(),
    }
}
