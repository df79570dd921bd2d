/// Prefix used to tag an error comment with its classification.
#[must_use]
pub fn error_prefix(error_type: &str) -> String {
    format!("Type {error_type}:")
}

/// Combines the optional error classification with the free-text comment.
///
/// With a tag, the comment is prefixed with `Type {tag}:` unless it already
/// starts with exactly that prefix, in which case it is returned untouched.
/// Without a tag the comment is returned as-is, even when empty.
#[must_use]
pub fn annotate_error(error_type: Option<&str>, comment: &str) -> String {
    let Some(error_type) = error_type else {
        return comment.to_string();
    };

    let prefix = error_prefix(error_type);
    let trimmed = comment.trim();
    if trimmed.starts_with(&prefix) {
        return comment.to_string();
    }
    format!("{prefix} {trimmed}").trim_end().to_string()
}
