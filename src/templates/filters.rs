//! Custom MiniJinja filters for verdict rendering

use minijinja::Environment;

/// Register all custom filters with the environment
pub fn register_filters(env: &mut Environment<'_>) {
    env.add_filter("excerpt", excerpt);
}

/// Cap free text at `max` characters, marking the cut with an ellipsis.
/// Text of `max` characters or fewer passes through unchanged. Keeps
/// unbounded user input from producing unbounded rationale text.
fn excerpt(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let head: String = value.chars().take(max).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_short_text_unchanged() {
        assert_eq!(excerpt("price", 30), "price");
        assert_eq!(excerpt("", 30), "");
    }

    #[test]
    fn test_excerpt_exact_boundary_unchanged() {
        let exactly_30 = "a".repeat(30);
        assert_eq!(excerpt(&exactly_30, 30), exactly_30);
    }

    #[test]
    fn test_excerpt_long_text_truncated() {
        let long = "a".repeat(31);
        let cut = excerpt(&long, 30);
        assert_eq!(cut.len(), 33);
        assert!(cut.ends_with("..."));
        assert_eq!(&cut[..30], &"a".repeat(30));
    }

    #[test]
    fn test_excerpt_counts_chars_not_bytes() {
        let text = "ééééé";
        assert_eq!(excerpt(text, 5), text);
        assert_eq!(excerpt(text, 4), "éééé...");
    }
}
