//! Text rendering utilities for human-friendly error messages.
//!
//! Provides helpers to format type names, candidate lists
//! and name suggestions in error output.

/// Renders names as a quoted, comma-separated list.
///
/// # Examples
/// ```
/// use wirebox_support::rendering::render_names;
///
/// assert_eq!(render_names(&["db", "cache"]), r#""db", "cache""#);
/// ```
pub fn render_names(names: &[impl AsRef<str>]) -> String {
    names
        .iter()
        .map(|name| format!("{:?}", name.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Shortens a fully qualified type name for display.
///
/// ```
/// use wirebox_support::rendering::shorten_type_name;
///
/// let short = shorten_type_name("my_app::services::user::UserService");
/// assert_eq!(short, "UserService");
///
/// let short = shorten_type_name("alloc::sync::Arc<dyn my_app::traits::Logger>");
/// assert_eq!(short, "Arc<dyn Logger>");
/// ```
pub fn shorten_type_name(full_name: &str) -> String {
    let mut result = String::with_capacity(full_name.len());
    let mut chars = full_name.chars().peekable();
    let mut current_segment = String::new();

    while let Some(ch) = chars.next() {
        match ch {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                current_segment.clear();
            }
            '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&' => {
                result.push_str(&current_segment);
                result.push(ch);
                current_segment.clear();
            }
            _ => current_segment.push(ch),
        }
    }

    result.push_str(&current_segment);
    result
}

/// Suggests registered names that look like `requested`.
///
/// Used for "did you mean?" hints when a dependency name is unknown.
/// Exact names are never suggested; results are ordered best match first.
///
/// ```
/// use wirebox_support::rendering::suggest_names;
///
/// let available = ["config", "database", "logger"];
/// assert_eq!(suggest_names("confg", &available, 3), vec!["config"]);
/// ```
pub fn suggest_names(
    requested: &str,
    available: &[impl AsRef<str>],
    max_suggestions: usize,
) -> Vec<String> {
    let requested_lower = requested.to_lowercase();

    let mut scored: Vec<(&str, usize)> = available
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| *name != requested)
        .filter_map(|name| {
            let name_lower = name.to_lowercase();

            if name_lower == requested_lower {
                return Some((name, 200));
            }

            if name_lower.contains(&requested_lower) || requested_lower.contains(&name_lower) {
                return Some((name, 100));
            }

            if close_enough(&requested_lower, &name_lower) {
                return Some((name, 80));
            }

            let common = name_lower
                .chars()
                .zip(requested_lower.chars())
                .take_while(|(a, b)| a == b)
                .count();

            (common >= 3).then_some((name, common * 10))
        })
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Quick similarity heuristic: lengths within 3 and at least 60% of the
/// positions agree once a single insertion or deletion is allowed.
fn close_enough(a: &str, b: &str) -> bool {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.len().abs_diff(b.len()) > 3 {
        return false;
    }

    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return true;
    }

    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };

    // Align from the front until the first mismatch, then from the back.
    let prefix = short.iter().zip(long.iter()).take_while(|(x, y)| x == y).count();
    let suffix = short[prefix..]
        .iter()
        .rev()
        .zip(long[prefix..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();

    (prefix + suffix) * 100 / max_len >= 60
}
