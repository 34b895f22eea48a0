//! Search filtering for option lists.
//!
//! Matching is a case-insensitive substring test of the trimmed query
//! against each option's label.  A blank query matches everything; option
//! order is always preserved.

use crate::choice::Choice;

/// Whether `label` matches `query` under the widget filter rules.
pub fn matches(label: &str, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    label.to_lowercase().contains(&query.to_lowercase())
}

/// Indices of the options whose labels match `query`, in original order.
///
/// Returning indices rather than clones keeps the filtered view cheap to
/// recompute on every keystroke and lets callers index back into the full
/// option list.
pub fn filtered_indices(options: &[Choice], query: &str) -> Vec<usize> {
    options
        .iter()
        .enumerate()
        .filter(|(_, opt)| matches(&opt.label, query))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<Choice> {
        vec![
            Choice::new("a", "Alpha"),
            Choice::new("b", "Beta").disabled(),
            Choice::new("c", "Gamma"),
        ]
    }

    #[test]
    fn blank_query_matches_all() {
        assert_eq!(filtered_indices(&options(), ""), vec![0, 1, 2]);
        assert_eq!(filtered_indices(&options(), "   "), vec![0, 1, 2]);
    }

    #[test]
    fn substring_case_insensitive() {
        assert_eq!(filtered_indices(&options(), "gam"), vec![2]);
        assert_eq!(filtered_indices(&options(), "GAM"), vec![2]);
        assert_eq!(filtered_indices(&options(), "a"), vec![0, 1, 2]);
    }

    #[test]
    fn query_is_trimmed() {
        assert_eq!(filtered_indices(&options(), "  beta  "), vec![1]);
    }

    #[test]
    fn no_match_yields_empty() {
        assert!(filtered_indices(&options(), "zzz").is_empty());
    }

    #[test]
    fn order_preserved() {
        let opts = vec![
            Choice::new("1", "ba"),
            Choice::new("2", "ab"),
            Choice::new("3", "aba"),
        ];
        assert_eq!(filtered_indices(&opts, "a"), vec![0, 1, 2]);
        assert_eq!(filtered_indices(&opts, "ab"), vec![1, 2]);
    }

    #[test]
    fn disabled_options_still_filterable() {
        // Filtering is purely textual; disabled state only affects
        // highlighting and selection.
        assert_eq!(filtered_indices(&options(), "bet"), vec![1]);
    }
}
