//! Name search over the fetched list.
//!
//! The filter always runs against the full list with the current query, so
//! editing a query can bring back records an earlier query excluded.

use crate::state::Pokemon;

/// Queries shorter than this (after trimming) show the full list.
pub const MIN_QUERY_LEN: usize = 3;

/// Normalised needle, or `None` when the query is too short to filter on.
pub fn active_needle(query: &str) -> Option<String> {
    let needle = query.trim().to_lowercase();
    if needle.chars().count() >= MIN_QUERY_LEN {
        Some(needle)
    } else {
        None
    }
}

pub fn matches(pokemon: &Pokemon, needle: &str) -> bool {
    pokemon.name.to_lowercase().contains(needle)
}

/// Indices of `all` to display for `query`, in list order.
pub fn filter_indices(all: &[Pokemon], query: &str) -> Vec<usize> {
    match active_needle(query) {
        None => (0..all.len()).collect(),
        Some(needle) => all
            .iter()
            .enumerate()
            .filter(|(_, pokemon)| matches(pokemon, &needle))
            .map(|(idx, _)| idx)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dex() -> Vec<Pokemon> {
        ["bulbasaur", "ivysaur", "charmander", "charmeleon", "pikachu", "raichu"]
            .iter()
            .enumerate()
            .map(|(idx, name)| Pokemon {
                id: idx as u32 + 1,
                name: name.to_string(),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_short_query_resets_to_full_list() {
        let all = dex();
        assert_eq!(filter_indices(&all, ""), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(filter_indices(&all, "ch"), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(filter_indices(&all, "  ch  "), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_substring_match_is_case_insensitive() {
        let all = dex();
        assert_eq!(filter_indices(&all, "CHAR"), vec![2, 3]);
        assert_eq!(filter_indices(&all, "chu"), vec![4, 5]);
        assert_eq!(filter_indices(&all, "saur"), vec![0, 1]);
    }

    #[test]
    fn test_edits_refilter_the_full_list() {
        let all = dex();
        assert_eq!(filter_indices(&all, "pika"), vec![4]);
        assert_eq!(filter_indices(&all, "pik"), vec![4]);
        assert_eq!(filter_indices(&all, "char"), vec![2, 3]);
    }

    #[test]
    fn test_no_match_is_empty() {
        assert!(filter_indices(&dex(), "mewtwo").is_empty());
    }

    #[test]
    fn test_active_needle_counts_chars() {
        assert_eq!(active_needle("ab"), None);
        assert_eq!(active_needle(" AbC "), Some("abc".to_string()));
        assert_eq!(active_needle("fl\u{e9}"), Some("fl\u{e9}".to_string()));
    }
}
