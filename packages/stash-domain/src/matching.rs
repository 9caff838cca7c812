/// Case-insensitive substring containment, the only notion of relevance the
/// palette has.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
	if needle.is_empty() {
		return true;
	}

	haystack.to_lowercase().contains(&needle.to_lowercase())
}
