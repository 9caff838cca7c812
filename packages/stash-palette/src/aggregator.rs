use tracing::warn;

use crate::{SearchBackend, SearchResult, results};

/// Fan out to all three resource kinds and merge the outcome.
///
/// The three fetches run concurrently and are joined all-settled: a failing
/// group degrades to an empty list instead of aborting its siblings, so the
/// palette stays usable under partial backend outage. Without a credential
/// this is a no-op returning no results.
pub async fn run_search(
	backend: &dyn SearchBackend,
	query: &str,
	group_limit: usize,
) -> Vec<SearchResult> {
	if !backend.has_credential() {
		return Vec::new();
	}

	let (links, snippets, resumes) = tokio::join!(
		backend.fetch_links(),
		backend.search_snippets(query),
		backend.fetch_resumes(),
	);
	let links = links.unwrap_or_else(|err| {
		warn!(error = %err, "Link fetch failed; dropping group.");

		Vec::new()
	});
	let snippets = snippets.unwrap_or_else(|err| {
		warn!(error = %err, "Snippet search failed; dropping group.");

		Vec::new()
	});
	let resumes = resumes.unwrap_or_else(|err| {
		warn!(error = %err, "Resume fetch failed; dropping group.");

		Vec::new()
	});

	results::merge(query, links, snippets, resumes, group_limit)
}
