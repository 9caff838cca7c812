use stash_domain::{LinkRecord, ResumeRecord, SnippetRecord, matching::contains_ci};
use uuid::Uuid;

const SUBTITLE_PREVIEW_CHARS: usize = 80;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultKind {
	Link,
	Snippet,
	Resume,
}

impl ResultKind {
	pub fn label(self) -> &'static str {
		match self {
			Self::Link => "link",
			Self::Snippet => "snippet",
			Self::Resume => "resume",
		}
	}
}

/// What pressing Enter on a result does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Activation {
	/// Put this text on the system clipboard.
	Copy(String),
	/// Fetch a fresh signed URL for this resume and open it.
	OpenResume(Uuid),
}

/// One row of the merged palette list. Ephemeral; rebuilt on every search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
	pub kind: ResultKind,
	pub id: Uuid,
	pub title: String,
	pub subtitle: String,
	pub activation: Activation,
}

/// Merge the three fetched groups into the fixed presentation order: links,
/// then snippets, then resumes. Links and resumes are filtered client-side
/// against the query; snippets arrive already filtered by the server. Each
/// group keeps at most `group_limit` entries in server order, so the output
/// is deterministic for a fixed query and fixed underlying data.
pub fn merge(
	query: &str,
	links: Vec<LinkRecord>,
	snippets: Vec<SnippetRecord>,
	resumes: Vec<ResumeRecord>,
	group_limit: usize,
) -> Vec<SearchResult> {
	let mut merged = Vec::new();

	merged.extend(
		links
			.into_iter()
			.filter(|link| contains_ci(&link.label, query) || contains_ci(&link.url, query))
			.take(group_limit)
			.map(|link| SearchResult {
				kind: ResultKind::Link,
				id: link.id,
				title: link.label,
				subtitle: link.url.clone(),
				activation: Activation::Copy(link.url),
			}),
	);
	merged.extend(snippets.into_iter().take(group_limit).map(|snippet| SearchResult {
		kind: ResultKind::Snippet,
		id: snippet.id,
		title: snippet.title,
		subtitle: preview(&snippet.body),
		activation: Activation::Copy(snippet.body),
	}));
	merged.extend(
		resumes
			.into_iter()
			.filter(|resume| {
				contains_ci(&resume.label, query)
					|| resume.role_type.as_deref().is_some_and(|role| contains_ci(role, query))
			})
			.take(group_limit)
			.map(|resume| SearchResult {
				kind: ResultKind::Resume,
				id: resume.id,
				title: resume.label,
				subtitle: resume.role_type.unwrap_or_else(|| "Resume".to_string()),
				activation: Activation::OpenResume(resume.id),
			}),
	);

	merged
}

fn preview(body: &str) -> String {
	if body.chars().count() <= SUBTITLE_PREVIEW_CHARS {
		return body.to_string();
	}

	let cut: String = body.chars().take(SUBTITLE_PREVIEW_CHARS).collect();

	format!("{cut}...")
}
