//! The unified search palette: one query, three record kinds, one ranked
//! list under a single keyboard contract.
//!
//! The state machine ([`Palette`]) is UI-framework-free and synchronous; the
//! driving application owns the event loop, asks [`Palette::take_due`] when
//! the debounce deadline passes, runs [`aggregator::run_search`] on the
//! runtime, and feeds the outcome back through [`Palette::commit`].

pub mod activate;
pub mod aggregator;
pub mod clipboard;
pub mod results;
pub mod state;

pub use activate::{ActivationOutcome, Launcher, SystemLauncher};
pub use results::{Activation, ResultKind, SearchResult};
pub use state::{Key, KeyOutcome, Palette, SearchTicket, SelectionMove};

use std::{future::Future, pin::Pin};

use stash_domain::{LinkRecord, ResumeRecord, SnippetRecord};
use uuid::Uuid;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What the palette needs from the resource gateway. One implementation
/// speaks HTTP (`stash-client`); tests script their own.
pub trait SearchBackend
where
	Self: Send + Sync,
{
	/// Whether a bearer credential is on hand. Without one a search is a
	/// no-op that leaves the result list empty.
	fn has_credential(&self) -> bool;

	fn fetch_links(&self) -> BoxFuture<'_, Result<Vec<LinkRecord>, BackendError>>;

	fn search_snippets<'a>(
		&'a self,
		query: &'a str,
	) -> BoxFuture<'a, Result<Vec<SnippetRecord>, BackendError>>;

	fn fetch_resumes(&self) -> BoxFuture<'_, Result<Vec<ResumeRecord>, BackendError>>;

	/// Mint a fresh signed URL for one resume. Never cached; issued URLs
	/// expire.
	fn resume_url(&self, id: Uuid) -> BoxFuture<'_, Result<String, BackendError>>;
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
	#[error("Unauthorized.")]
	Unauthorized,
	#[error("HTTP status {status}.")]
	Status { status: u16 },
	#[error("{message}")]
	Transport { message: String },
}
