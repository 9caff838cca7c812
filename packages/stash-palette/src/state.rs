use std::time::Duration;

use tokio::time::Instant;

use crate::SearchResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionMove {
	Up,
	Down,
}

/// Keys the palette cares about, already translated from whatever the
/// frontend's raw events look like.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
	Up,
	Down,
	Enter,
	Esc,
	/// The global open shortcut (Ctrl+K in the TUI).
	Toggle,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
	Ignored,
	Opened,
	Closed,
	Moved,
	Activate(SearchResult),
}

/// Permission to run one search: the query text plus the sequence number the
/// eventual commit must present.
#[derive(Clone, Debug)]
pub struct SearchTicket {
	pub seq: u64,
	pub query: String,
}

#[derive(Clone, Debug)]
struct PendingSearch {
	seq: u64,
	query: String,
	deadline: Instant,
}

/// The palette's entire mutable state: (query, results, selection) plus the
/// debounce schedule and the sequence counters guarding against stale
/// commits. All mutation happens on the driving task; searches themselves
/// run elsewhere and report back through [`Palette::commit`].
pub struct Palette {
	debounce: Duration,
	open: bool,
	query: String,
	results: Vec<SearchResult>,
	selection: usize,
	issued_seq: u64,
	pending: Option<PendingSearch>,
	inflight: Option<u64>,
	notice: Option<String>,
}

impl Palette {
	pub fn new(debounce: Duration) -> Self {
		Self {
			debounce,
			open: false,
			query: String::new(),
			results: Vec::new(),
			selection: 0,
			issued_seq: 0,
			pending: None,
			inflight: None,
			notice: None,
		}
	}

	pub fn is_open(&self) -> bool {
		self.open
	}

	pub fn query(&self) -> &str {
		&self.query
	}

	pub fn results(&self) -> &[SearchResult] {
		&self.results
	}

	pub fn selection(&self) -> usize {
		self.selection
	}

	pub fn selected(&self) -> Option<&SearchResult> {
		self.results.get(self.selection)
	}

	/// A fetch is outstanding or scheduled; render "Searching..." rather
	/// than "No results".
	pub fn searching(&self) -> bool {
		self.pending.is_some() || self.inflight.is_some()
	}

	pub fn notice(&self) -> Option<&str> {
		self.notice.as_deref()
	}

	pub fn set_notice(&mut self, message: impl Into<String>) {
		self.notice = Some(message.into());
	}

	pub fn dismiss_notice(&mut self) {
		self.notice = None;
	}

	/// Open with a clean slate: no carryover of query, results, selection,
	/// or a pending search from a previous open/close cycle.
	pub fn open(&mut self) {
		self.open = true;
		self.query.clear();
		self.results.clear();
		self.selection = 0;
		self.pending = None;
		self.inflight = None;
		// Bump so anything still in flight from the previous cycle can never
		// commit into this one.
		self.issued_seq += 1;
	}

	pub fn close(&mut self) {
		self.open = false;
		self.pending = None;
	}

	/// Record a keystroke. Trailing-edge debounce: every call cancels the
	/// previous schedule; an empty or whitespace-only query clears the list
	/// immediately and schedules nothing.
	pub fn set_query(&mut self, text: &str) {
		self.query = text.to_string();
		self.issued_seq += 1;

		if text.trim().is_empty() {
			self.results.clear();
			self.selection = 0;
			self.pending = None;
			self.inflight = None;

			return;
		}

		self.pending = Some(PendingSearch {
			seq: self.issued_seq,
			query: text.to_string(),
			deadline: Instant::now() + self.debounce,
		});
	}

	/// The instant the driver should wake up to fire the pending search.
	pub fn debounce_deadline(&self) -> Option<Instant> {
		self.pending.as_ref().map(|pending| pending.deadline)
	}

	/// Hand out the pending search once its quiet period has elapsed.
	pub fn take_due(&mut self, now: Instant) -> Option<SearchTicket> {
		let due = self.pending.as_ref().is_some_and(|pending| pending.deadline <= now);

		if !due {
			return None;
		}

		let pending = self.pending.take()?;

		self.inflight = Some(pending.seq);

		Some(SearchTicket { seq: pending.seq, query: pending.query })
	}

	/// Apply a finished search. Only the most-recently-issued query may
	/// commit, and never into a closed palette; everything else is
	/// discarded so a slow old response can never clobber a newer one.
	pub fn commit(&mut self, seq: u64, results: Vec<SearchResult>) -> bool {
		if self.inflight == Some(seq) {
			self.inflight = None;
		}
		if !self.open || seq != self.issued_seq {
			return false;
		}

		self.results = results;
		self.selection = 0;

		true
	}

	/// Clamped cursor movement; no wraparound, no-op on an empty list.
	pub fn move_selection(&mut self, direction: SelectionMove) {
		if self.results.is_empty() {
			self.selection = 0;

			return;
		}

		self.selection = match direction {
			SelectionMove::Down => (self.selection + 1).min(self.results.len() - 1),
			SelectionMove::Up => self.selection.saturating_sub(1),
		};
	}

	/// The keyboard contract. The toggle chord only opens from the closed
	/// state; while open it is reserved and ignored.
	pub fn handle_key(&mut self, key: Key) -> KeyOutcome {
		if !self.open {
			return match key {
				Key::Toggle => {
					self.open();

					KeyOutcome::Opened
				},
				_ => KeyOutcome::Ignored,
			};
		}

		match key {
			Key::Down => {
				self.move_selection(SelectionMove::Down);

				KeyOutcome::Moved
			},
			Key::Up => {
				self.move_selection(SelectionMove::Up);

				KeyOutcome::Moved
			},
			Key::Enter => match self.selected().cloned() {
				Some(result) => KeyOutcome::Activate(result),
				None => KeyOutcome::Ignored,
			},
			Key::Esc => {
				self.close();

				KeyOutcome::Closed
			},
			Key::Toggle => KeyOutcome::Ignored,
		}
	}
}
