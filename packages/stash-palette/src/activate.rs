use tracing::warn;

use crate::{Activation, BackendError, SearchBackend, SearchResult, clipboard};

/// Side-effect seam for activation: tests swap in a recorder, the TUI uses
/// the real clipboard and URL opener.
pub trait Launcher
where
	Self: Send + Sync,
{
	fn copy(&self, text: &str) -> Result<(), String>;

	fn open_url(&self, url: &str) -> Result<(), String>;
}

pub struct SystemLauncher;

impl Launcher for SystemLauncher {
	fn copy(&self, text: &str) -> Result<(), String> {
		clipboard::copy(text).map_err(|err| err.to_string())
	}

	fn open_url(&self, url: &str) -> Result<(), String> {
		open::that(url).map_err(|err| err.to_string())
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActivationOutcome {
	Done,
	/// The user asked for something and did not get it; show this.
	Notice(String),
}

/// Carry out a result's activation. Copy failures are best-effort (logged,
/// not surfaced); a failed signed-URL fetch is surfaced, since it blocks the
/// action the user explicitly requested. The caller closes the palette after
/// any attempt, success or not.
pub async fn activate(
	backend: &dyn SearchBackend,
	launcher: &dyn Launcher,
	result: &SearchResult,
) -> ActivationOutcome {
	match &result.activation {
		Activation::Copy(text) => {
			if let Err(err) = launcher.copy(text) {
				warn!(error = %err, "Clipboard copy failed.");
			}

			ActivationOutcome::Done
		},
		Activation::OpenResume(id) => match backend.resume_url(*id).await {
			Ok(url) => match launcher.open_url(&url) {
				Ok(()) => ActivationOutcome::Done,
				Err(err) => {
					warn!(error = %err, "Failed to open resume URL.");

					ActivationOutcome::Notice("Could not open the resume.".to_string())
				},
			},
			Err(err) => {
				warn!(error = %err, "Signed URL request failed.");

				ActivationOutcome::Notice(notice_for(&err))
			},
		},
	}
}

fn notice_for(err: &BackendError) -> String {
	match err {
		BackendError::Unauthorized => "Sign in again to open resumes.".to_string(),
		_ => "Could not fetch a resume link. Try again.".to_string(),
	}
}
