//! Best-effort system clipboard writes for result activation.

use std::{
	env,
	io::{self, Write},
	process::{Command, Stdio},
};

use base64::Engine;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("No clipboard mechanism accepted the text.")]
	NoBackend,
	#[error("Clipboard write failed: {0}")]
	Io(#[from] io::Error),
}

/// Local tools to pipe through when the terminal ignores OSC52, in
/// preference order. `wl-copy` only applies under a Wayland session.
const FALLBACK_TOOLS: [(&str, &[&str]); 3] = [
	("xclip", &["-selection", "clipboard"]),
	("xsel", &["--clipboard", "--input"]),
	("pbcopy", &[]),
];

/// Put `text` on the system clipboard.
///
/// OSC52 goes first: it asks the hosting terminal to do the copy, which is
/// the only route that works across an ssh hop. Local tools are the
/// fallback when stdout is not a capable terminal.
pub fn copy(text: &str) -> Result<()> {
	if write_osc52(text).is_ok() {
		return Ok(());
	}

	if env::var_os("WAYLAND_DISPLAY").is_some() && pipe_through("wl-copy", &[], text).is_ok() {
		return Ok(());
	}

	for (tool, args) in FALLBACK_TOOLS {
		if pipe_through(tool, args, text).is_ok() {
			return Ok(());
		}
	}

	Err(Error::NoBackend)
}

fn write_osc52(text: &str) -> io::Result<()> {
	let sequence = osc52_sequence(text, env::var_os("TMUX").is_some());
	let mut stdout = io::stdout().lock();

	stdout.write_all(sequence.as_bytes())?;
	stdout.flush()
}

/// The OSC52 "set clipboard" escape. tmux swallows raw OSC sequences, so
/// inside tmux the whole thing rides in its DCS passthrough envelope.
fn osc52_sequence(text: &str, inside_tmux: bool) -> String {
	let payload = base64::engine::general_purpose::STANDARD.encode(text);

	if inside_tmux {
		format!("\x1bPtmux;\x1b\x1b]52;c;{payload}\x07\x1b\\")
	} else {
		format!("\x1b]52;c;{payload}\x07")
	}
}

fn pipe_through(tool: &str, args: &[&str], text: &str) -> io::Result<()> {
	let mut child = Command::new(tool)
		.args(args)
		.stdin(Stdio::piped())
		.stdout(Stdio::null())
		.stderr(Stdio::null())
		.spawn()?;

	if let Some(mut stdin) = child.stdin.take() {
		stdin.write_all(text.as_bytes())?;
	}

	let status = child.wait()?;

	if !status.success() {
		return Err(io::Error::other(format!("{tool} exited with {status}.")));
	}

	Ok(())
}
