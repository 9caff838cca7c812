pub mod ui;

use std::{
	env,
	path::PathBuf,
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
	thread,
	time::Duration,
};

use clap::Parser;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use stash_client::GatewayClient;
use stash_palette::{
	ActivationOutcome, Key, KeyOutcome, Palette, SearchResult, SearchTicket, SystemLauncher,
	activate::{self, Launcher},
	aggregator,
};

const TOKEN_ENV: &str = "STASH_TOKEN";

#[derive(Debug, Parser)]
#[command(
	version = stash_cli::VERSION,
	rename_all = "kebab",
	styles = stash_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = stash_config::load(&args.config)?;

	init_tracing(&config)?;

	// Absent or blank credential is fine; searches silently return nothing
	// until the user signs in and relaunches.
	let token = env::var(TOKEN_ENV).ok();
	let backend = Arc::new(GatewayClient::new(
		&config.palette.gateway_base,
		token,
		config.palette.request_timeout_ms,
	)?);
	let palette = Palette::new(Duration::from_millis(config.palette.debounce_ms));
	let mut terminal = ratatui::init();
	let result = event_loop(&mut terminal, backend, palette, config.palette.group_limit).await;

	ratatui::restore();

	result
}

fn init_tracing(config: &stash_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	// The terminal is in raw mode; keep diagnostics off the screen.
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

	Ok(())
}

async fn event_loop(
	terminal: &mut ratatui::DefaultTerminal,
	backend: Arc<GatewayClient>,
	mut palette: Palette,
	group_limit: usize,
) -> color_eyre::Result<()> {
	let (input_tx, mut input_rx) = mpsc::unbounded_channel();
	let running = Arc::new(AtomicBool::new(true));
	let input_flag = Arc::clone(&running);
	let input_thread = thread::spawn(move || -> std::io::Result<()> {
		while input_flag.load(Ordering::Relaxed) {
			if event::poll(Duration::from_millis(50))?
				&& input_tx.send(event::read()?).is_err()
			{
				break;
			}
		}

		Ok(())
	});
	let (result_tx, mut result_rx) = mpsc::unbounded_channel::<(u64, Vec<SearchResult>)>();
	let launcher = SystemLauncher;
	let mut quit = false;

	while !quit {
		terminal.draw(|frame| ui::draw(frame, &palette))?;

		let deadline = palette.debounce_deadline();

		tokio::select! {
			maybe_event = input_rx.recv() => {
				match maybe_event {
					Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
						quit = on_key(&mut palette, &backend, &launcher, key).await;
					},
					Some(_) => {},
					None => break,
				}
			},
			maybe_commit = result_rx.recv() => {
				if let Some((seq, results)) = maybe_commit {
					palette.commit(seq, results);
				}
			},
			_ = tokio::time::sleep_until(deadline.unwrap_or_else(tokio::time::Instant::now)),
				if deadline.is_some() =>
			{
				if let Some(ticket) = palette.take_due(tokio::time::Instant::now()) {
					spawn_search(&backend, &result_tx, ticket, group_limit);
				}
			},
		}
	}

	running.store(false, Ordering::Relaxed);

	match input_thread.join() {
		Ok(join_result) => join_result?,
		Err(err) => std::panic::resume_unwind(err),
	}

	Ok(())
}

fn spawn_search(
	backend: &Arc<GatewayClient>,
	result_tx: &mpsc::UnboundedSender<(u64, Vec<SearchResult>)>,
	ticket: SearchTicket,
	group_limit: usize,
) {
	let backend = Arc::clone(backend);
	let result_tx = result_tx.clone();

	tokio::spawn(async move {
		let results = aggregator::run_search(backend.as_ref(), &ticket.query, group_limit).await;
		let _ = result_tx.send((ticket.seq, results));
	});
}

/// Translate one terminal keystroke and apply it. Returns `true` when the
/// user asked to quit the program.
async fn on_key(
	palette: &mut Palette,
	backend: &Arc<GatewayClient>,
	launcher: &dyn Launcher,
	key: KeyEvent,
) -> bool {
	if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
		return true;
	}
	if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('k') {
		palette.dismiss_notice();
		palette.handle_key(Key::Toggle);

		return false;
	}
	if !palette.is_open() {
		// A notice outlives the palette that raised it; any key clears it.
		palette.dismiss_notice();

		return matches!(key.code, KeyCode::Char('q') | KeyCode::Esc);
	}

	match key.code {
		KeyCode::Up => {
			palette.handle_key(Key::Up);
		},
		KeyCode::Down => {
			palette.handle_key(Key::Down);
		},
		KeyCode::Esc => {
			palette.handle_key(Key::Esc);
		},
		KeyCode::Enter => {
			if let KeyOutcome::Activate(result) = palette.handle_key(Key::Enter) {
				let outcome = activate::activate(backend.as_ref(), launcher, &result).await;

				palette.close();

				if let ActivationOutcome::Notice(message) = outcome {
					palette.set_notice(message);
				}
			}
		},
		KeyCode::Backspace => {
			let mut query = palette.query().to_string();

			query.pop();
			palette.set_query(&query);
		},
		KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
			let mut query = palette.query().to_string();

			query.push(c);
			palette.set_query(&query);
		},
		_ => {},
	}

	false
}
