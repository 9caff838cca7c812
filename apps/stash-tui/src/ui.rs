use ratatui::{
	Frame,
	layout::{Alignment, Constraint, Direction, Layout},
	style::{Modifier, Style, Stylize},
	text::Line,
	widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use stash_palette::Palette;

const FOOTER_HINTS: &str = "↑↓ Navigate  ↵ Copy / Open  Esc Close";
const IDLE_HINTS: &str = "Ctrl+K Search your stash  q Quit";

pub fn draw(frame: &mut Frame, palette: &Palette) {
	if !palette.is_open() {
		draw_idle(frame, palette);

		return;
	}

	let layout = Layout::default()
		.direction(Direction::Vertical)
		.constraints([Constraint::Length(3), Constraint::Min(1), Constraint::Length(1)])
		.split(frame.area());
	let input = Paragraph::new(palette.query())
		.block(Block::default().borders(Borders::ALL).title("Search"));

	frame.render_widget(input, layout[0]);
	draw_results(frame, palette, layout[1]);

	let footer = Paragraph::new(FOOTER_HINTS).alignment(Alignment::Center).dim();

	frame.render_widget(footer, layout[2]);
}

fn draw_idle(frame: &mut Frame, palette: &Palette) {
	let mut lines = vec![Line::from(IDLE_HINTS)];

	if let Some(notice) = palette.notice() {
		lines.push(Line::from(""));
		lines.push(Line::from(notice.to_string()).red());
	}

	let hint = Paragraph::new(lines).alignment(Alignment::Center);

	frame.render_widget(hint, frame.area());
}

fn draw_results(frame: &mut Frame, palette: &Palette, area: ratatui::layout::Rect) {
	let block = Block::default().borders(Borders::ALL);

	if palette.results().is_empty() {
		// Loading and no-results look different so a slow search is not
		// mistaken for an empty stash.
		let message = if palette.searching() {
			"Searching..."
		} else if palette.query().trim().is_empty() {
			"Type to search links, snippets, and resumes."
		} else {
			"No results"
		};
		let empty = Paragraph::new(message).block(block).alignment(Alignment::Center).dim();

		frame.render_widget(empty, area);

		return;
	}

	let items: Vec<ListItem> = palette
		.results()
		.iter()
		.map(|result| {
			let line = if result.subtitle.is_empty() {
				format!("[{}] {}", result.kind.label(), result.title)
			} else {
				format!("[{}] {}  {}", result.kind.label(), result.title, result.subtitle)
			};

			ListItem::new(line)
		})
		.collect();
	let list = List::new(items)
		.block(block)
		.highlight_style(Style::default().add_modifier(Modifier::REVERSED))
		.highlight_symbol("> ");
	let mut state = ListState::default().with_selected(Some(palette.selection()));

	frame.render_stateful_widget(list, area, &mut state);
}
