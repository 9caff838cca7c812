use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = stash_tui::Args::parse();
	stash_tui::run(args).await
}
