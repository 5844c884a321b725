use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = rmc_browse::Args::parse();

	rmc_browse::run(args).await
}
