use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, builder::PossibleValuesParser};
use color_eyre::eyre;
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use rmc_api::{Character, Episode, Location, Resource, ResourceKind};
use rmc_service::{
	CatalogService, FetchOutcome, PageEvent, SearchOption, SearchOutcome, SearchQuery,
	SearchResults,
};

#[derive(Debug, Parser)]
#[command(
	version = rmc_cli::VERSION,
	rename_all = "kebab",
	styles = rmc_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Walk the unfiltered list of a resource kind.
	List {
		kind: KindArg,
		/// Pages to load; defaults to `search.max_pages`.
		#[arg(long, value_name = "N")]
		pages: Option<u32>,
	},
	/// Search by name and filters.
	Search(SearchArgs),
	/// One item with its related items.
	Show { kind: KindArg, id: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
	Character,
	Location,
	Episode,
}
impl From<KindArg> for ResourceKind {
	fn from(kind: KindArg) -> Self {
		match kind {
			KindArg::Character => Self::Character,
			KindArg::Location => Self::Location,
			KindArg::Episode => Self::Episode,
		}
	}
}

#[derive(Debug, clap::Args)]
pub struct SearchArgs {
	/// Falls back to `search.default_kind`.
	pub kind: Option<KindArg>,
	#[arg(long, default_value = "")]
	pub name: String,
	#[arg(long, value_parser = choices(SearchOption::Status))]
	pub status: Option<String>,
	#[arg(long, value_parser = choices(SearchOption::Gender))]
	pub gender: Option<String>,
	#[arg(long = "type", value_parser = choices(SearchOption::LocationType))]
	pub location_type: Option<String>,
	#[arg(long, value_name = "N")]
	pub pages: Option<u32>,
}
impl SearchArgs {
	pub fn query(&self) -> SearchQuery {
		let mut query = SearchQuery::new(self.name.as_str());
		let filters = [
			(SearchOption::Status, &self.status),
			(SearchOption::Gender, &self.gender),
			(SearchOption::LocationType, &self.location_type),
		];

		for (option, value) in filters {
			if let Some(value) = value {
				query.set_option(option, value.as_str());
			}
		}

		query
	}
}

#[derive(Debug, Serialize)]
struct SearchReport {
	kind: ResourceKind,
	pages: u32,
	results: Option<SearchResults>,
}

#[derive(Debug, Serialize)]
struct CharacterDetail {
	character: Character,
	episodes: Vec<Episode>,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = rmc_config::load(&args.config)?;

	init_tracing(&config)?;

	let svc = CatalogService::new(config)?;
	let output = execute(&svc, args.command).await?;

	println!("{}", serde_json::to_string_pretty(&output)?);

	Ok(())
}

/// Runs one command against the catalog and returns what would be printed.
pub async fn execute(svc: &CatalogService, command: Command) -> color_eyre::Result<Value> {
	let max_pages = svc.cfg.search.max_pages;

	match command {
		Command::List { kind, pages } => {
			let pages = pages.unwrap_or(max_pages);

			match ResourceKind::from(kind) {
				ResourceKind::Character => list::<Character>(svc, pages).await,
				ResourceKind::Location => list::<Location>(svc, pages).await,
				ResourceKind::Episode => list::<Episode>(svc, pages).await,
			}
		},
		Command::Search(args) => search(svc, &args, args.pages.unwrap_or(max_pages)).await,
		Command::Show { kind, id } => show(svc, kind.into(), id).await,
	}
}

fn choices(option: SearchOption) -> PossibleValuesParser {
	PossibleValuesParser::new(option.choices().iter().copied())
}

fn init_tracing(config: &rmc_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

	Ok(())
}

async fn list<T>(svc: &CatalogService, max_pages: u32) -> color_eyre::Result<Value>
where
	T: Resource + Serialize,
{
	let pages = svc.paginator::<T>();

	pages.on_update(|event| match event {
		PageEvent::Loaded { items, has_more } =>
			tracing::info!(kind = %T::KIND, loaded = items.len(), has_more, "Page loaded."),
		PageEvent::Failed { error } =>
			tracing::warn!(kind = %T::KIND, error = %error, "Page fetch failed."),
	});

	if pages.load(&svc.list_request(T::KIND)).await == FetchOutcome::Failed {
		return Err(eyre::eyre!("Failed to load the first {} page.", T::KIND));
	}

	let mut loaded = 1;

	while loaded < max_pages && pages.should_show_load_more_indicator() {
		match pages.fetch_more().await {
			FetchOutcome::Fetched { .. } => loaded += 1,
			FetchOutcome::Skipped | FetchOutcome::Failed => break,
		}
	}

	Ok(serde_json::to_value(pages.items())?)
}

async fn search(
	svc: &CatalogService,
	args: &SearchArgs,
	max_pages: u32,
) -> color_eyre::Result<Value> {
	let mut session = match args.kind {
		Some(kind) => svc.search(kind.into()),
		None => svc.default_search()?,
	};
	let found = matches!(session.search(&args.query()).await?, SearchOutcome::Results(_));
	let mut loaded = u32::from(found);

	while loaded < max_pages && session.should_show_load_more_indicator() {
		match session.fetch_more().await {
			FetchOutcome::Fetched { .. } => loaded += 1,
			FetchOutcome::Skipped | FetchOutcome::Failed => break,
		}
	}

	let report = SearchReport { kind: session.kind(), pages: loaded, results: session.results() };

	Ok(serde_json::to_value(report)?)
}

async fn show(svc: &CatalogService, kind: ResourceKind, id: u64) -> color_eyre::Result<Value> {
	let request = svc.item_request(kind, id);
	let value = match kind {
		ResourceKind::Character => {
			let character: Character = svc.fetch(id).await?;
			let episodes = svc.character_episodes(&character).await;

			serde_json::to_value(CharacterDetail { character, episodes })?
		},
		ResourceKind::Episode => serde_json::to_value(svc.episode_detail(&request).await?)?,
		ResourceKind::Location => serde_json::to_value(svc.location_detail(&request).await?)?,
	};

	Ok(value)
}
