use serde::Serialize;

use rmc_api::{
	ApiBase, ApiClient, Character, CharacterStatus, Envelope, Episode, Location, Request, Resource,
	ResourceKind,
};

use crate::{Error, FetchOutcome, Paginator, Result};

/// Filters offered next to the free-text name query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchOption {
	Status,
	Gender,
	LocationType,
}
impl SearchOption {
	pub fn query_argument(self) -> &'static str {
		match self {
			Self::Status => "status",
			Self::Gender => "gender",
			Self::LocationType => "type",
		}
	}

	/// Values the catalog understands for this filter.
	pub fn choices(self) -> &'static [&'static str] {
		match self {
			Self::Status => &["alive", "dead", "unknown"],
			Self::Gender => &["male", "female", "genderless", "unknown"],
			Self::LocationType => &["cluster", "planet", "microverse"],
		}
	}

	pub fn for_kind(kind: ResourceKind) -> &'static [SearchOption] {
		match kind {
			ResourceKind::Character => &[Self::Status, Self::Gender],
			ResourceKind::Location => &[Self::LocationType],
			ResourceKind::Episode => &[],
		}
	}

	pub fn applies_to(self, kind: ResourceKind) -> bool {
		Self::for_kind(kind).contains(&self)
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
	text: String,
	options: Vec<(SearchOption, String)>,
}
impl SearchQuery {
	pub fn new(text: impl Into<String>) -> Self {
		Self { text: text.into(), options: Vec::new() }
	}

	pub fn with_option(mut self, option: SearchOption, value: impl Into<String>) -> Self {
		self.set_option(option, value);

		self
	}

	pub fn set_text(&mut self, text: impl Into<String>) {
		self.text = text.into();
	}

	/// Sets a filter value, replacing an earlier value for the same filter in place.
	pub fn set_option(&mut self, option: SearchOption, value: impl Into<String>) {
		let value = value.into();

		match self.options.iter_mut().find(|(existing, _)| *existing == option) {
			Some(slot) => slot.1 = value,
			None => self.options.push((option, value)),
		}
	}

	pub fn text(&self) -> &str {
		&self.text
	}

	pub fn options(&self) -> &[(SearchOption, String)] {
		&self.options
	}

	/// No text and no filter: nothing worth asking the server. Whitespace counts as text.
	pub fn is_blank(&self) -> bool {
		self.text.is_empty() && self.options.is_empty()
	}

	fn query_pairs(&self) -> Vec<(String, String)> {
		let mut pairs = Vec::with_capacity(self.options.len() + 1);

		pairs.push(("name".to_string(), self.text.clone()));
		pairs.extend(
			self.options
				.iter()
				.map(|(option, value)| (option.query_argument().to_string(), value.clone())),
		);

		pairs
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterSummary {
	pub id: u64,
	pub name: String,
	pub status: CharacterStatus,
	pub image: String,
	pub url: String,
}
impl From<&Character> for CharacterSummary {
	fn from(character: &Character) -> Self {
		Self {
			id: character.id,
			name: character.name.clone(),
			status: character.status,
			image: character.image.clone(),
			url: character.url.clone(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpisodeSummary {
	pub id: u64,
	pub name: String,
	pub episode: String,
	pub air_date: String,
	pub url: String,
}
impl From<&Episode> for EpisodeSummary {
	fn from(episode: &Episode) -> Self {
		Self {
			id: episode.id,
			name: episode.name.clone(),
			episode: episode.episode.clone(),
			air_date: episode.air_date.clone(),
			url: episode.url.clone(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationSummary {
	pub id: u64,
	pub name: String,
	#[serde(rename = "type")]
	pub kind: String,
	pub dimension: String,
	pub url: String,
}
impl From<&Location> for LocationSummary {
	fn from(location: &Location) -> Self {
		Self {
			id: location.id,
			name: location.name.clone(),
			kind: location.kind.clone(),
			dimension: location.dimension.clone(),
			url: location.url.clone(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "lowercase")]
pub enum SearchResults {
	Characters(Vec<CharacterSummary>),
	Episodes(Vec<EpisodeSummary>),
	Locations(Vec<LocationSummary>),
}
impl SearchResults {
	pub fn kind(&self) -> ResourceKind {
		match self {
			Self::Characters(_) => ResourceKind::Character,
			Self::Episodes(_) => ResourceKind::Episode,
			Self::Locations(_) => ResourceKind::Location,
		}
	}

	pub fn len(&self) -> usize {
		match self {
			Self::Characters(items) => items.len(),
			Self::Episodes(items) => items.len(),
			Self::Locations(items) => items.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
	Results(SearchResults),
	/// Nothing to show. Covers blank queries and failed requests alike.
	NoResults,
}

enum SearchPages {
	Characters(Paginator<Character>),
	Episodes(Paginator<Episode>),
	Locations(Paginator<Location>),
}
impl SearchPages {
	fn results(&self) -> SearchResults {
		match self {
			Self::Characters(pages) => SearchResults::Characters(summarize(&pages.items())),
			Self::Episodes(pages) => SearchResults::Episodes(summarize(&pages.items())),
			Self::Locations(pages) => SearchResults::Locations(summarize(&pages.items())),
		}
	}

	async fn fetch_more(&self) -> FetchOutcome {
		match self {
			Self::Characters(pages) => pages.fetch_more().await,
			Self::Episodes(pages) => pages.fetch_more().await,
			Self::Locations(pages) => pages.fetch_more().await,
		}
	}

	fn should_show_load_more_indicator(&self) -> bool {
		match self {
			Self::Characters(pages) => pages.should_show_load_more_indicator(),
			Self::Episodes(pages) => pages.should_show_load_more_indicator(),
			Self::Locations(pages) => pages.should_show_load_more_indicator(),
		}
	}

	fn is_fetching_more(&self) -> bool {
		match self {
			Self::Characters(pages) => pages.is_fetching_more(),
			Self::Episodes(pages) => pages.is_fetching_more(),
			Self::Locations(pages) => pages.is_fetching_more(),
		}
	}
}

/// A search bound to one resource kind for its whole lifetime.
pub struct SearchSession {
	client: ApiClient,
	base: ApiBase,
	kind: ResourceKind,
	pages: Option<SearchPages>,
}
impl SearchSession {
	pub fn new(client: ApiClient, base: ApiBase, kind: ResourceKind) -> Self {
		Self { client, base, kind, pages: None }
	}

	pub fn kind(&self) -> ResourceKind {
		self.kind
	}

	/// Runs a fresh search, discarding the pages of any earlier one.
	pub async fn search(&mut self, query: &SearchQuery) -> Result<SearchOutcome> {
		let inapplicable = query.options().iter().find(|(option, _)| !option.applies_to(self.kind));

		if let Some((option, _)) = inapplicable {
			return Err(Error::InvalidRequest {
				message: format!(
					"Filter {} does not apply to {} searches.",
					option.query_argument(),
					self.kind
				),
			});
		}

		self.pages = None;

		if query.is_blank() {
			return Ok(SearchOutcome::NoResults);
		}

		let request = self.base.search(self.kind, query.query_pairs());
		let pages = match self.kind {
			ResourceKind::Character =>
				self.first_page::<Character>(&request).await.map(SearchPages::Characters),
			ResourceKind::Episode =>
				self.first_page::<Episode>(&request).await.map(SearchPages::Episodes),
			ResourceKind::Location =>
				self.first_page::<Location>(&request).await.map(SearchPages::Locations),
		};
		let Some(pages) = pages else {
			return Ok(SearchOutcome::NoResults);
		};
		let results = pages.results();

		self.pages = Some(pages);

		Ok(SearchOutcome::Results(results))
	}

	/// Loads the next page through the same envelope type as the first one. A failed page keeps
	/// the accumulated results; read them back with [`Self::results`].
	pub async fn fetch_more(&self) -> FetchOutcome {
		match &self.pages {
			Some(pages) => pages.fetch_more().await,
			None => FetchOutcome::Skipped,
		}
	}

	pub fn results(&self) -> Option<SearchResults> {
		self.pages.as_ref().map(SearchPages::results)
	}

	pub fn should_show_load_more_indicator(&self) -> bool {
		self.pages.as_ref().map(SearchPages::should_show_load_more_indicator).unwrap_or(false)
	}

	pub fn is_fetching_more(&self) -> bool {
		self.pages.as_ref().map(SearchPages::is_fetching_more).unwrap_or(false)
	}

	async fn first_page<T>(&self, request: &Request) -> Option<Paginator<T>>
	where
		T: Resource,
	{
		match self.client.execute::<Envelope<T>>(request).await {
			Ok(envelope) => Some(Paginator::seeded(self.client.clone(), envelope)),
			Err(err) => {
				tracing::warn!(url = request.url(), error = %err, "Search request failed.");

				None
			},
		}
	}
}

fn summarize<'a, T, S>(items: &'a [T]) -> Vec<S>
where
	S: From<&'a T>,
{
	items.iter().map(S::from).collect()
}
