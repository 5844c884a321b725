pub mod detail;
pub mod paginator;
pub mod search;

mod error;

pub use detail::{EpisodeDetail, LocationDetail, fetch_all};
pub use error::{Error, Result};
pub use paginator::{FetchOutcome, PageEvent, Paginator};
pub use search::{
	CharacterSummary, EpisodeSummary, LocationSummary, SearchOption, SearchOutcome, SearchQuery,
	SearchResults, SearchSession,
};

use std::{sync::Arc, time::Duration};

use rmc_api::{
	ApiBase, ApiClient, Character, Episode, HttpTransport, Location, Request, Resource,
	ResourceKind, Transport,
};
use rmc_config::Config;

/// Entry point handed to the presentation layer. Holds no per-session state; every paginator
/// and search session it creates is owned by the caller.
pub struct CatalogService {
	pub cfg: Config,
	pub client: ApiClient,
	pub base: ApiBase,
}
impl CatalogService {
	pub fn new(cfg: Config) -> Result<Self> {
		let transport =
			HttpTransport::new(Duration::from_millis(cfg.api.timeout_ms), cfg.api.user_agent())?;

		Self::with_transport(cfg, Arc::new(transport))
	}

	pub fn with_transport(cfg: Config, transport: Arc<dyn Transport>) -> Result<Self> {
		let base = ApiBase::parse(&cfg.api.base_url)?;

		Ok(Self { cfg, client: ApiClient::new(transport), base })
	}

	/// Unloaded paginator; call [`Paginator::load`] with [`Self::list_request`] to start it.
	pub fn paginator<T>(&self) -> Paginator<T>
	where
		T: Resource,
	{
		Paginator::new(self.client.clone())
	}

	pub fn characters(&self) -> Paginator<Character> {
		self.paginator()
	}

	pub fn episodes(&self) -> Paginator<Episode> {
		self.paginator()
	}

	pub fn locations(&self) -> Paginator<Location> {
		self.paginator()
	}

	pub fn list_request(&self, kind: ResourceKind) -> Request {
		self.base.list(kind)
	}

	pub fn item_request(&self, kind: ResourceKind, id: u64) -> Request {
		self.base.item(kind, id)
	}

	/// Parses a link found in a response, e.g. an episode URL on a character.
	pub fn link_request(&self, url: &str) -> Result<Request> {
		Ok(Request::from_raw_url(&self.base, url)?)
	}

	pub fn search(&self, kind: ResourceKind) -> SearchSession {
		SearchSession::new(self.client.clone(), self.base.clone(), kind)
	}

	/// Search session for the configured default kind. The kind is read once; later config
	/// changes do not affect the returned session.
	pub fn default_search(&self) -> Result<SearchSession> {
		let kind = ResourceKind::from_segment(&self.cfg.search.default_kind).ok_or_else(|| {
			Error::InvalidRequest {
				message: format!("Unknown resource kind {:?}.", self.cfg.search.default_kind),
			}
		})?;

		Ok(self.search(kind))
	}

	pub async fn fetch<T>(&self, id: u64) -> Result<T>
	where
		T: Resource,
	{
		Ok(self.client.execute(&self.item_request(T::KIND, id)).await?)
	}

	pub async fn episode_detail(&self, request: &Request) -> Result<EpisodeDetail> {
		detail::load_episode_detail(&self.client, &self.base, request).await
	}

	pub async fn location_detail(&self, request: &Request) -> Result<LocationDetail> {
		detail::load_location_detail(&self.client, &self.base, request).await
	}

	pub async fn character_episodes(&self, character: &Character) -> Vec<Episode> {
		detail::load_character_episodes(&self.client, &self.base, character).await
	}
}
