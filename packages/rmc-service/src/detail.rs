use futures::future;
use serde::Serialize;

use rmc_api::{ApiBase, ApiClient, Character, Episode, Location, Request, Resource};

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpisodeDetail {
	pub episode: Episode,
	pub characters: Vec<Character>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationDetail {
	pub location: Location,
	pub residents: Vec<Character>,
}

/// Fetches every linked item concurrently and returns once all of them have settled.
///
/// Links that do not parse or point at another resource kind are skipped. Failed fetches are
/// logged and dropped, so the result holds only the successes, in link order.
pub async fn fetch_all<T>(client: &ApiClient, base: &ApiBase, urls: &[String]) -> Vec<T>
where
	T: Resource,
{
	let requests: Vec<Request> = urls
		.iter()
		.filter_map(|url| match Request::from_raw_url(base, url) {
			Ok(request) if request.kind() == T::KIND => Some(request),
			Ok(request) => {
				tracing::warn!(
					url = %url,
					kind = %request.kind(),
					expected = %T::KIND,
					"Skipping link to another resource kind."
				);

				None
			},
			Err(err) => {
				tracing::warn!(url = %url, error = %err, "Skipping unparseable link.");

				None
			},
		})
		.collect();
	let settled =
		future::join_all(requests.iter().map(|request| client.execute::<T>(request))).await;
	let total = settled.len();
	let items: Vec<T> = settled
		.into_iter()
		.zip(&requests)
		.filter_map(|(result, request)| match result {
			Ok(item) => Some(item),
			Err(err) => {
				tracing::warn!(url = request.url(), error = %err, "Related item fetch failed.");

				None
			},
		})
		.collect();

	tracing::debug!(
		kind = %T::KIND,
		requested = total,
		fetched = items.len(),
		"Fan-out fetch settled."
	);

	items
}

pub async fn load_episode_detail(
	client: &ApiClient,
	base: &ApiBase,
	request: &Request,
) -> Result<EpisodeDetail> {
	let episode: Episode = fetch_primary(client, request).await?;
	let characters = fetch_all(client, base, &episode.characters).await;

	Ok(EpisodeDetail { episode, characters })
}

pub async fn load_location_detail(
	client: &ApiClient,
	base: &ApiBase,
	request: &Request,
) -> Result<LocationDetail> {
	let location: Location = fetch_primary(client, request).await?;
	let residents = fetch_all(client, base, &location.residents).await;

	Ok(LocationDetail { location, residents })
}

/// Episodes a character appears in.
pub async fn load_character_episodes(
	client: &ApiClient,
	base: &ApiBase,
	character: &Character,
) -> Vec<Episode> {
	fetch_all(client, base, &character.episode).await
}

async fn fetch_primary<T>(client: &ApiClient, request: &Request) -> Result<T>
where
	T: Resource,
{
	if request.kind() != T::KIND || request.identifier().is_none() {
		return Err(Error::InvalidRequest {
			message: format!("{} does not address a single {}.", request.url(), T::KIND),
		});
	}

	Ok(client.execute(request).await?)
}
