use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{Character, Episode, FetchError, Location};

pub type CharacterEnvelope = Envelope<Character>;
pub type EpisodeEnvelope = Envelope<Episode>;
pub type LocationEnvelope = Envelope<Location>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
	pub count: u64,
	pub pages: u64,
	/// Absolute URL of the next page. Opaque; pass it back unchanged.
	pub next: Option<String>,
	pub prev: Option<String>,
}

/// `{info, results}` wrapper returned by every list and search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
	pub info: PageInfo,
	pub results: Vec<T>,
}
impl<T> Envelope<T> {
	pub fn next(&self) -> Option<&str> {
		self.info.next.as_deref()
	}

	pub fn has_next(&self) -> bool {
		self.info.next.is_some()
	}
}
impl<T> Envelope<T>
where
	T: DeserializeOwned,
{
	pub fn decode(body: &str) -> Result<Self, FetchError> {
		Ok(serde_json::from_str(body)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn character(id: u64) -> serde_json::Value {
		serde_json::json!({
			"id": id,
			"name": format!("Character {id}"),
			"status": "Alive",
			"species": "Human",
			"type": "",
			"gender": "Male",
			"origin": { "name": "Earth (C-137)", "url": "https://rickandmortyapi.com/api/location/1" },
			"location": { "name": "Citadel of Ricks", "url": "https://rickandmortyapi.com/api/location/3" },
			"image": format!("https://rickandmortyapi.com/api/character/avatar/{id}.jpeg"),
			"episode": ["https://rickandmortyapi.com/api/episode/1"],
			"url": format!("https://rickandmortyapi.com/api/character/{id}"),
			"created": "2017-11-04T18:48:46.250Z"
		})
	}

	#[test]
	fn decodes_final_character_page() {
		let body = serde_json::json!({
			"info": { "count": 2, "pages": 1, "next": null, "prev": null },
			"results": [character(1), character(2)]
		})
		.to_string();
		let envelope = CharacterEnvelope::decode(&body).expect("Failed to decode envelope.");

		assert_eq!(envelope.results.len(), 2);
		assert_eq!(envelope.next(), None);
		assert!(!envelope.has_next());
	}

	#[test]
	fn keeps_next_cursor_and_ignores_unknown_fields() {
		let body = serde_json::json!({
			"info": {
				"count": 826,
				"pages": 42,
				"next": "https://rickandmortyapi.com/api/character?page=2",
				"build": "ignored"
			},
			"results": [character(1)],
			"debug": {}
		})
		.to_string();
		let envelope = CharacterEnvelope::decode(&body).expect("Failed to decode envelope.");

		assert_eq!(envelope.next(), Some("https://rickandmortyapi.com/api/character?page=2"));
		assert_eq!(envelope.info.prev, None);
		assert_eq!(envelope.info.count, 826);
	}

	#[test]
	fn missing_results_fails_decoding() {
		let body = r#"{"info":{"count":0,"pages":0,"next":null,"prev":null}}"#;
		let err = CharacterEnvelope::decode(body).expect_err("Expected decoding failure.");

		assert!(matches!(err, FetchError::DecodingFailed { .. }));
	}

	#[test]
	fn missing_page_count_fails_decoding() {
		let body = r#"{"info":{"count":0,"next":null,"prev":null},"results":[]}"#;
		let err = EpisodeEnvelope::decode(body).expect_err("Expected decoding failure.");

		assert!(matches!(err, FetchError::DecodingFailed { .. }));
	}

	#[test]
	fn empty_page_is_valid() {
		let body = r#"{"info":{"count":0,"pages":0,"next":null,"prev":null},"results":[]}"#;
		let envelope = LocationEnvelope::decode(body).expect("Failed to decode envelope.");

		assert!(envelope.results.is_empty());
	}
}
