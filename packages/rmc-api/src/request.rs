use std::fmt::{Display, Formatter, Result as FmtResult};

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::ConstructionError;

pub const DEFAULT_API_BASE: &str = "https://rickandmortyapi.com/api";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
	Character,
	Location,
	Episode,
}
impl ResourceKind {
	pub const ALL: [Self; 3] = [Self::Character, Self::Location, Self::Episode];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Character => "character",
			Self::Location => "location",
			Self::Episode => "episode",
		}
	}

	pub fn from_segment(segment: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|kind| kind.as_str() == segment)
	}
}
impl Display for ResourceKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Root of the catalog API, e.g. `https://rickandmortyapi.com/api`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase {
	url: Url,
}
impl ApiBase {
	pub fn parse(raw: &str) -> Result<Self, ConstructionError> {
		let trimmed = raw.trim().trim_end_matches('/');
		let invalid = |message: &str| ConstructionError::InvalidUrl {
			url: raw.to_string(),
			message: message.to_string(),
		};
		let url = Url::parse(trimmed).map_err(|err| invalid(&err.to_string()))?;

		if url.cannot_be_a_base() || url.host_str().is_none() {
			return Err(invalid("API base must be an absolute URL with a host."));
		}
		if url.query().is_some() || url.fragment().is_some() {
			return Err(invalid("API base must not carry a query or fragment."));
		}

		Ok(Self { url })
	}

	pub fn as_str(&self) -> &str {
		self.url.as_str()
	}

	/// Unpaginated list request for `kind`.
	pub fn list(&self, kind: ResourceKind) -> Request {
		Request::compose(self, kind, None, Vec::new())
	}

	pub fn item(&self, kind: ResourceKind, id: u64) -> Request {
		Request::compose(self, kind, Some(id.to_string()), Vec::new())
	}

	/// Filtered list request, e.g. `character?name=rick&status=alive`.
	pub fn search(&self, kind: ResourceKind, query: Vec<(String, String)>) -> Request {
		Request::compose(self, kind, None, query)
	}

	fn segments(&self) -> impl Iterator<Item = &str> {
		self.url.path_segments().into_iter().flatten().filter(|segment| !segment.is_empty())
	}

	fn same_origin(&self, other: &Url) -> bool {
		self.url.scheme() == other.scheme()
			&& self.url.host_str() == other.host_str()
			&& self.url.port_or_known_default() == other.port_or_known_default()
	}
}
impl Display for ApiBase {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		f.write_str(self.url.as_str())
	}
}

/// One fully determined GET against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
	kind: ResourceKind,
	identifier: Option<String>,
	query: Vec<(String, String)>,
	url: String,
}
impl Request {
	/// Builds `base/{kind}[/{identifier}][?query]`. Query pairs keep their order and empty values
	/// are still sent as `name=`.
	pub fn build(
		base: &ApiBase,
		kind: ResourceKind,
		identifier: Option<&str>,
		query: Vec<(String, String)>,
	) -> Result<Self, ConstructionError> {
		let identifier = match identifier {
			Some(raw) => {
				let trimmed = raw.trim();

				if trimmed.is_empty() || trimmed.contains('/') {
					return Err(ConstructionError::InvalidIdentifier {
						identifier: raw.to_string(),
					});
				}

				Some(trimmed.to_string())
			},
			None => None,
		};

		Ok(Self::compose(base, kind, identifier, query))
	}

	/// Parses an absolute URL handed out by the API (an item `url` field, a resident or episode
	/// link). The URL text is kept verbatim as the wire target.
	pub fn from_raw_url(base: &ApiBase, raw: &str) -> Result<Self, ConstructionError> {
		let url = Url::parse(raw.trim()).map_err(|err| ConstructionError::InvalidUrl {
			url: raw.to_string(),
			message: err.to_string(),
		})?;

		if !base.same_origin(&url) {
			return Err(ConstructionError::UnrecognizedHost { url: raw.to_string() });
		}

		let unrecognized = || ConstructionError::UnrecognizedResource { url: raw.to_string() };
		let mut segments =
			url.path_segments().ok_or_else(unrecognized)?.filter(|segment| !segment.is_empty());

		for expected in base.segments() {
			if segments.next() != Some(expected) {
				return Err(unrecognized());
			}
		}

		let kind = segments.next().and_then(ResourceKind::from_segment).ok_or_else(unrecognized)?;
		let identifier = match segments.next() {
			Some(id) if id.bytes().all(|byte| byte.is_ascii_digit()) => Some(id.to_string()),
			Some(id) =>
				return Err(ConstructionError::InvalidIdentifier { identifier: id.to_string() }),
			None => None,
		};

		if segments.next().is_some() {
			return Err(unrecognized());
		}

		let query = url
			.query_pairs()
			.map(|(name, value)| (name.into_owned(), value.into_owned()))
			.collect();

		Ok(Self { kind, identifier, query, url: raw.trim().to_string() })
	}

	/// Wraps a `next`/`prev` cursor. Cursors are opaque and sent back exactly as received.
	pub fn from_cursor(kind: ResourceKind, cursor: &str) -> Self {
		Self { kind, identifier: None, query: Vec::new(), url: cursor.to_string() }
	}

	pub fn kind(&self) -> ResourceKind {
		self.kind
	}

	pub fn identifier(&self) -> Option<&str> {
		self.identifier.as_deref()
	}

	pub fn query(&self) -> &[(String, String)] {
		&self.query
	}

	pub fn url(&self) -> &str {
		&self.url
	}

	fn compose(
		base: &ApiBase,
		kind: ResourceKind,
		identifier: Option<String>,
		query: Vec<(String, String)>,
	) -> Self {
		let mut url = base.url.clone();

		// `ApiBase::parse` rejects cannot-be-a-base URLs.
		if let Ok(mut segments) = url.path_segments_mut() {
			segments.pop_if_empty().push(kind.as_str());

			if let Some(identifier) = identifier.as_deref() {
				segments.push(identifier);
			}
		}
		if !query.is_empty() {
			let mut pairs = url.query_pairs_mut();

			for (name, value) in &query {
				pairs.append_pair(name, value);
			}
		}

		Self { kind, identifier, query, url: url.into() }
	}
}
impl Display for Request {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		f.write_str(&self.url)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn base() -> ApiBase {
		ApiBase::parse(DEFAULT_API_BASE).expect("Failed to parse API base.")
	}

	#[test]
	fn builds_item_path() {
		let request = Request::build(&base(), ResourceKind::Character, Some("1"), Vec::new())
			.expect("Failed to build request.");

		assert_eq!(request.url(), "https://rickandmortyapi.com/api/character/1");
		assert_eq!(request.identifier(), Some("1"));
	}

	#[test]
	fn builds_filtered_list_path() {
		let request = Request::build(
			&base(),
			ResourceKind::Character,
			None,
			vec![("name".to_string(), "rick".to_string())],
		)
		.expect("Failed to build request.");

		assert_eq!(request.url(), "https://rickandmortyapi.com/api/character?name=rick");
	}

	#[test]
	fn keeps_query_order_and_empty_values() {
		let request = Request::build(
			&base(),
			ResourceKind::Character,
			None,
			vec![
				("name".to_string(), String::new()),
				("status".to_string(), "alive".to_string()),
				("gender".to_string(), "female".to_string()),
			],
		)
		.expect("Failed to build request.");

		assert_eq!(
			request.url(),
			"https://rickandmortyapi.com/api/character?name=&status=alive&gender=female"
		);
	}

	#[test]
	fn encodes_query_values() {
		let request = Request::build(
			&base(),
			ResourceKind::Location,
			None,
			vec![("name".to_string(), "earth & c-137".to_string())],
		)
		.expect("Failed to build request.");

		assert_eq!(request.url(), "https://rickandmortyapi.com/api/location?name=earth+%26+c-137");
	}

	#[test]
	fn list_has_no_trailing_question_mark() {
		let request = base().list(ResourceKind::Episode);

		assert_eq!(request.url(), "https://rickandmortyapi.com/api/episode");
	}

	#[test]
	fn search_shorthand_matches_build() {
		let query = vec![("name".to_string(), "morty".to_string())];
		let built = Request::build(&base(), ResourceKind::Character, None, query.clone())
			.expect("Failed to build request.");

		assert_eq!(base().search(ResourceKind::Character, query), built);
	}

	#[test]
	fn base_with_trailing_slash_is_normalized() {
		let base = ApiBase::parse("https://rickandmortyapi.com/api/").expect("Failed to parse.");

		let request = base.item(ResourceKind::Location, 3);

		assert_eq!(request.url(), "https://rickandmortyapi.com/api/location/3");
	}

	#[test]
	fn rejects_blank_identifier() {
		let err = Request::build(&base(), ResourceKind::Episode, Some("  "), Vec::new())
			.expect_err("Expected identifier error.");

		assert!(matches!(err, ConstructionError::InvalidIdentifier { .. }));
	}

	#[test]
	fn parses_item_url() {
		let raw = "https://rickandmortyapi.com/api/episode/28";
		let request = Request::from_raw_url(&base(), raw).expect("Failed to parse URL.");

		assert_eq!(request.kind(), ResourceKind::Episode);
		assert_eq!(request.identifier(), Some("28"));
		assert_eq!(request.url(), raw);
	}

	#[test]
	fn parses_query_from_raw_url() {
		let raw = "https://rickandmortyapi.com/api/character?page=2&name=rick";
		let request = Request::from_raw_url(&base(), raw).expect("Failed to parse URL.");

		assert_eq!(request.kind(), ResourceKind::Character);
		assert_eq!(request.identifier(), None);
		assert_eq!(
			request.query(),
			&[("page".to_string(), "2".to_string()), ("name".to_string(), "rick".to_string())]
		);
		assert_eq!(request.url(), raw);
	}

	#[test]
	fn rejects_foreign_host() {
		let err = Request::from_raw_url(&base(), "https://example.com/api/character/1")
			.expect_err("Expected host error.");

		assert!(matches!(err, ConstructionError::UnrecognizedHost { .. }));
	}

	#[test]
	fn rejects_unknown_resource() {
		let err = Request::from_raw_url(&base(), "https://rickandmortyapi.com/api/planet/1")
			.expect_err("Expected resource error.");

		assert!(matches!(err, ConstructionError::UnrecognizedResource { .. }));
	}

	#[test]
	fn rejects_missing_base_path() {
		let err = Request::from_raw_url(&base(), "https://rickandmortyapi.com/character/1")
			.expect_err("Expected resource error.");

		assert!(matches!(err, ConstructionError::UnrecognizedResource { .. }));
	}

	#[test]
	fn rejects_non_numeric_identifier() {
		let err = Request::from_raw_url(&base(), "https://rickandmortyapi.com/api/character/rick")
			.expect_err("Expected identifier error.");

		assert!(matches!(err, ConstructionError::InvalidIdentifier { .. }));
	}

	#[test]
	fn rejects_relative_url() {
		let err =
			Request::from_raw_url(&base(), "/api/character/1").expect_err("Expected URL error.");

		assert!(matches!(err, ConstructionError::InvalidUrl { .. }));
	}

	#[test]
	fn cursor_is_kept_verbatim() {
		let cursor = "https://rickandmortyapi.com/api/character?page=2&name=rick%20";
		let request = Request::from_cursor(ResourceKind::Character, cursor);

		assert_eq!(request.url(), cursor);
		assert!(request.query().is_empty());
	}
}
