use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::ResourceKind;

/// Item type served by one of the catalog endpoints.
pub trait Resource
where
	Self: DeserializeOwned + Clone + Send + Sync + 'static,
{
	const KIND: ResourceKind;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterStatus {
	Alive,
	Dead,
	#[serde(rename = "unknown")]
	Unknown,
}
impl CharacterStatus {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Alive => "Alive",
			Self::Dead => "Dead",
			Self::Unknown => "unknown",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterGender {
	Female,
	Male,
	Genderless,
	#[serde(rename = "unknown")]
	Unknown,
}

/// Name and link of a character's origin or last known location. Both may be empty strings
/// when the API does not know the place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRef {
	pub name: String,
	pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
	pub id: u64,
	pub name: String,
	pub status: CharacterStatus,
	pub species: String,
	#[serde(rename = "type")]
	pub kind: String,
	pub gender: CharacterGender,
	pub origin: LocationRef,
	pub location: LocationRef,
	pub image: String,
	/// Episode URLs the character appears in.
	pub episode: Vec<String>,
	pub url: String,
	pub created: String,
}
impl Resource for Character {
	const KIND: ResourceKind = ResourceKind::Character;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
	pub id: u64,
	pub name: String,
	pub air_date: String,
	/// Season/episode code such as `S01E01`.
	pub episode: String,
	pub characters: Vec<String>,
	pub url: String,
	pub created: String,
}
impl Resource for Episode {
	const KIND: ResourceKind = ResourceKind::Episode;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
	pub id: u64,
	pub name: String,
	#[serde(rename = "type")]
	pub kind: String,
	pub dimension: String,
	pub residents: Vec<String>,
	pub url: String,
	pub created: String,
}
impl Resource for Location {
	const KIND: ResourceKind = ResourceKind::Location;
}
