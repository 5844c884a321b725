pub mod client;
pub mod envelope;
pub mod models;
pub mod request;

mod error;

pub use client::{ApiClient, BoxFuture, HttpTransport, Transport};
pub use envelope::{CharacterEnvelope, Envelope, EpisodeEnvelope, LocationEnvelope, PageInfo};
pub use error::{ConstructionError, Error, FetchError, Result};
pub use models::{
	Character, CharacterGender, CharacterStatus, Episode, Location, LocationRef, Resource,
};
pub use request::{ApiBase, DEFAULT_API_BASE, Request, ResourceKind};
