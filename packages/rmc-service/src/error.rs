pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error(transparent)]
	Construction(#[from] rmc_api::ConstructionError),
	#[error(transparent)]
	Fetch(#[from] rmc_api::FetchError),
}
