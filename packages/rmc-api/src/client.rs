use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use reqwest::{Client, header::ACCEPT};
use serde::de::DeserializeOwned;

use crate::{FetchError, Request};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Sends one request and yields the raw response body.
pub trait Transport
where
	Self: Send + Sync,
{
	fn get<'a>(&'a self, request: &'a Request) -> BoxFuture<'a, Result<String, FetchError>>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
	client: Client,
}
impl HttpTransport {
	pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
		let client = Client::builder().timeout(timeout).user_agent(user_agent).build()?;

		Ok(Self { client })
	}

	async fn fetch(&self, request: &Request) -> Result<String, FetchError> {
		let res = self.client.get(request.url()).header(ACCEPT, "application/json").send().await?;
		let status = res.status();

		if !status.is_success() {
			return Err(FetchError::InvalidResponse {
				status: Some(status.as_u16()),
				message: format!("Unexpected status {status} from {}.", request.url()),
			});
		}

		let body = res.text().await?;

		if body.trim().is_empty() {
			return Err(FetchError::InvalidResponse {
				status: Some(status.as_u16()),
				message: format!("Empty response body from {}.", request.url()),
			});
		}

		Ok(body)
	}
}
impl Transport for HttpTransport {
	fn get<'a>(&'a self, request: &'a Request) -> BoxFuture<'a, Result<String, FetchError>> {
		Box::pin(self.fetch(request))
	}
}

/// Stateless entry point for every catalog call. Clones share the same transport.
#[derive(Clone)]
pub struct ApiClient {
	transport: Arc<dyn Transport>,
}
impl ApiClient {
	pub fn new(transport: Arc<dyn Transport>) -> Self {
		Self { transport }
	}

	/// Performs exactly one call and decodes the body into `T`. Never retries.
	pub async fn execute<T>(&self, request: &Request) -> Result<T, FetchError>
	where
		T: DeserializeOwned,
	{
		tracing::debug!(url = request.url(), kind = %request.kind(), "Executing catalog request.");

		let body = self.transport.get(request).await.inspect_err(|err| {
			tracing::warn!(url = request.url(), error = %err, "Catalog request failed.");
		})?;

		serde_json::from_str(&body).map_err(|err| {
			let err = FetchError::from(err);

			tracing::warn!(url = request.url(), error = %err, "Catalog response did not decode.");

			err
		})
	}
}
