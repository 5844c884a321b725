use std::{
	collections::{HashMap, VecDeque},
	sync::{
		Arc, Mutex,
		atomic::{AtomicBool, Ordering},
	},
};

use serde_json::Value;
use tokio::task;

use rmc_api::{ApiBase, ApiClient, BoxFuture, FetchError, Request, Transport};

pub const BASE: &str = "https://rickandmortyapi.com/api";

type Reply = Result<String, FetchError>;

/// Transport double that answers by exact URL.
///
/// Each URL holds a queue of replies; the last reply sticks once the queue is drained. Every call
/// yields to the scheduler once before answering so concurrently polled futures interleave.
#[derive(Default)]
pub struct ScriptedTransport {
	routes: Mutex<HashMap<String, VecDeque<Reply>>>,
	calls: Mutex<Vec<String>>,
	closed: AtomicBool,
}
impl ScriptedTransport {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn respond(&self, url: impl Into<String>, body: impl Into<String>) -> &Self {
		self.push(url.into(), Ok(body.into()))
	}

	pub fn fail(&self, url: impl Into<String>, error: FetchError) -> &Self {
		self.push(url.into(), Err(error))
	}

	/// Makes every further call fail, regardless of scripted replies.
	pub fn close(&self) {
		self.closed.store(true, Ordering::SeqCst);
	}

	pub fn calls(&self) -> Vec<String> {
		self.calls.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub fn call_count(&self) -> usize {
		self.calls.lock().unwrap_or_else(|err| err.into_inner()).len()
	}

	pub fn calls_to(&self, url: &str) -> usize {
		let calls = self.calls.lock().unwrap_or_else(|err| err.into_inner());

		calls.iter().filter(|call| *call == url).count()
	}

	fn push(&self, url: String, reply: Reply) -> &Self {
		let mut routes = self.routes.lock().unwrap_or_else(|err| err.into_inner());

		routes.entry(url).or_default().push_back(reply);
		drop(routes);

		self
	}

	fn reply_for(&self, url: &str) -> Reply {
		self.calls.lock().unwrap_or_else(|err| err.into_inner()).push(url.to_string());

		if self.closed.load(Ordering::SeqCst) {
			return Err(FetchError::Transport { message: "Transport closed.".to_string() });
		}

		let mut routes = self.routes.lock().unwrap_or_else(|err| err.into_inner());
		let Some(queue) = routes.get_mut(url) else {
			return Err(FetchError::InvalidResponse {
				status: Some(404),
				message: format!("No scripted reply for {url}."),
			});
		};

		if queue.len() > 1
			&& let Some(reply) = queue.pop_front()
		{
			return reply;
		}

		queue.front().cloned().unwrap_or_else(|| {
			Err(FetchError::InvalidResponse {
				status: Some(404),
				message: format!("No scripted reply for {url}."),
			})
		})
	}
}
impl Transport for ScriptedTransport {
	fn get<'a>(&'a self, request: &'a Request) -> BoxFuture<'a, Result<String, FetchError>> {
		Box::pin(async move {
			task::yield_now().await;

			self.reply_for(request.url())
		})
	}
}

pub fn base() -> ApiBase {
	ApiBase::parse(BASE).expect("Failed to parse test API base.")
}

pub fn client(transport: &Arc<ScriptedTransport>) -> ApiClient {
	ApiClient::new(transport.clone())
}

pub fn url(path: &str) -> String {
	format!("{BASE}/{path}")
}

pub fn character_json(id: u64) -> Value {
	serde_json::json!({
		"id": id,
		"name": format!("Character {id}"),
		"status": "Alive",
		"species": "Human",
		"type": "",
		"gender": "Male",
		"origin": { "name": "Earth (C-137)", "url": url("location/1") },
		"location": { "name": "Citadel of Ricks", "url": url("location/3") },
		"image": url(&format!("character/avatar/{id}.jpeg")),
		"episode": [url("episode/1")],
		"url": url(&format!("character/{id}")),
		"created": "2017-11-04T18:48:46.250Z"
	})
}

pub fn episode_json(id: u64, character_ids: &[u64]) -> Value {
	let characters: Vec<String> =
		character_ids.iter().map(|cid| url(&format!("character/{cid}"))).collect();

	serde_json::json!({
		"id": id,
		"name": format!("Episode {id}"),
		"air_date": "December 2, 2013",
		"episode": format!("S01E{id:02}"),
		"characters": characters,
		"url": url(&format!("episode/{id}")),
		"created": "2017-11-10T12:56:33.798Z"
	})
}

pub fn location_json(id: u64, resident_ids: &[u64]) -> Value {
	let residents: Vec<String> =
		resident_ids.iter().map(|rid| url(&format!("character/{rid}"))).collect();

	serde_json::json!({
		"id": id,
		"name": format!("Location {id}"),
		"type": "Planet",
		"dimension": "Dimension C-137",
		"residents": residents,
		"url": url(&format!("location/{id}")),
		"created": "2017-11-10T12:42:04.162Z"
	})
}

/// Renders an envelope body; `count` and `pages` are filled with plausible values.
pub fn envelope(results: Vec<Value>, next: Option<&str>) -> String {
	serde_json::json!({
		"info": { "count": results.len(), "pages": 1, "next": next, "prev": null },
		"results": results
	})
	.to_string()
}
